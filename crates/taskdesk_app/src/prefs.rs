use std::fs;
use std::path::Path;

use client_logging::{client_error, client_info, client_warn};
use serde::{Deserialize, Serialize};
use taskdesk_engine::AtomicFileWriter;

const PREFS_FILENAME: &str = ".taskdesk_prefs.ron";

/// Alignment selections remembered between runs, so repeat invocations can
/// omit `--source-lang` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PersistedPrefs {
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub model_name: Option<String>,
}

pub fn load(dir: &Path) -> PersistedPrefs {
    let path = dir.join(PREFS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return PersistedPrefs::default();
        }
        Err(err) => {
            client_warn!("Failed to read preferences from {:?}: {}", path, err);
            return PersistedPrefs::default();
        }
    };

    match ron::from_str(&content) {
        Ok(prefs) => {
            client_info!("Loaded preferences from {:?}", path);
            prefs
        }
        Err(err) => {
            client_warn!("Failed to parse preferences from {:?}: {}", path, err);
            PersistedPrefs::default()
        }
    }
}

pub fn save(dir: &Path, prefs: &PersistedPrefs) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(prefs, pretty) {
        Ok(text) => text,
        Err(err) => {
            client_error!("Failed to serialize preferences: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    if let Err(err) = writer.write(PREFS_FILENAME, &content) {
        client_error!("Failed to write preferences to {:?}: {}", dir, err);
    }
}
