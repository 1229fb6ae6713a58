use std::path::PathBuf;

/// One file attached to a submission, keyed by its multipart field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFile {
    pub field: &'static str,
    pub path: PathBuf,
}

impl JobFile {
    pub fn new(field: &'static str, path: impl Into<PathBuf>) -> Self {
        Self {
            field,
            path: path.into(),
        }
    }

    /// File name sent to the server; falls back to the full path text for
    /// paths without a final component.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
    }
}

/// Character-count thresholds at which the backend splits an alignment job
/// into 2..=8 parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitThresholds {
    pub parts_2: u32,
    pub parts_3: u32,
    pub parts_4: u32,
    pub parts_5: u32,
    pub parts_6: u32,
    pub parts_7: u32,
    pub parts_8: u32,
}

impl Default for SplitThresholds {
    fn default() -> Self {
        Self {
            parts_2: 25_000,
            parts_3: 50_000,
            parts_4: 75_000,
            parts_5: 100_000,
            parts_6: 125_000,
            parts_7: 150_000,
            parts_8: 175_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentOptions {
    pub source_lang: String,
    pub target_lang: String,
    pub model_name: String,
    pub enable_post_split: bool,
    pub thresholds: SplitThresholds,
    pub buffer_chars: u32,
}

impl Default for AlignmentOptions {
    fn default() -> Self {
        Self {
            source_lang: "中文".to_string(),
            target_lang: "英语".to_string(),
            model_name: "Google Gemini 2.5 Flash".to_string(),
            enable_post_split: true,
            thresholds: SplitThresholds::default(),
            buffer_chars: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    Front,
    Back,
}

impl CardSide {
    pub fn as_str(self) -> &'static str {
        match self {
            CardSide::Front => "front",
            CardSide::Back => "back",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTemplate {
    Page1,
    Page2,
    Page3,
}

impl PageTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            PageTemplate::Page1 => "page1",
            PageTemplate::Page2 => "page2",
            PageTemplate::Page3 => "page3",
        }
    }
}

/// Document-type specific options for image translation, as a tagged variant
/// rather than a flat bag of conditionally-meaningful flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    IdCard {
        card_side: CardSide,
    },
    MarriageCert {
        page_template: PageTemplate,
        enable_merge: bool,
        enable_overlap_fix: bool,
        enable_colon_fix: bool,
        font_size: Option<u8>,
    },
}

impl DocumentKind {
    pub fn doc_type(&self) -> &'static str {
        match self {
            DocumentKind::IdCard { .. } => "id_card",
            DocumentKind::MarriageCert { .. } => "marriage_cert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTranslationOptions {
    pub from_lang: String,
    pub to_lang: String,
    pub enable_visualization: bool,
    pub document: DocumentKind,
}

impl Default for ImageTranslationOptions {
    fn default() -> Self {
        Self {
            from_lang: "zh".to_string(),
            to_lang: "en".to_string(),
            enable_visualization: true,
            document: DocumentKind::IdCard {
                card_side: CardSide::Front,
            },
        }
    }
}

/// The job catalogue. Each kind knows its endpoint, its multipart field
/// names, its extension allow-list and how to serialize its options as flat
/// query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    Alignment(AlignmentOptions),
    NumberCheck,
    ImageTranslation(ImageTranslationOptions),
}

const DOCUMENT_EXTENSIONS: &[&str] = &[".docx", ".doc", ".pptx", ".xlsx", ".xls"];
const DOCX_ONLY: &[&str] = &[".docx"];
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".bmp", ".tif", ".tiff"];

impl JobKind {
    pub fn label(&self) -> &'static str {
        match self {
            JobKind::Alignment(_) => "alignment",
            JobKind::NumberCheck => "number-check",
            JobKind::ImageTranslation(_) => "image-translation",
        }
    }

    pub fn submit_path(&self) -> &'static str {
        match self {
            JobKind::Alignment(_) => "/task/alignment",
            JobKind::NumberCheck => "/task/number-check",
            JobKind::ImageTranslation(_) => "/task/run",
        }
    }

    pub fn status_path(&self, task_id: &str) -> String {
        let prefix = match self {
            JobKind::Alignment(_) => "/task/alignment/status",
            JobKind::NumberCheck => "/task/number-check/status",
            JobKind::ImageTranslation(_) => "/task/run/status",
        };
        format!("{prefix}/{task_id}")
    }

    /// Multipart field names a submission must carry, in order.
    pub fn file_fields(&self) -> &'static [&'static str] {
        match self {
            JobKind::Alignment(_) | JobKind::NumberCheck => &["original_file", "translated_file"],
            JobKind::ImageTranslation(_) => &["file"],
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            JobKind::Alignment(_) => DOCUMENT_EXTENSIONS,
            JobKind::NumberCheck => DOCX_ONLY,
            JobKind::ImageTranslation(_) => IMAGE_EXTENSIONS,
        }
    }

    /// Flat query parameters sent alongside the multipart body. The backend
    /// never accepts JSON bodies combined with files.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            JobKind::Alignment(options) => {
                let t = options.thresholds;
                vec![
                    ("source_lang", options.source_lang.clone()),
                    ("target_lang", options.target_lang.clone()),
                    ("model_name", options.model_name.clone()),
                    ("enable_post_split", options.enable_post_split.to_string()),
                    ("threshold_2", t.parts_2.to_string()),
                    ("threshold_3", t.parts_3.to_string()),
                    ("threshold_4", t.parts_4.to_string()),
                    ("threshold_5", t.parts_5.to_string()),
                    ("threshold_6", t.parts_6.to_string()),
                    ("threshold_7", t.parts_7.to_string()),
                    ("threshold_8", t.parts_8.to_string()),
                    ("buffer_chars", options.buffer_chars.to_string()),
                ]
            }
            JobKind::NumberCheck => Vec::new(),
            JobKind::ImageTranslation(options) => {
                let mut params = vec![
                    ("from_lang", options.from_lang.clone()),
                    ("to_lang", options.to_lang.clone()),
                    (
                        "enable_visualization",
                        options.enable_visualization.to_string(),
                    ),
                    ("doc_type", options.document.doc_type().to_string()),
                ];
                match &options.document {
                    DocumentKind::IdCard { card_side } => {
                        params.push(("card_side", card_side.as_str().to_string()));
                    }
                    DocumentKind::MarriageCert {
                        page_template,
                        enable_merge,
                        enable_overlap_fix,
                        enable_colon_fix,
                        font_size,
                    } => {
                        params.push(("marriage_page_template", page_template.as_str().to_string()));
                        params.push(("enable_merge", enable_merge.to_string()));
                        params.push(("enable_overlap_fix", enable_overlap_fix.to_string()));
                        params.push(("enable_colon_fix", enable_colon_fix.to_string()));
                        if let Some(size) = font_size {
                            params.push(("font_size", size.to_string()));
                        }
                    }
                }
                params
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing input file for `{field}`")]
    MissingFile { field: &'static str },
    #[error("unsupported file format `{extension}` for {file_name} (allowed: {allowed})")]
    UnsupportedExtension {
        file_name: String,
        extension: String,
        allowed: String,
    },
}

/// A fully described unit of work: the job kind plus its input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub kind: JobKind,
    pub files: Vec<JobFile>,
}

impl JobRequest {
    pub fn new(kind: JobKind, files: Vec<JobFile>) -> Self {
        Self { kind, files }
    }

    /// Client-side gate run before any network effect: every required field
    /// must be present and every file must pass the extension allow-list.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in self.kind.file_fields() {
            let file = self
                .files
                .iter()
                .find(|f| f.field == *field)
                .ok_or(ValidationError::MissingFile { field })?;

            let allowed = self.kind.allowed_extensions();
            let extension = file.extension().unwrap_or_default();
            if !allowed.iter().any(|a| *a == extension) {
                return Err(ValidationError::UnsupportedExtension {
                    file_name: file.file_name(),
                    extension,
                    allowed: allowed.join(", "),
                });
            }
        }
        Ok(())
    }
}
