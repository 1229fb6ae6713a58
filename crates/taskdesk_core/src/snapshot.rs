use serde::{Deserialize, Deserializer};

/// Opaque identifier for one backend task, returned by an accepted
/// submission and consumed by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub id: String,
}

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Server-reported task state. Unrecognized strings map to `Unknown`,
/// which is non-terminal: polling continues until the server says
/// `done` or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    Pending,
    Running,
    Done,
    Failed,
    #[default]
    Unknown,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Done | TaskState::Failed)
    }
}

impl<'de> Deserialize<'de> for TaskState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "pending" => TaskState::Pending,
            "running" => TaskState::Running,
            "done" => TaskState::Done,
            "failed" => TaskState::Failed,
            _ => TaskState::Unknown,
        })
    }
}

/// One status-poll response. Every poll produces a fresh snapshot; the
/// latest snapshot fully replaces the displayed state, nothing is diffed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub status: TaskState,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub result: Option<TaskResult>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub stream_log: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlignmentResult {
    #[serde(default)]
    pub row_count: u64,
    #[serde(default)]
    pub file_type: String,
    #[serde(default = "default_split_parts")]
    pub split_parts: u32,
    pub output_excel: String,
    #[serde(default)]
    pub issues: Vec<String>,
}

fn default_split_parts() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct CheckStats {
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub skipped: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CheckReports {
    #[serde(default)]
    pub body_json: Option<String>,
    #[serde(default)]
    pub header_json: Option<String>,
    #[serde(default)]
    pub footer_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NumberCheckResult {
    pub stats: CheckStats,
    pub corrected_docx: String,
    #[serde(default)]
    pub reports: CheckReports,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageArtifacts {
    pub translated_image: String,
    #[serde(default)]
    pub corrected_image: Option<String>,
    #[serde(default)]
    pub visualization_image: Option<String>,
    #[serde(default)]
    pub ocr_json: Option<String>,
    #[serde(default)]
    pub translated_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageTranslationResult {
    #[serde(default)]
    pub filename: String,
    pub total_images: u32,
    pub results: Vec<ImageArtifacts>,
}

/// Job-type specific payload attached to a `done` snapshot (or, for the
/// legacy synchronous path, to the submission response itself). Untagged:
/// each variant is recognized by its required fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TaskResult {
    Alignment(AlignmentResult),
    NumberCheck(NumberCheckResult),
    ImageTranslation(ImageTranslationResult),
}

impl TaskResult {
    /// Server-relative paths of every artifact referenced by this result.
    pub fn artifact_paths(&self) -> Vec<String> {
        match self {
            TaskResult::Alignment(result) => vec![result.output_excel.clone()],
            TaskResult::NumberCheck(result) => {
                let mut paths = vec![result.corrected_docx.clone()];
                let reports = &result.reports;
                for report in [&reports.body_json, &reports.header_json, &reports.footer_json]
                    .into_iter()
                    .flatten()
                {
                    paths.push(report.clone());
                }
                paths
            }
            TaskResult::ImageTranslation(result) => {
                let mut paths = Vec::new();
                for item in &result.results {
                    paths.push(item.translated_image.clone());
                    for extra in [
                        &item.corrected_image,
                        &item.visualization_image,
                        &item.ocr_json,
                        &item.translated_json,
                    ]
                    .into_iter()
                    .flatten()
                    {
                        paths.push(extra.clone());
                    }
                }
                paths
            }
        }
    }

    /// Key/value rows for the final summary display.
    pub fn summary_rows(&self) -> Vec<(String, String)> {
        match self {
            TaskResult::Alignment(result) => vec![
                ("aligned rows".to_string(), result.row_count.to_string()),
                ("file type".to_string(), result.file_type.to_uppercase()),
                ("split parts".to_string(), result.split_parts.to_string()),
            ],
            TaskResult::NumberCheck(result) => vec![
                ("success".to_string(), result.stats.success.to_string()),
                ("failed".to_string(), result.stats.failed.to_string()),
                ("skipped".to_string(), result.stats.skipped.to_string()),
            ],
            TaskResult::ImageTranslation(result) => vec![
                ("file name".to_string(), result.filename.clone()),
                (
                    "images processed".to_string(),
                    result.total_images.to_string(),
                ),
            ],
        }
    }

    /// Quality warnings attached to the result, if the job type reports any.
    pub fn issues(&self) -> &[String] {
        match self {
            TaskResult::Alignment(result) => &result.issues,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitParseError {
    #[error("ACCEPTED response is missing a task_id")]
    MissingTaskId,
    #[error("unrecognized submission response: {0}")]
    UnrecognizedBody(String),
}

/// Outcome of a successful submission: either the task was queued and must
/// be polled, or the server answered with the final result directly (legacy
/// synchronous path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(TaskHandle),
    Immediate(TaskResult),
}

impl SubmitOutcome {
    /// Distinguish the two response shapes. They differ by field *value*
    /// (`status == "ACCEPTED"`) rather than by any tag, so this works on a
    /// parsed JSON value instead of serde's enum machinery.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SubmitParseError> {
        if value.get("status").and_then(|s| s.as_str()) == Some("ACCEPTED") {
            let task_id = value
                .get("task_id")
                .and_then(|id| id.as_str())
                .ok_or(SubmitParseError::MissingTaskId)?;
            return Ok(SubmitOutcome::Accepted(TaskHandle::new(task_id)));
        }

        TaskResult::deserialize(value)
            .map(SubmitOutcome::Immediate)
            .map_err(|err| SubmitParseError::UnrecognizedBody(err.to_string()))
    }
}
