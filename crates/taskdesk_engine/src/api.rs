use client_logging::client_trace;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use url::Url;

use taskdesk_core::{
    artifact_url, JobKind, JobRequest, ServiceConfig, StatusSnapshot, SubmitOutcome, TaskHandle,
};

use crate::detail::extract_error_detail;
use crate::types::{ApiError, ClientSettings};

/// Alignment and the other job types share one catalogue endpoint.
pub const CONFIG_PATH: &str = "/task/alignment/config";

#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    async fn fetch_config(&self) -> Result<ServiceConfig, ApiError>;
    async fn submit(&self, request: &JobRequest) -> Result<SubmitOutcome, ApiError>;
    async fn poll_status(
        &self,
        kind: &JobKind,
        task: &TaskHandle,
    ) -> Result<StatusSnapshot, ApiError>;
    async fn fetch_artifact(&self, relative_path: &str) -> Result<Vec<u8>, ApiError>;
}

pub struct ReqwestTaskApi {
    client: reqwest::Client,
    settings: ClientSettings,
}

impl ReqwestTaskApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }
}

#[async_trait::async_trait]
impl TaskApi for ReqwestTaskApi {
    async fn fetch_config(&self) -> Result<ServiceConfig, ApiError> {
        let url = self.endpoint(CONFIG_PATH)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = reject_non_ok(response).await?;
        response
            .json::<ServiceConfig>()
            .await
            .map_err(|err| ApiError::InvalidBody(err.to_string()))
    }

    async fn submit(&self, request: &JobRequest) -> Result<SubmitOutcome, ApiError> {
        // The backend takes every option as a flat query parameter next to
        // the multipart body; it never accepts JSON alongside files.
        let mut url = self.endpoint(request.kind.submit_path())?;
        url.query_pairs_mut()
            .extend_pairs(request.kind.query_params());

        let mut form = Form::new();
        for file in &request.files {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|err| ApiError::InputFile {
                    path: file.path.clone(),
                    message: err.to_string(),
                })?;
            form = form.part(file.field, Part::bytes(bytes).file_name(file.file_name()));
        }

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = reject_non_ok(response).await?;

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
        SubmitOutcome::from_json(&body).map_err(|err| ApiError::InvalidBody(err.to_string()))
    }

    async fn poll_status(
        &self,
        kind: &JobKind,
        task: &TaskHandle,
    ) -> Result<StatusSnapshot, ApiError> {
        let url = self.endpoint(&kind.status_path(&task.id))?;
        client_trace!(
            "poll tick {}: GET {url}",
            client_logging::get_poll_tick()
        );
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = reject_non_ok(response).await?;
        response
            .json::<StatusSnapshot>()
            .await
            .map_err(|err| ApiError::InvalidBody(err.to_string()))
    }

    async fn fetch_artifact(&self, relative_path: &str) -> Result<Vec<u8>, ApiError> {
        let url = artifact_url(&self.settings.base_url, relative_path)
            .ok_or_else(|| ApiError::UnsafePath(relative_path.to_string()))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = reject_non_ok(response).await?;

        let max_bytes = self.settings.max_artifact_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::TooLarge { max_bytes });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(ApiError::TooLarge { max_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

/// Turn a non-2xx response into [`ApiError::Status`], pulling the server's
/// explanation out of the body.
async fn reject_non_ok(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        code: status.as_u16(),
        detail: extract_error_detail(status.as_u16(), &body),
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
