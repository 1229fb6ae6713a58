use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdesk_core::{
    AlignmentOptions, JobFile, JobKind, JobRequest, SubmitOutcome, TaskResult,
};
use taskdesk_engine::{ApiError, ClientSettings, ReqwestTaskApi, TaskApi};

fn settings_for(server: &MockServer) -> ClientSettings {
    ClientSettings {
        base_url: Url::parse(&server.uri()).unwrap(),
        ..ClientSettings::default()
    }
}

fn docx_pair() -> (NamedTempFile, NamedTempFile, Vec<JobFile>) {
    let mut original = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
    original.write_all(b"original body").unwrap();
    let mut translated = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
    translated.write_all(b"translated body").unwrap();
    let files = vec![
        JobFile::new("original_file", original.path()),
        JobFile::new("translated_file", translated.path()),
    ];
    (original, translated, files)
}

#[tokio::test]
async fn accepted_submission_yields_task_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task/alignment"))
        .and(query_param("source_lang", "中文"))
        .and(query_param("target_lang", "英语"))
        .and(query_param("model_name", "Google Gemini 2.5 Flash"))
        .and(query_param("enable_post_split", "true"))
        .and(query_param("threshold_2", "25000"))
        .and(query_param("threshold_8", "175000"))
        .and(query_param("buffer_chars", "2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ACCEPTED",
            "task_id": "task-42"
        })))
        .mount(&server)
        .await;

    let api = ReqwestTaskApi::new(settings_for(&server)).unwrap();
    let (_a, _b, files) = docx_pair();
    let request = JobRequest::new(JobKind::Alignment(AlignmentOptions::default()), files);

    let outcome = api.submit(&request).await.expect("submit ok");
    match outcome {
        SubmitOutcome::Accepted(handle) => assert_eq!(handle.id, "task-42"),
        other => panic!("expected accepted outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn synchronous_response_carries_the_result_directly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task/number-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "stats": { "success": 10, "failed": 1, "skipped": 2 },
            "corrected_docx": "static/output/corrected.docx"
        })))
        .mount(&server)
        .await;

    let api = ReqwestTaskApi::new(settings_for(&server)).unwrap();
    let (_a, _b, files) = docx_pair();
    let request = JobRequest::new(JobKind::NumberCheck, files);

    let outcome = api.submit(&request).await.expect("submit ok");
    match outcome {
        SubmitOutcome::Immediate(TaskResult::NumberCheck(result)) => {
            assert_eq!(result.stats.success, 10);
            assert_eq!(result.corrected_docx, "static/output/corrected.docx");
        }
        other => panic!("expected immediate number-check result, got {other:?}"),
    }
}

#[tokio::test]
async fn rejection_surfaces_the_detail_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task/alignment"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "detail": "unsupported file" })),
        )
        .mount(&server)
        .await;

    let api = ReqwestTaskApi::new(settings_for(&server)).unwrap();
    let (_a, _b, files) = docx_pair();
    let request = JobRequest::new(JobKind::Alignment(AlignmentOptions::default()), files);

    let err = api.submit(&request).await.unwrap_err();
    match err {
        ApiError::Status { code, detail } => {
            assert_eq!(code, 400);
            assert_eq!(detail, "unsupported file");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_traceback_is_joined_into_the_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task/run"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "detail": {
                "error": "worker crashed",
                "traceback": ["File \"worker.py\", line 10", "KeyError: 'layout'"]
            }
        })))
        .mount(&server)
        .await;

    let api = ReqwestTaskApi::new(settings_for(&server)).unwrap();
    let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    image.write_all(b"png bytes").unwrap();
    let request = JobRequest::new(
        JobKind::ImageTranslation(taskdesk_core::ImageTranslationOptions::default()),
        vec![JobFile::new("file", image.path())],
    );

    let err = api.submit(&request).await.unwrap_err();
    match err {
        ApiError::Status { code, detail } => {
            assert_eq!(code, 500);
            assert!(detail.starts_with("worker crashed\n"));
            assert!(detail.contains("KeyError: 'layout'"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_input_file_fails_without_a_request() {
    let server = MockServer::start().await;
    let api = ReqwestTaskApi::new(settings_for(&server)).unwrap();
    let request = JobRequest::new(
        JobKind::Alignment(AlignmentOptions::default()),
        vec![
            JobFile::new("original_file", "/nonexistent/original.docx"),
            JobFile::new("translated_file", "/nonexistent/translated.docx"),
        ],
    );

    let err = api.submit(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::InputFile { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
