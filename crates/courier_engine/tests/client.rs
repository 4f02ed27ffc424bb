use std::io::Write;

use courier_engine::{
    InputArtifact, JobService, ProgressReport, ReqwestJobService, ServiceError, ServiceSettings,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> ReqwestJobService {
    let settings = ServiceSettings {
        base_url: server.uri(),
        ..ServiceSettings::default()
    };
    ReqwestJobService::new(settings).expect("client builds")
}

fn temp_artifact(name: &str, contents: &[u8]) -> (tempfile::TempDir, InputArtifact) {
    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join(name);
    let mut file = std::fs::File::create(&file_path).expect("create artifact");
    file.write_all(contents).expect("write artifact");
    (
        dir,
        InputArtifact {
            name: name.to_string(),
            path: file_path,
        },
    )
}

#[tokio::test]
async fn start_uploads_multipart_and_decodes_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Message sending process started successfully",
            "total_recipients": 100
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, recipients) = temp_artifact("contacts.xlsx", b"fake xlsx bytes");
    let service = service_for(&server);

    let ack = service.start(&recipients, None).await.expect("start ok");
    assert_eq!(ack.total_recipients, 100);
    assert_eq!(ack.message, "Message sending process started successfully");
}

#[tokio::test]
async fn start_surfaces_backend_error_message_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Recipients file must be Excel format (.xlsx or .xls)"
        })))
        .mount(&server)
        .await;

    let (_dir, recipients) = temp_artifact("contacts.xlsx", b"bytes");
    let service = service_for(&server);

    let err = service.start(&recipients, None).await.unwrap_err();
    match err {
        ServiceError::Rejected { message } => {
            assert_eq!(message, "Recipients file must be Excel format (.xlsx or .xls)");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn start_with_attachment_sends_both_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "started",
            "total_recipients": 5
        })))
        .mount(&server)
        .await;

    let (_dir_a, recipients) = temp_artifact("contacts.xlsx", b"sheet");
    let (_dir_b, attachment) = temp_artifact("flyer.pdf", b"%PDF-");
    let service = service_for(&server);

    let ack = service
        .start(&recipients, Some(&attachment))
        .await
        .expect("start ok");
    assert_eq!(ack.total_recipients, 5);
}

#[tokio::test]
async fn start_fails_when_the_staged_file_is_unreadable() {
    let server = MockServer::start().await;
    let service = service_for(&server);
    let missing = InputArtifact {
        name: "gone.xlsx".to_string(),
        path: std::path::PathBuf::from("/definitely/not/here/gone.xlsx"),
    };

    let err = service.start(&missing, None).await.unwrap_err();
    assert!(matches!(err, ServiceError::Io { .. }));
}

#[tokio::test]
async fn progress_decodes_the_snapshot_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "is_active": true,
            "current": 30,
            "total": 100,
            "success_count": 28,
            "failure_count": 2,
            "logs": ["Sending message to 111...", "✓ sent"]
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let report = service.progress().await.expect("progress ok");

    assert_eq!(
        report,
        ProgressReport {
            is_active: true,
            current: 30,
            total: 100,
            success_count: 28,
            failure_count: 2,
            logs: vec!["Sending message to 111...".to_string(), "✓ sent".to_string()],
        }
    );
}

#[tokio::test]
async fn progress_maps_non_2xx_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service.progress().await.unwrap_err();
    assert!(matches!(err, ServiceError::Http { status: 503 }));
}

#[tokio::test]
async fn progress_flags_malformed_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service.progress().await.unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)));
}

#[tokio::test]
async fn status_decodes_the_terminal_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "is_active": false,
            "completed": true,
            "total_processed": 100,
            "success_count": 97,
            "failure_count": 3,
            "logs": []
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let report = service.status().await.expect("status ok");
    assert!(report.completed);
    assert_eq!(report.total_processed, 100);
    assert_eq!(report.failure_count, 3);
}

#[tokio::test]
async fn stop_and_health_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Sending process stopped"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "is_active": false
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    assert_eq!(service.stop().await.unwrap().message, "Sending process stopped");
    let health = service.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert!(!health.is_active);
}
