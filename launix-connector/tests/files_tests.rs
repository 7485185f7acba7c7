use launix_connector::{Connector, ConnectorConfig, ConnectorError};
use launix_model::BinaryPayload;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer) -> Connector {
    Connector::new(ConnectorConfig::new(server.uri(), "secret")).unwrap()
}

// ── Retrieval ───────────────────────────────────────────────────

#[tokio::test]
async fn retrieve_uses_announced_name_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/15/x"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .insert_header(
                    "content-disposition",
                    "attachment; filename*=UTF-8''R%C3%A9sum%C3%A9.png",
                )
                .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]),
        )
        .mount(&server)
        .await;

    let payload = connector(&server).retrieve_file("15").await.unwrap();
    assert_eq!(payload.file_name, "Résumé.png");
    assert_eq!(payload.mime_type, "image/png");
    assert_eq!(payload.len(), 4);
}

#[tokio::test]
async fn retrieve_falls_back_to_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/16/x"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"raw".to_vec()))
        .mount(&server)
        .await;

    let payload = connector(&server).retrieve_file("16").await.unwrap();
    assert_eq!(payload.file_name, "file_16");
    assert_eq!(payload.mime_type, "application/octet-stream");
}

#[tokio::test]
async fn announced_paths_are_reduced_to_a_local_name() {
    let server = MockServer::start().await;
    for (id, disposition) in [
        ("20", "attachment; filename*=UTF-8''%2Ftmp%2Fevil.sh"),
        ("21", "attachment; filename=\"../../.bashrc\""),
        ("22", "attachment; filename=\"..\""),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/files/{id}/x")))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-disposition", disposition)
                    .set_body_bytes(b"raw".to_vec()),
            )
            .mount(&server)
            .await;
    }
    let connector = connector(&server);

    let payload = connector.retrieve_file("20").await.unwrap();
    assert_eq!(payload.file_name, "/tmp/evil.sh");
    assert_eq!(payload.local_file_name("file_20"), "evil.sh");

    let payload = connector.retrieve_file("21").await.unwrap();
    assert_eq!(payload.local_file_name("file_21"), ".bashrc");

    let payload = connector.retrieve_file("22").await.unwrap();
    assert_eq!(payload.local_file_name("file_22"), "file_22");
}

#[tokio::test]
async fn retrieve_missing_file_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/17/x"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = connector(&server).retrieve_file("17").await.unwrap_err();
    assert!(matches!(err, ConnectorError::Status { status: 404, .. }));
}

// ── Upload ──────────────────────────────────────────────────────

#[tokio::test]
async fn upload_sends_multipart_to_new_slot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/FOP/Files/upload"))
        .and(query_param("x", "-1"))
        .and(body_string_contains("name=\"file_-1\""))
        .and(body_string_contains("filename=\"upload.bin\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 88})))
        .expect(1)
        .mount(&server)
        .await;

    let result = connector(&server)
        .upload_file(BinaryPayload::new("", "", b"hello".to_vec()))
        .await
        .unwrap();
    assert_eq!(result, json!({"id": 88}));
}

#[tokio::test]
async fn upload_error_member_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/FOP/Files/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "quota exceeded"})))
        .mount(&server)
        .await;

    let err = connector(&server)
        .upload_file(BinaryPayload::new("a.txt", "text/plain", b"x".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::Api(ref message) if message == "quota exceeded"));
}
