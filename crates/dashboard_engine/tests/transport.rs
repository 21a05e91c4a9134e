use std::net::TcpListener;
use std::time::Duration;

use dashboard_engine::{
    ClientSettings, ReqwestTransport, Transport, TransportError, TransportRequest,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> ReqwestTransport {
    engine_logging::initialize_for_tests();
    ReqwestTransport::new(&ClientSettings::default()).expect("client builds")
}

#[tokio::test]
async fn post_sends_json_body_and_returns_parsed_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"query": "cafes", "location": "Seattle"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = TransportRequest::post(
        format!("{}/search", server.uri()),
        json!({"query": "cafes", "location": "Seattle"}),
    )
    .requiring(&["query", "location"]);

    let reply = transport().send(request).await.expect("send ok");
    assert_eq!(reply, json!({"message": "ok"}));
}

#[tokio::test]
async fn failure_status_carries_server_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "Both query and location must be provided"})),
        )
        .mount(&server)
        .await;

    let request = TransportRequest::post(
        format!("{}/search", server.uri()),
        json!({"query": "", "location": ""}),
    );
    let err = transport().send(request).await.unwrap_err();
    assert_eq!(
        err,
        TransportError::Server {
            status: 400,
            message: Some("Both query and location must be provided".to_string()),
        }
    );
}

#[tokio::test]
async fn failure_status_without_json_has_no_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/results"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = transport()
        .send(TransportRequest::get(format!("{}/api/results", server.uri())))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransportError::Server {
            status: 500,
            message: None,
        }
    );
}

#[tokio::test]
async fn slow_response_past_timeout_is_no_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/results"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"count": 1})),
        )
        .mount(&server)
        .await;

    let request = TransportRequest::get(format!("{}/api/results", server.uri()))
        .with_timeout(Some(Duration::from_millis(50)));
    let err = transport().send(request).await.unwrap_err();
    assert!(matches!(err, TransportError::NoResponse(_)), "{err:?}");
}

#[tokio::test]
async fn refused_connection_is_no_response() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = transport()
        .send(TransportRequest::get(format!("http://127.0.0.1:{port}/api/results")))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::NoResponse(_)), "{err:?}");
}

#[tokio::test]
async fn missing_required_field_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = TransportRequest::post(format!("{}/process", server.uri()), json!({"query": "cafes"}))
        .requiring(&["query", "location"]);
    let err = transport().send(request).await.unwrap_err();
    assert_eq!(
        err,
        TransportError::RequestSetup("missing required field `location`".to_string())
    );
}

#[tokio::test]
async fn empty_success_body_is_null_and_text_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let transport = transport();
    let empty = transport
        .send(TransportRequest::get(format!("{}/empty", server.uri())))
        .await
        .unwrap();
    assert_eq!(empty, Value::Null);

    let text = transport
        .send(TransportRequest::get(format!("{}/text", server.uri())))
        .await
        .unwrap();
    assert_eq!(text, json!("not json"));
}
