//! get_phone_id against a stubbed Telesign API

use std::time::Duration;

use phoneid_core::{InvocationContext, Tool};
use phoneid_tools::phone_id::{MISSING_CREDENTIALS_MESSAGE, REQUEST_FAILED_MESSAGE};
use phoneid_tools::{CredentialSource, PhoneIdTool, PhoneLookupResult};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHONE: &str = "+14155550123";
const PHONE_PATH: &str = "/v1/phoneid/+14155550123";

fn credentials() -> CredentialSource {
    CredentialSource::Static {
        customer_id: Some("user".to_string()),
        api_key: Some("pass".to_string()),
    }
}

fn tool_for(server: &MockServer) -> PhoneIdTool {
    PhoneIdTool::with_client(Client::new(), &server.uri(), credentials())
}

fn expect_error(result: PhoneLookupResult) -> (String, Option<u16>, Option<serde_json::Value>) {
    match result {
        PhoneLookupResult::Error {
            message,
            status,
            details,
        } => (message, status, details),
        other => panic!("expected error result, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_credentials_short_circuit_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for source in [
        CredentialSource::Static {
            customer_id: Some("user".to_string()),
            api_key: None,
        },
        CredentialSource::Static {
            customer_id: None,
            api_key: Some("pass".to_string()),
        },
    ] {
        let tool = PhoneIdTool::with_client(Client::new(), &server.uri(), source);
        let (message, status, details) = expect_error(tool.lookup(PHONE).await);

        assert_eq!(message, MISSING_CREDENTIALS_MESSAGE);
        assert!(status.is_none());
        assert!(details.is_none());
    }

    server.verify().await;
}

#[tokio::test]
async fn success_body_is_passed_through_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": {"code": 290}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = tool_for(&server).lookup(PHONE).await;
    assert_eq!(
        result,
        PhoneLookupResult::Success(json!({"status": {"code": 290}}))
    );
}

#[tokio::test]
async fn json_error_body_becomes_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"errors": [{"code": "X"}]})),
        )
        .mount(&server)
        .await;

    let result = tool_for(&server).lookup(PHONE).await;
    assert_eq!(
        result,
        PhoneLookupResult::Error {
            message: REQUEST_FAILED_MESSAGE.to_string(),
            status: Some(400),
            details: Some(json!({"errors": [{"code": "X"}]})),
        }
    );
    assert_eq!(
        result.to_json(),
        json!({
            "error": "Telesign PhoneID request failed",
            "status": 400,
            "details": {"errors": [{"code": "X"}]}
        })
    );
}

#[tokio::test]
async fn non_json_error_body_is_truncated() {
    let server = MockServer::start().await;
    let raw_body = "a".repeat(5000);
    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(raw_body.clone()))
        .mount(&server)
        .await;

    let (message, status, details) = expect_error(tool_for(&server).lookup(PHONE).await);
    let details = details.expect("details present");

    assert_eq!(message, REQUEST_FAILED_MESSAGE);
    assert_eq!(status, Some(500));
    assert_eq!(details["status"], 500);
    assert_eq!(details["body"].as_str().unwrap(), &raw_body[..2000]);
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    // Bind then drop a listener so nothing accepts on the port.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tool = PhoneIdTool::with_client(Client::new(), &format!("http://{}", addr), credentials());
    let result = tool.lookup(PHONE).await;
    let json = result.to_json();
    let (message, status, _) = expect_error(result);

    assert!(
        message.starts_with("Network error while calling Telesign: "),
        "unexpected message: {}",
        message
    );
    assert!(status.is_none());
    assert!(json.get("status").is_none());
}

#[tokio::test]
async fn timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let tool = PhoneIdTool::with_client(client, &server.uri(), credentials());

    let (message, status, _) = expect_error(tool.lookup(PHONE).await);
    assert!(message.starts_with("Network error while calling Telesign: TimeoutError: "));
    assert!(status.is_none());
}

#[tokio::test]
async fn non_json_success_body_is_unexpected_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (message, status, _) = expect_error(tool_for(&server).lookup(PHONE).await);
    assert!(message.starts_with("Unexpected error: JSONDecodeError: "));
    assert!(status.is_none());
}

#[tokio::test]
async fn repeated_lookups_are_identical() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reference_id": "ABC",
            "status": {"code": 300, "description": "Transaction successfully completed"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let tool = tool_for(&server);
    let first = tool.lookup(PHONE).await;
    let second = tool.lookup(PHONE).await;

    assert!(first.is_success());
    assert_eq!(first, second);
}

#[tokio::test]
async fn execute_returns_structured_tool_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"errors": []})))
        .mount(&server)
        .await;

    let result = tool_for(&server)
        .execute(
            &InvocationContext::unauthenticated(),
            json!({"phoneNumber": PHONE}),
        )
        .await
        .unwrap();

    assert!(result.is_error);
    assert_eq!(result.output["error"], REQUEST_FAILED_MESSAGE);
    assert_eq!(result.output["status"], 403);
}
