//! End-to-end runs over a local bucket and a mocked CRM.

use std::time::Duration;

use connector::error::{EXTERNAL_SERVICE_MESSAGE, UNEXPECTED_MESSAGE};
use connector::handler::Connector;
use connector::models::{HandlerSettings, ParameterNames, RetryPolicy};
use connector::parameters::FileParameters;
use connector::storage::LocalArtifactStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKET: &str = "connect-bucket";
const PHONE_CALLS: &str = "/sap/c4c/api/v1/phone-service/phoneCalls";
const ANALYSIS_KEY: &str =
    "Analysis/Voice/2024/05/01/abc123_analysis_2024-05-01T10:04:12Z.json";

struct Fixture {
    server: MockServer,
    _storage: TempDir,
    connector: Connector<FileParameters, LocalArtifactStore>,
    store: LocalArtifactStore,
}

async fn fixture(settings: HandlerSettings) -> Fixture {
    let server = MockServer::start().await;
    let storage = TempDir::new().unwrap();
    let store = LocalArtifactStore::new(storage.path());
    // The bucket exists even when it holds no analysis yet.
    store.put_object(BUCKET, "README", b"").await.unwrap();

    let parameters = FileParameters::default()
        .with_parameter("/my-connect/poc/c4c-base-url", server.uri())
        .with_parameter(
            "/my-connect/poc/c4c-phone-service-endpoint-path",
            "/sap/c4c/api/v1/phone-service/",
        )
        .with_parameter("/my-connect/poc/c4c-username", "user")
        .with_parameter("/my-connect/poc/connect-bucket-name", BUCKET)
        .with_secret("Secret-c4c-password", "pass");

    let connector = Connector::new(
        ParameterNames::with_root("my-connect", "poc"),
        settings,
        parameters,
        store.clone(),
    );

    Fixture {
        server,
        _storage: storage,
        connector,
        store,
    }
}

fn event() -> Value {
    json!({
        "version": "0",
        "id": "5d6e5c4b-0000-0000-0000-000000000000",
        "detail-type": "Contact Lens Post Call Rules Matched",
        "source": "aws.connect",
        "time": "2024-05-01T10:00:00Z",
        "detail": {
            "ruleName": "SAPPostCallAnalytics",
            "contactArn": "arn:aws:connect:eu-central-1:123456789012:instance/inst-1/contact/abc123"
        }
    })
}

fn analysis(summary: &str) -> Vec<u8> {
    json!({
        "Channel": "VOICE",
        "CustomerMetadata": { "ContactId": "abc123" },
        "ConversationCharacteristics": {
            "ContactSummary": { "PostContactSummary": { "Content": summary } }
        }
    })
    .to_string()
    .into_bytes()
}

async fn mount_lookup(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(PHONE_CALLS))
        .and(query_param("$filter", "externalId.displayId eq 'abc123'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn found_call() -> Value {
    json!({ "value": [ { "id": "789", "adminData": { "updatedOn": "W/\"123\"" } } ] })
}

#[tokio::test]
async fn test_summary_reaches_phone_call() {
    let f = fixture(HandlerSettings::default()).await;
    f.store
        .put_object(BUCKET, ANALYSIS_KEY, &analysis("Customer called about billing."))
        .await
        .unwrap();

    mount_lookup(&f.server, found_call()).await;
    let updated = json!({
        "value": { "id": "789", "transcript": "Customer called about billing." }
    });
    Mock::given(method("PATCH"))
        .and(path(format!("{PHONE_CALLS}/789")))
        .and(header("if-Match", "W/\"123\""))
        .and(body_json(json!({ "transcript": "Customer called about billing." })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&updated))
        .expect(1)
        .mount(&f.server)
        .await;

    let response = f.connector.handle(&event()).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body_json().unwrap(), updated);
}

#[tokio::test]
async fn test_stale_token_is_generic_failure() {
    let f = fixture(HandlerSettings::default()).await;
    f.store
        .put_object(BUCKET, ANALYSIS_KEY, &analysis("Customer called about billing."))
        .await
        .unwrap();

    mount_lookup(&f.server, found_call()).await;
    Mock::given(method("PATCH"))
        .and(path(format!("{PHONE_CALLS}/789")))
        .respond_with(ResponseTemplate::new(412).set_body_string("ETag mismatch for W/\"123\""))
        .expect(1)
        .mount(&f.server)
        .await;

    let response = f.connector.handle(&event()).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body_json().unwrap(), json!({ "error": EXTERNAL_SERVICE_MESSAGE }));
    assert!(!response.body.contains("412"));
    assert!(!response.body.contains("ETag"));
}

#[tokio::test]
async fn test_missing_analysis_skips_crm() {
    let f = fixture(HandlerSettings::default()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(found_call()))
        .expect(0)
        .mount(&f.server)
        .await;

    let response = f.connector.handle(&event()).await;

    assert_eq!(response.status_code, 404);
    assert!(
        response.body_json().unwrap()["error"]
            .as_str()
            .unwrap()
            .contains("Analysis/Voice/2024/05/01/abc123_analysis_")
    );
}

#[tokio::test]
async fn test_unknown_call_skips_update() {
    let f = fixture(HandlerSettings::default()).await;
    f.store
        .put_object(BUCKET, ANALYSIS_KEY, &analysis("Customer called about billing."))
        .await
        .unwrap();

    mount_lookup(&f.server, json!({ "value": [] })).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&f.server)
        .await;

    let response = f.connector.handle(&event()).await;

    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn test_crm_down_is_generic_failure() {
    let f = fixture(HandlerSettings::default()).await;
    f.store
        .put_object(BUCKET, ANALYSIS_KEY, &analysis("Customer called about billing."))
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path(PHONE_CALLS))
        .respond_with(ResponseTemplate::new(502))
        .mount(&f.server)
        .await;

    let response = f.connector.handle(&event()).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body_json().unwrap()["error"], EXTERNAL_SERVICE_MESSAGE);
}

#[tokio::test]
async fn test_empty_summary_still_updates() {
    let settings = HandlerSettings {
        summary_retry: RetryPolicy {
            attempts: 4,
            delay: Duration::from_millis(1),
        },
        ..HandlerSettings::default()
    };
    let f = fixture(settings).await;
    f.store
        .put_object(BUCKET, ANALYSIS_KEY, &analysis(""))
        .await
        .unwrap();

    mount_lookup(&f.server, found_call()).await;
    Mock::given(method("PATCH"))
        .and(path(format!("{PHONE_CALLS}/789")))
        .and(body_json(json!({ "transcript": "" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&f.server)
        .await;

    let response = f.connector.handle(&event()).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "null");
}

#[tokio::test]
async fn test_corrupt_analysis_is_unexpected() {
    let f = fixture(HandlerSettings::default()).await;
    f.store
        .put_object(BUCKET, ANALYSIS_KEY, b"{ truncated")
        .await
        .unwrap();

    let response = f.connector.handle(&event()).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body_json().unwrap()["error"], UNEXPECTED_MESSAGE);
}
