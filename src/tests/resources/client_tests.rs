use crate::{ConsoleError, ControlPlaneClient, DesiredState, PollFrequency, ValidationError};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn create_client(mock_server: &MockServer) -> ControlPlaneClient {
    ControlPlaneClient::builder()
        .base_url(&format!("{}/", mock_server.uri()))
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn test_builder_from_parts() {
    let client = ControlPlaneClient::builder()
        .host("controlplane.example.com")
        .unwrap()
        .port(8443)
        .unwrap()
        .secure(true)
        .build()
        .unwrap();
    assert_eq!(
        client.base_url().as_str(),
        "https://controlplane.example.com:8443/"
    );
    assert_eq!(client.poll_frequency(), PollFrequency::default());
}

#[test]
fn test_builder_default_port() {
    let client = ControlPlaneClient::builder()
        .host("localhost")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(client.base_url().as_str(), "http://localhost:443/");
}

#[test]
fn test_builder_requires_host() {
    let result = ControlPlaneClient::builder().build();
    assert!(matches!(
        result,
        Err(ConsoleError::Validation(ValidationError::Field { ref field, .. })) if field == "host"
    ));
}

#[test]
fn test_builder_rejects_invalid_input() {
    assert!(ControlPlaneClient::builder().host("bad host!").is_err());
    assert!(ControlPlaneClient::builder().port(0).is_err());
    assert!(ControlPlaneClient::builder().base_url("ftp://example.com/").is_err());
    assert!(
        ControlPlaneClient::builder()
            .poll_frequency(Duration::ZERO)
            .is_err()
    );

    let zero_rate = ControlPlaneClient::builder()
        .host("localhost")
        .unwrap()
        .rate_limit(0, 1)
        .build();
    assert!(matches!(zero_rate, Err(ConsoleError::Validation(_))));
}

#[tokio::test]
async fn test_load_server_config_applies_poll_frequency() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"PollFrequency": 10})),
        )
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let frequency = client.load_server_config().await.unwrap();

    assert_eq!(frequency.period(), Duration::from_secs(10));
    assert_eq!(client.poll_frequency(), frequency);
    assert_eq!(client.hosts().poll_frequency(), frequency);
    assert_eq!(client.pools().poll_frequency(), frequency);
    assert_eq!(client.services().poll_frequency(), frequency);
    assert_eq!(client.instances_for("s1").poll_frequency(), frequency);
}

#[tokio::test]
async fn test_load_server_config_updates_active_synchronizer() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"PollFrequency": 7})),
        )
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    client.hosts().activate();
    let frequency = client.load_server_config().await.unwrap();

    assert!(client.hosts().is_active());
    assert_eq!(client.hosts().poll_frequency(), frequency);
    client.hosts().deactivate();
}

#[tokio::test]
async fn test_load_server_config_failure_keeps_default() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    assert!(client.load_server_config().await.is_err());
    assert_eq!(client.poll_frequency(), PollFrequency::default());
    assert_eq!(client.services().poll_frequency(), PollFrequency::default());
}

#[tokio::test]
async fn test_zero_server_poll_frequency_rejected() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"PollFrequency": 0})),
        )
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    assert!(matches!(
        client.load_server_config().await,
        Err(ConsoleError::Validation(_))
    ));
    assert_eq!(client.poll_frequency(), PollFrequency::default());
}

#[tokio::test]
async fn test_stop_synchronized_service_until_refresh() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "s1": {"ID": "s1", "Name": "web", "DesiredState": 1, "Instances": 1}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/services/s1/stopService"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    client.services().update().await.unwrap();
    let service = client.service("s1").unwrap();
    assert!(matches!(client.service("s2"), Err(ConsoleError::NotFound(_))));

    client.actions().stop_service(&service, false).await.unwrap();
    assert_eq!(service.desired_state(), DesiredState::Stopped);

    // the next refresh carries the backend's desired state again
    client.services().update().await.unwrap();
    assert_eq!(service.desired_state(), DesiredState::Started);
}
