use crate::{ConsoleError, ControlPlaneClient, DesiredState};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn create_client(mock_server: &MockServer) -> ControlPlaneClient {
    ControlPlaneClient::builder()
        .base_url(&format!("{}/", mock_server.uri()))
        .unwrap()
        .poll_frequency(Duration::from_millis(50))
        .unwrap()
        .build()
        .unwrap()
}

async fn mount_once(mock_server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_hosts_reconcile_preserves_identity() {
    let mock_server = MockServer::start().await;
    mount_once(
        &mock_server,
        "/hosts",
        serde_json::json!({
            "h1": {"ID": "h1", "Name": "alpha", "PoolID": "default"},
            "h2": {"ID": "h2", "Name": "beta", "PoolID": "default"}
        }),
    )
    .await;
    mount_once(
        &mock_server,
        "/hosts",
        serde_json::json!({
            "h1": {"ID": "h1", "Name": "alpha2", "PoolID": "default"}
        }),
    )
    .await;

    let client = create_client(&mock_server);
    let hosts = client.hosts();

    let summary = hosts.update().await.unwrap();
    assert_eq!(summary.created, 2);
    assert_eq!(hosts.len(), 2);
    let h1 = hosts.get("h1").unwrap();
    assert_eq!(h1.name(), "alpha");
    hosts.assert_in_sync();

    let summary = hosts.update().await.unwrap();
    assert_eq!((summary.created, summary.updated, summary.removed), (0, 1, 1));
    assert_eq!(hosts.len(), 1);
    assert!(!hosts.contains("h2"));

    let h1_again = hosts.get("h1").unwrap();
    assert!(Arc::ptr_eq(&h1, &h1_again));
    assert_eq!(h1.name(), "alpha2");
    assert_eq!(hosts.list().len(), 1);
    hosts.assert_in_sync();
}

#[tokio::test]
async fn test_failed_update_leaves_collection_untouched() {
    let mock_server = MockServer::start().await;
    mount_once(
        &mock_server,
        "/pools",
        serde_json::json!({"default": {"ID": "default", "MemoryCapacity": 100}}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let pools = client.pools();
    pools.update().await.unwrap();
    let before = pools.get("default").unwrap();

    let result = pools.update().await;
    assert!(matches!(result, Err(ConsoleError::Api { status: 500, .. })));
    assert!(Arc::ptr_eq(&before, &pools.get("default").unwrap()));

    let status = pools.status();
    assert_eq!(status.generation, 2);
    assert!(status.last_error.unwrap().contains("boom"));
}

#[tokio::test]
async fn test_null_response_clears_collection() {
    let mock_server = MockServer::start().await;
    mount_once(
        &mock_server,
        "/services",
        serde_json::json!({"s1": {"ID": "s1", "Name": "web", "DesiredState": 1}}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let services = client.services();
    services.update().await.unwrap();
    assert_eq!(services.len(), 1);

    let summary = services.update().await.unwrap();
    assert_eq!(summary.removed, 1);
    assert!(services.is_empty());
    assert!(services.list().is_empty());
}

#[tokio::test]
async fn test_paused_service_does_not_break_sync() {
    let mock_server = MockServer::start().await;
    mount_once(
        &mock_server,
        "/services",
        serde_json::json!({
            "s1": {"ID": "s1", "Name": "web", "DesiredState": 1},
            "s2": {"ID": "s2", "Name": "batch", "DesiredState": 2},
            "s3": {"ID": "s3", "Name": "odd", "DesiredState": 9}
        }),
    )
    .await;

    let client = create_client(&mock_server);
    let services = client.services();
    services.update().await.unwrap();

    assert_eq!(services.len(), 3);
    assert_eq!(services.get("s1").unwrap().desired_state(), DesiredState::Started);
    assert_eq!(services.get("s2").unwrap().desired_state(), DesiredState::Paused);
    assert_eq!(services.get("s3").unwrap().desired_state(), DesiredState::Other(9));
    assert!(services.status().last_error.is_none());
}

#[tokio::test]
async fn test_instances_keyed_by_instance_id() {
    let mock_server = MockServer::start().await;
    mount_once(
        &mock_server,
        "/api/v2/services/s1/instances",
        serde_json::json!([
            {"InstanceID": 0, "ServiceID": "s1", "HostID": "h1"},
            {"InstanceID": 1, "ServiceID": "s1", "HostID": "h2"}
        ]),
    )
    .await;

    let client = create_client(&mock_server);
    let instances = client.instances_for("s1");
    instances.update().await.unwrap();

    assert_eq!(instances.name(), "instances:s1");
    assert_eq!(instances.get("1").unwrap().host_id(), "h2");
    assert_eq!(
        instances
            .list()
            .iter()
            .map(|instance| instance.instance_id())
            .collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[tokio::test]
async fn test_activate_polls_until_deactivated() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"h1": {"ID": "h1", "Name": "alpha"}})),
        )
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let hosts = client.hosts();
    let mut status = hosts.subscribe();

    hosts.activate();
    assert!(hosts.is_active());
    tokio::time::timeout(
        Duration::from_secs(5),
        status.wait_for(|status| status.generation >= 2),
    )
    .await
    .expect("poller did not refresh")
    .unwrap();
    assert!(hosts.contains("h1"));

    hosts.deactivate();
    assert!(!hosts.is_active());
}

#[tokio::test]
async fn test_ready_resolves_after_first_attempt() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let pools = client.pools().clone();
    let waiter = tokio::spawn(async move { pools.ready().await });

    assert!(client.pools().update().await.is_err());
    tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("ready never resolved")
        .unwrap();
}
