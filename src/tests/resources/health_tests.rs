use crate::{ControlPlaneClient, DesiredState, HealthState, StatusDescription};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn create_synced_client(mock_server: &MockServer) -> ControlPlaneClient {
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "web": {"ID": "web", "Name": "web", "DesiredState": 1, "Instances": 2},
            "db": {"ID": "db", "Name": "db", "DesiredState": 1, "Instances": 1},
            "batch": {"ID": "batch", "Name": "batch", "DesiredState": 0, "Instances": 1},
            "cache": {"ID": "cache", "Name": "cache", "DesiredState": -1, "Instances": 1}
        })))
        .mount(mock_server)
        .await;

    let client = ControlPlaneClient::builder()
        .base_url(&format!("{}/", mock_server.uri()))
        .unwrap()
        .build()
        .unwrap();
    client.services().update().await.unwrap();
    client
}

#[tokio::test]
async fn test_health_report_end_to_end() {
    let mock_server = MockServer::start().await;
    let client = create_synced_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/servicehealth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Statuses": {
                "web": {
                    "0": {"running": {"Status": "passed", "Timestamp": 1000, "Interval": 10, "StartedAt": 900}},
                    "1": {"running": {"Status": "passed", "Timestamp": 1000, "Interval": 10, "StartedAt": 900}}
                },
                "db": {
                    "0": {
                        "running": {"Status": "passed", "Timestamp": 1000, "Interval": 10, "StartedAt": 900},
                        "ready": {"Status": "failed", "Timestamp": 1000, "Interval": 10, "StartedAt": 900}
                    }
                },
                "batch": {
                    "0": {"running": {"Status": "passed", "Timestamp": 1000, "Interval": 10, "StartedAt": 900}}
                },
                "cache": {
                    "0": {"running": {"Status": "passed", "Timestamp": 1000, "Interval": 10}}
                }
            },
            "Timestamp": 1005
        })))
        .mount(&mock_server)
        .await;

    let report = client.evaluate_health().await.unwrap();
    assert_eq!(report.timestamp(), 1005.0);

    let web = report.get("web");
    assert_eq!(web.status, HealthState::Good);
    assert_eq!(web.description, StatusDescription::PassingHealthChecks);
    assert_eq!(web.children.len(), 2);
    assert_eq!(report.get("web.1").status, HealthState::Good);

    let db = report.get("db");
    assert_eq!(db.status, HealthState::Bad);
    let db_instance = report.get("db.0");
    let check = |id: &str| {
        db_instance
            .children
            .iter()
            .find(|child| child.id == id)
            .map(|child| child.status)
    };
    assert_eq!(check("db.0.ready"), Some(HealthState::Bad));
    assert_eq!(check("db.0.running"), Some(HealthState::Good));

    let batch = report.get("batch");
    assert_eq!(batch.desired_state, DesiredState::Stopped);
    assert_eq!(batch.status, HealthState::Unknown);
    assert_eq!(batch.description, StatusDescription::StoppingService);

    // no StartedAt yet: the instance is still coming up
    let cache = report.get("cache");
    assert_eq!(cache.status, HealthState::Unknown);
    assert_eq!(cache.description, StatusDescription::StartingService);

    assert!(report.find("ghost").is_none());
    assert_eq!(report.get("ghost").status, HealthState::Down);
}

#[tokio::test]
async fn test_missing_instances_and_stale_checks() {
    let mock_server = MockServer::start().await;
    let client = create_synced_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/servicehealth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Statuses": {
                "web": {
                    "0": {"running": {"Status": "passed", "Timestamp": 1000, "Interval": 10, "StartedAt": 900}}
                },
                "db": {
                    "0": {"running": {"Status": "passed", "Timestamp": 100, "Interval": 10, "StartedAt": 50}}
                }
            },
            "Timestamp": 1000
        })))
        .mount(&mock_server)
        .await;

    let report = client.evaluate_health().await.unwrap();

    let web = report.get("web");
    assert_eq!(web.status, HealthState::Unknown);
    assert_eq!(web.description, StatusDescription::MissingHealthChecks);
    assert_eq!(web.rollup.count(HealthState::Unknown), 1);
    assert_eq!(web.rollup.total(), 2);

    // 90 missed intervals is past the failure threshold
    assert_eq!(report.get("db").status, HealthState::Bad);

    let batch = report.get("batch");
    assert_eq!(batch.status, HealthState::Down);
    assert_eq!(batch.description, StatusDescription::ContainerDown);
}

#[tokio::test]
async fn test_health_fetch_failure_keeps_latest() {
    let mock_server = MockServer::start().await;
    let client = create_synced_client(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/servicehealth"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    assert!(client.evaluate_health().await.is_err());
    assert!(client.health().latest().is_none());
}
