//! Probe behavior against a mock health endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use healthwatch::{HealthProbe, ProbeError, UpDown};

fn health_body() -> serde_json::Value {
    json!({
        "data": {
            "health": {
                "ingest": "UP",
                "ingestReachable": "UP",
                "database": "UP",
                "worlds": [
                    { "name": "emerald", "status": "UP", "lastEvent": "2024-03-01T12:00:00Z" },
                    { "name": "ceres", "status": "DOWN", "lastEvent": "2024-03-01T09:30:00Z" }
                ]
            }
        }
    })
}

async fn mount_health(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/graphql"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn probe_for(server: &MockServer) -> HealthProbe {
    HealthProbe::new(
        format!("{}/graphql?query={{ health }}", server.uri()),
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn test_probe_parses_healthy_response() {
    let server = MockServer::start().await;
    mount_health(&server, ResponseTemplate::new(200).set_body_json(health_body())).await;

    let snapshot = probe_for(&server).probe().await.unwrap();

    assert_eq!(snapshot.scalar("ingest"), Some("UP"));
    assert_eq!(snapshot.worlds.len(), 2);
    assert_eq!(snapshot.worlds[1].name, "ceres");
    assert_eq!(snapshot.worlds[1].status, UpDown::Down);
}

#[tokio::test]
async fn test_probe_rejects_server_error() {
    let server = MockServer::start().await;
    mount_health(&server, ResponseTemplate::new(500)).await;

    let err = probe_for(&server).probe().await.unwrap_err();
    assert_eq!(err, ProbeError::StatusError(500));
}

#[tokio::test]
async fn test_probe_rejects_other_2xx() {
    // Only an exact 200 counts as success.
    let server = MockServer::start().await;
    mount_health(&server, ResponseTemplate::new(204)).await;

    let err = probe_for(&server).probe().await.unwrap_err();
    assert_eq!(err, ProbeError::StatusError(204));
}

#[tokio::test]
async fn test_probe_rejects_malformed_body() {
    let server = MockServer::start().await;
    mount_health(
        &server,
        ResponseTemplate::new(200).set_body_string("{\"data\":{\"not_health\":{}}}"),
    )
    .await;

    match probe_for(&server).probe().await {
        Err(ProbeError::ParseError(_)) => {}
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_probe_times_out_as_network_error() {
    let server = MockServer::start().await;
    mount_health(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(health_body())
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let probe = HealthProbe::new(format!("{}/graphql", server.uri()), client);

    match probe.probe().await {
        Err(ProbeError::NetworkError(_)) => {}
        other => panic!("expected network error, got {:?}", other),
    }
}
