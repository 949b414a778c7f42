//! Full lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread, then
//! drives every client operation over real HTTP through `UreqTransport`.
//! This checks that request building, the header policy and response
//! decoding agree with an actual server, not just with canned bytes.

use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;

use m2x_core::{
    ClientConfig, DatasourceParams, ErrorKind, KeyParams, LocationParams, M2xClient, StreamParams,
    TriggerParams, Unit, UreqTransport, Value, ValuesParams,
};

/// Spawn the mock server and return its address once it is listening.
fn start_server() -> SocketAddr {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            mock_server::run(listener, mock_server::DEFAULT_API_KEY).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

fn client_for(addr: SocketAddr, api_key: &str) -> M2xClient {
    let config = ClientConfig::new(api_key).with_api_base(&format!("http://{addr}/v1"));
    M2xClient::with_transport(config, UreqTransport::new())
}

#[test]
fn full_lifecycle() {
    let addr = start_server();
    let client = client_for(addr, mock_server::DEFAULT_API_KEY);

    // Status
    let status = client.status().unwrap();
    assert_eq!(status.api, "OK");

    // Blueprint create and fetch
    assert!(client.blueprints().unwrap().blueprints.is_empty());
    let created = client
        .create_blueprint(&DatasourceParams {
            name: Some("Sample Blueprint".to_string()),
            description: Some("Unit testing lib".to_string()),
            visibility: Some("private".to_string()),
            tags: Some("lorem, ipsum".to_string()),
        })
        .unwrap();
    assert_eq!(created.description, "Unit testing lib");
    assert_eq!(created.visibility, "private");
    assert_eq!(created.tags, vec!["lorem", "ipsum"]);
    let fetched = client.blueprint(&created.id).unwrap();
    assert_eq!(fetched, created);

    // Blueprint update
    client
        .update_blueprint(
            &created.id,
            &DatasourceParams {
                description: Some("A blueprint for the Rust lib".to_string()),
                ..DatasourceParams::default()
            },
        )
        .unwrap();
    assert_eq!(
        client.blueprint(&created.id).unwrap().description,
        "A blueprint for the Rust lib"
    );

    // Feed behind the blueprint
    let feed_id = created.feed_id().to_string();
    let feed = client.feed(&feed_id).unwrap();
    assert_eq!(feed.kind, "blueprint");
    assert_eq!(client.feeds().unwrap().feeds.len(), 1);

    // Location
    let location = LocationParams {
        name: Some("Storage Room".to_string()),
        latitude: "-37.9788423562422".to_string(),
        longitude: "-57.5478776916862".to_string(),
        elevation: Some("5".to_string()),
    };
    client.update_feed_location(&feed_id, &location).unwrap();
    let stored = client.feed_location(&feed_id).unwrap();
    assert_eq!(stored.name, "Storage Room");
    assert_eq!(stored.latitude, location.latitude);
    assert_eq!(stored.waypoints.len(), 1);

    // Stream and values
    let unit = Unit {
        label: "celsius".to_string(),
        symbol: "C".to_string(),
    };
    client
        .update_feed_stream(&feed_id, "temperature", &StreamParams { unit: Some(unit.clone()) })
        .unwrap();
    client
        .post_feed_stream_values(
            &feed_id,
            "temperature",
            &ValuesParams {
                values: vec![
                    Value::new("2013-09-09T19:15:00Z", "32"),
                    Value::new("2013-09-09T19:17:00Z", "25"),
                ],
            },
        )
        .unwrap();
    let stream = client.feed_stream(&feed_id, "temperature").unwrap();
    assert_eq!(stream.unit, unit);
    assert_eq!(stream.value, "25");
    let values = client.feed_stream_values(&feed_id, "temperature").unwrap();
    assert_eq!(values.values.len(), 2);
    assert_eq!(values.values[0].value, "25");

    // Triggers
    let trigger = client
        .create_trigger(
            &feed_id,
            &TriggerParams {
                name: Some("high-temperature".to_string()),
                stream: Some("temperature".to_string()),
                condition: Some(">".to_string()),
                value: Some("30".to_string()),
                callback_url: Some("http://example.com/callback".to_string()),
                status: None,
            },
        )
        .unwrap();
    assert_eq!(trigger.status, "enabled");
    assert_eq!(client.triggers(&feed_id).unwrap().triggers.len(), 1);
    client
        .update_trigger(
            &feed_id,
            &trigger.id,
            &TriggerParams {
                status: Some("disabled".to_string()),
                ..TriggerParams::default()
            },
        )
        .unwrap();
    assert_eq!(client.trigger(&feed_id, &trigger.id).unwrap().status, "disabled");
    client.test_trigger(&feed_id, &trigger.name).unwrap();

    // Request log, newest first
    let log = client.request_log(&feed_id).unwrap();
    let newest = &log.requests[0];
    assert_eq!(newest.method, "POST");
    assert_eq!(newest.status, 204);
    assert!(newest.path.ends_with("/triggers/high-temperature/test"));

    client.delete_trigger(&feed_id, &trigger.id).unwrap();
    let gone = client.trigger(&feed_id, &trigger.id).unwrap_err();
    assert_eq!(gone.status_code(), 404);

    // Keys
    let key = client
        .create_key(&KeyParams {
            name: "Rust key".to_string(),
            permissions: vec!["GET".to_string()],
            feed: Some(feed_id.clone()),
            ..KeyParams::default()
        })
        .unwrap();
    assert!(!key.master);
    assert_eq!(client.key(&key.key).unwrap().feed.as_deref(), Some(feed_id.as_str()));
    client
        .update_key(&key.key, &serde_json::json!({ "permissions": ["GET", "PUT"] }))
        .unwrap();
    assert_eq!(client.key(&key.key).unwrap().permissions, vec!["GET", "PUT"]);
    assert_eq!(client.keys().unwrap().keys.len(), 1);
    client.delete_key(&key.key).unwrap();
    assert!(client.key(&key.key).unwrap_err().is_not_found());

    // Batches
    let batch = client
        .create_batch(&DatasourceParams {
            name: Some("Sample Batch".to_string()),
            ..DatasourceParams::default()
        })
        .unwrap();
    assert_eq!(batch.datasources.clone().unwrap_or_default().total, 0);
    assert_eq!(client.batches().unwrap().batches.len(), 1);
    client
        .update_batch(
            &batch.id,
            &DatasourceParams {
                visibility: Some("private".to_string()),
                ..DatasourceParams::default()
            },
        )
        .unwrap();
    assert_eq!(client.batch(&batch.id).unwrap().visibility, "private");
    client.delete_batch(&batch.id).unwrap();

    // Blueprint delete takes its feed along
    client.delete_blueprint(&created.id).unwrap();
    let err = client.blueprint(&created.id).unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.message(), "The specified blueprint does not exist");
    assert!(client.feed(&feed_id).unwrap_err().is_not_found());
}

#[test]
fn validation_errors_come_back_as_422() {
    let addr = start_server();
    let client = client_for(addr, mock_server::DEFAULT_API_KEY);

    let err = client.create_blueprint(&DatasourceParams::default()).unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.message(), "Validation Failed");
    assert!(err.field_errors().contains_key("name"));
}

#[test]
fn wrong_key_is_rejected() {
    let addr = start_server();
    let client = client_for(addr, "not-the-key");

    let err = client.blueprints().unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert_eq!(err.message(), "Invalid or missing API key");

    // Status needs no key.
    assert!(client.status().is_ok());
}

#[test]
fn closed_port_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(addr, mock_server::DEFAULT_API_KEY);

    let err = client.status().unwrap_err();
    assert_eq!(err.status_code(), 0);
    assert!(matches!(err.kind(), ErrorKind::Transport(_)));
    assert!(!err.message().is_empty());
}
