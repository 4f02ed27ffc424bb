use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use courier_engine::{
    EngineEvent, JobService, PollSettings, ProgressPoller, ReqwestJobService, ServiceSettings,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn progress_body(is_active: bool, current: u32) -> serde_json::Value {
    serde_json::json!({
        "is_active": is_active,
        "current": current,
        "total": 100,
        "success_count": current,
        "failure_count": 0,
        "logs": []
    })
}

fn service_for(server: &MockServer) -> Arc<dyn JobService> {
    let settings = ServiceSettings {
        base_url: server.uri(),
        ..ServiceSettings::default()
    };
    Arc::new(ReqwestJobService::new(settings).expect("client builds"))
}

fn fast_poll() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(10),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn poller_forwards_snapshots_and_ends_on_inactive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progress_body(true, 30)))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progress_body(false, 100)))
        .mount(&server)
        .await;

    let (event_tx, event_rx) = mpsc::channel();
    let _poller = ProgressPoller::begin(
        service_for(&server),
        1,
        fast_poll(),
        &tokio::runtime::Handle::current(),
        event_tx,
    );

    let mut snapshots = Vec::new();
    while let Ok(event) = event_rx.recv_timeout(Duration::from_secs(2)) {
        let EngineEvent::Snapshot { generation, report } = event else {
            panic!("unexpected event");
        };
        assert_eq!(generation, 1);
        let done = !report.is_active;
        snapshots.push(report);
        if done {
            break;
        }
    }

    assert_eq!(snapshots.len(), 3);
    assert!(snapshots[0].is_active);
    assert!(!snapshots[2].is_active);
    assert_eq!(snapshots[2].current, 100);

    // The loop ended itself; the channel hangs up once the task is gone.
    let after = event_rx.recv_timeout(Duration::from_millis(300));
    assert!(after.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_ticks_are_skipped_not_fatal() {
    let server = MockServer::start().await;
    // Two broken ticks, then a clean terminal snapshot.
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progress_body(false, 100)))
        .mount(&server)
        .await;

    let (event_tx, event_rx) = mpsc::channel();
    let _poller = ProgressPoller::begin(
        service_for(&server),
        3,
        fast_poll(),
        &tokio::runtime::Handle::current(),
        event_tx,
    );

    // The only event is the terminal snapshot; the failures left no trace.
    let event = event_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("terminal snapshot");
    match event {
        EngineEvent::Snapshot { generation, report } => {
            assert_eq!(generation, 3);
            assert!(!report.is_active);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancel_stops_the_loop_and_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progress_body(true, 10)))
        .mount(&server)
        .await;

    let (event_tx, event_rx) = mpsc::channel();
    let poller = ProgressPoller::begin(
        service_for(&server),
        1,
        PollSettings {
            interval: Duration::from_millis(50),
        },
        &tokio::runtime::Handle::current(),
        event_tx,
    );

    // Wait for the first snapshot, then cancel inside the idle window.
    event_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("first snapshot");
    poller.cancel();
    poller.cancel();

    // No further snapshots arrive once the token is cancelled.
    let after = event_rx.recv_timeout(Duration::from_millis(300));
    assert!(after.is_err());
}
