//! Command routing tests: channel, commands and runtime wired together
//! against an in-memory adapter.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lamgr_bridge::{AdapterCommands, ChannelSink, MessageChannel, MessageHandler};
use lamgr_core::{
    AdapterControl, AdapterStatus, HostError, MessageIn, MessageOut, MessageSink, ProcessError,
    ProcessInfo, WindowHost, names,
};
use lamgr_runtime::{LogStreamer, RestartCoordinator, RestartPolicy};
use serde_json::{Value, json};
use tokio::sync::mpsc;

#[derive(Default)]
struct FakeAdapter {
    running: AtomicBool,
    starts: AtomicUsize,
    stops: AtomicUsize,
    log: Mutex<Vec<String>>,
}

#[async_trait]
impl AdapterControl for FakeAdapter {
    async fn start(&self) -> Result<u32, ProcessError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        Ok(4242)
    }

    async fn stop(&self) -> Result<(), ProcessError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn get_log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn status(&self) -> AdapterStatus {
        if self.is_running() {
            AdapterStatus::Running
        } else {
            AdapterStatus::Stopped
        }
    }

    fn process_info(&self) -> Option<ProcessInfo> {
        self.is_running()
            .then(|| ProcessInfo::new(4242, "/opt/la/adapter/LocalAdapter".into()))
    }
}

#[derive(Default)]
struct CountingHost {
    shown: AtomicUsize,
}

impl WindowHost for CountingHost {
    fn show_log_view(&self) -> Result<(), HostError> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Harness {
    adapter: Arc<FakeAdapter>,
    host: Arc<CountingHost>,
    channel: MessageChannel,
    outbound: mpsc::UnboundedReceiver<MessageOut>,
}

fn harness() -> Harness {
    let adapter = Arc::new(FakeAdapter::default());
    let host = Arc::new(CountingHost::default());
    let restart = Arc::new(RestartCoordinator::with_policy(
        adapter.clone(),
        RestartPolicy {
            stop_settle: Duration::from_millis(100),
            start_settle: Duration::from_millis(100),
        },
    ));
    let streamer = Arc::new(LogStreamer::new(adapter.clone()));
    let commands = AdapterCommands::new(adapter.clone(), restart, streamer, host.clone());

    let (sink, outbound) = ChannelSink::pair();
    let channel = MessageChannel::new(Arc::new(commands), Arc::new(sink));

    Harness {
        adapter,
        host,
        channel,
        outbound,
    }
}

#[tokio::test]
async fn test_status_request_gets_response() {
    let mut h = harness();
    h.adapter.running.store(true, Ordering::SeqCst);

    h.channel
        .dispatch_raw(r#"{"name":"la.status","callbackId":11}"#)
        .await
        .unwrap();

    let response = h.outbound.recv().await.unwrap();
    assert_eq!(response.callback_id, Some(11));
    assert_eq!(response.name, names::LA_STATUS);
    assert_eq!(
        response.payload,
        json!({"running": true, "status": "running", "pid": 4242})
    );
}

#[tokio::test]
async fn test_status_of_stopped_adapter_has_null_pid() {
    let mut h = harness();
    h.channel.dispatch(MessageIn::request(names::LA_STATUS, 1)).await;

    let response = h.outbound.recv().await.unwrap();
    assert_eq!(
        response.payload,
        json!({"running": false, "status": "stopped", "pid": null})
    );
}

#[tokio::test]
async fn test_log_get_returns_joined_snapshot() {
    let mut h = harness();
    h.adapter
        .log
        .lock()
        .unwrap()
        .extend(["alpha".to_string(), "beta".to_string()]);

    h.channel.dispatch(MessageIn::request(names::LOG_GET, 5)).await;

    let response = h.outbound.recv().await.unwrap();
    assert_eq!(response.payload, Value::String("alpha\nbeta".to_string()));
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let mut h = harness();
    h.channel.dispatch(MessageIn::request("la.unknown", 2)).await;
    assert!(h.outbound.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_restart_runs_in_background_without_response() {
    let mut h = harness();
    h.channel
        .dispatch(MessageIn::request(names::LA_RESTART, 3))
        .await;
    h.channel.dispatch(MessageIn::command(names::LA_RESTART)).await;

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.adapter.stops.load(Ordering::SeqCst), 1);
    assert_eq!(h.adapter.starts.load(Ordering::SeqCst), 1);
    assert!(h.outbound.try_recv().is_err());
}

#[tokio::test]
async fn test_log_show_opens_view() {
    let h = harness();
    h.channel.dispatch(MessageIn::command(names::LOG_SHOW)).await;

    for _ in 0..100 {
        if h.host.shown.load(Ordering::SeqCst) == 1 {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("log view was never shown");
}

#[tokio::test(start_paused = true)]
async fn test_log_start_pushes_to_requesting_surface() {
    let mut h = harness();
    h.adapter.log.lock().unwrap().push("line".to_string());

    h.channel.dispatch(MessageIn::command(names::LOG_START)).await;
    h.channel.dispatch(MessageIn::command(names::LOG_START)).await;

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let mut pushes = Vec::new();
    while let Ok(message) = h.outbound.try_recv() {
        pushes.push(message);
    }
    assert_eq!(pushes.len(), 2);
    for push in pushes {
        assert_eq!(push.name, names::LOG_ALL);
        assert!(!push.is_response());
        assert_eq!(push.payload, json!("line"));
    }
}

#[tokio::test]
async fn test_handler_sees_channel_sink() {
    let h = harness();
    let commands: &dyn MessageHandler = &AdapterCommands::new(
        h.adapter.clone(),
        Arc::new(RestartCoordinator::new(h.adapter.clone())),
        Arc::new(LogStreamer::new(h.adapter.clone())),
        h.host.clone(),
    );

    let payload = commands
        .handle(h.channel.sink(), &MessageIn::request(names::LOG_GET, 1))
        .await
        .unwrap();
    assert_eq!(payload, Some(Value::String(String::new())));
}

#[tokio::test]
async fn test_closed_surface_drops_response() {
    let h = harness();
    drop(h.outbound);
    h.channel.dispatch(MessageIn::request(names::LA_STATUS, 1)).await;
    assert!(
        h.channel
            .sink()
            .send(MessageOut::notification(names::LOG_ALL, json!("")))
            .is_err()
    );
}
