//! Sync engine behavior against scripted transports

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use htp1_core::config::ConnectionTarget;
use htp1_core::sync::{LinkState, SyncEngine, RECONNECT_INTERVAL_MS, STATE_PATH, STREAM_PATH};
use htp1_core::traits::{StateFetcher, StreamTransport};

#[derive(Debug, Default)]
struct FetchScript {
    responses: VecDeque<Result<Vec<u8>, ()>>,
    requests: Vec<(String, String, u32)>,
}

#[derive(Clone, Default)]
struct ScriptedFetcher(Rc<RefCell<FetchScript>>);

impl ScriptedFetcher {
    fn respond(&self, body: &str) {
        self.0.borrow_mut().responses.push_back(Ok(body.as_bytes().to_vec()));
    }

    fn fail(&self) {
        self.0.borrow_mut().responses.push_back(Err(()));
    }

    fn request_count(&self) -> usize {
        self.0.borrow().requests.len()
    }
}

impl StateFetcher for ScriptedFetcher {
    type Error = ();

    fn fetch(
        &mut self,
        host: &str,
        path: &str,
        timeout_ms: u32,
        body: &mut [u8],
    ) -> Result<usize, ()> {
        let mut script = self.0.borrow_mut();
        script.requests.push((host.to_owned(), path.to_owned(), timeout_ms));
        let response = script.responses.pop_front().unwrap_or(Err(()))?;
        let len = response.len().min(body.len());
        body[..len].copy_from_slice(&response[..len]);
        Ok(len)
    }
}

#[derive(Debug, Default)]
struct StreamScript {
    connect_results: VecDeque<Result<(), ()>>,
    handshake_results: VecDeque<Result<(), ()>>,
    frames: VecDeque<Result<Vec<u8>, ()>>,
    connects: Vec<(String, u16)>,
    handshakes: Vec<String>,
    open: bool,
    closes: usize,
}

#[derive(Clone, Default)]
struct ScriptedStream(Rc<RefCell<StreamScript>>);

impl ScriptedStream {
    fn accept(&self) {
        let mut script = self.0.borrow_mut();
        script.connect_results.push_back(Ok(()));
        script.handshake_results.push_back(Ok(()));
    }

    fn refuse(&self) {
        self.0.borrow_mut().connect_results.push_back(Err(()));
    }

    fn send(&self, frame: &str) {
        self.0
            .borrow_mut()
            .frames
            .push_back(Ok(frame.as_bytes().to_vec()));
    }

    fn break_read(&self) {
        self.0.borrow_mut().frames.push_back(Err(()));
    }

    fn hang_up(&self) {
        self.0.borrow_mut().open = false;
    }

    fn connect_count(&self) -> usize {
        self.0.borrow().connects.len()
    }
}

impl StreamTransport for ScriptedStream {
    type Error = ();

    fn connect(&mut self, host: &str, port: u16) -> Result<(), ()> {
        let mut script = self.0.borrow_mut();
        script.connects.push((host.to_owned(), port));
        let result = script.connect_results.pop_front().unwrap_or(Err(()));
        script.open = result.is_ok();
        result
    }

    fn handshake(&mut self, _host: &str, path: &str) -> Result<(), ()> {
        let mut script = self.0.borrow_mut();
        script.handshakes.push(path.to_owned());
        script.handshake_results.pop_front().unwrap_or(Err(()))
    }

    fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut script = self.0.borrow_mut();
        match script.frames.pop_front() {
            None => Ok(0),
            Some(Err(())) => Err(()),
            Some(Ok(frame)) => {
                let len = frame.len().min(buf.len());
                buf[..len].copy_from_slice(&frame[..len]);
                Ok(len)
            }
        }
    }

    fn is_open(&self) -> bool {
        self.0.borrow().open
    }

    fn close(&mut self) {
        let mut script = self.0.borrow_mut();
        if script.open {
            script.closes += 1;
        }
        script.open = false;
    }
}

const STATE: &str = r#"{
    "volume": -40,
    "muted": false,
    "input": "h1",
    "status": {
        "DECSourceProgram": "Dolby TrueHD",
        "DECProgramFormat": "Atmos",
        "SurroundMode": "Native",
        "ENCListeningFormat": "7.1.4"
    }
}"#;

fn engine() -> (
    SyncEngine<ScriptedFetcher, ScriptedStream>,
    ScriptedFetcher,
    ScriptedStream,
) {
    let fetcher = ScriptedFetcher::default();
    let stream = ScriptedStream::default();
    let engine = SyncEngine::new(
        fetcher.clone(),
        stream.clone(),
        ConnectionTarget::new("192.168.1.40", 80, 7),
    );
    (engine, fetcher, stream)
}

/// Drive the engine through fetch, connect and handshake
fn connect(
    engine: &mut SyncEngine<ScriptedFetcher, ScriptedStream>,
    fetcher: &ScriptedFetcher,
    stream: &ScriptedStream,
) {
    fetcher.respond(STATE);
    stream.accept();
    assert!(engine.poll(0), "initial fetch should populate the status");
    assert!(!engine.poll(10));
    assert_eq!(engine.link_state(), LinkState::Connecting);
    assert!(!engine.poll(20));
    assert_eq!(engine.link_state(), LinkState::Connected);
    engine.take_dirty();
}

#[test]
fn test_unconfigured_target_does_nothing() {
    let fetcher = ScriptedFetcher::default();
    let stream = ScriptedStream::default();
    let mut engine = SyncEngine::new(fetcher.clone(), stream.clone(), ConnectionTarget::default());

    for now in (0..20_000).step_by(100) {
        assert!(!engine.poll(now));
    }
    assert_eq!(fetcher.request_count(), 0);
    assert_eq!(stream.connect_count(), 0);
}

#[test]
fn test_first_poll_fetches_full_state() {
    let (mut engine, fetcher, _stream) = engine();
    fetcher.respond(STATE);

    assert!(engine.poll(0));
    let status = engine.status();
    assert_eq!(status.volume, -40);
    assert_eq!(status.display_volume(), -33);
    assert_eq!(status.input_label.as_str(), "h1");
    assert_eq!(status.listening_format.as_str(), "7.1.4");

    let script = fetcher.0.borrow();
    assert_eq!(
        script.requests[0],
        ("192.168.1.40".to_owned(), STATE_PATH.to_owned(), 2000)
    );
}

#[test]
fn test_connect_then_handshake_on_separate_polls() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    let script = stream.0.borrow();
    assert_eq!(script.connects, vec![("192.168.1.40".to_owned(), 80)]);
    assert_eq!(script.handshakes, vec![STREAM_PATH.to_owned()]);
    drop(script);
    assert!(engine.connectivity());
}

#[test]
fn test_update_frame_applied_as_batch() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    stream.send(
        r#"msoupdate [{"op":"replace","path":"/volume","value":-30},{"op":"replace","path":"/muted","value":true}]"#,
    );
    assert!(engine.poll(100));
    assert_eq!(engine.status().volume, -30);
    assert!(engine.status().muted);
    assert!(engine.take_dirty());
    assert!(!engine.take_dirty());
}

#[test]
fn test_unknown_and_redundant_patches_do_not_wake() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    stream.send(r#"msoupdate [{"path":"/bass/level","value":2},{"path":"/volume","value":-40}]"#);
    assert!(!engine.poll(100));
    assert!(!engine.take_dirty());
}

#[test]
fn test_identical_fetch_is_not_a_change() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    fetcher.respond(STATE);
    assert!(!engine.poll(3000));
    assert!(!engine.take_dirty());
    assert_eq!(fetcher.request_count(), 2);
}

#[test]
fn test_periodic_fetch_heals_missed_update() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    // Stream is quiet between fetches
    for now in (100..3000).step_by(100) {
        assert!(!engine.poll(now));
    }
    assert_eq!(fetcher.request_count(), 1);

    fetcher.respond(r#"{"volume":-22,"status":{"SurroundMode":"Dolby Surround"}}"#);
    assert!(engine.poll(3000));
    assert_eq!(engine.status().volume, -22);
    assert_eq!(engine.status().surround_mode.as_str(), "Dolby Surround");
    assert_eq!(engine.status().codec_name.as_str(), "Dolby TrueHD");
}

#[test]
fn test_failed_or_malformed_fetch_keeps_state() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    fetcher.fail();
    assert!(!engine.poll(3000));
    fetcher.respond("<html>busy</html>");
    assert!(!engine.poll(6000));
    assert_eq!(engine.status().volume, -40);
    assert!(engine.connectivity());
}

#[test]
fn test_dump_frame_requests_resync() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    stream.send(r#"mso {"volume":-10,"muted":true}"#);
    assert!(!engine.poll(100));
    // The dump itself is not parsed
    assert_eq!(engine.status().volume, -40);

    fetcher.respond(r#"{"volume":-10}"#);
    assert!(engine.poll(200));
    assert_eq!(fetcher.request_count(), 2);
    assert_eq!(engine.status().volume, -10);
}

#[test]
fn test_read_error_disconnects() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    stream.break_read();
    assert!(!engine.poll(100));
    assert_eq!(engine.link_state(), LinkState::Disconnected);
    assert!(!engine.connectivity());
    assert_eq!(stream.0.borrow().closes, 1);
}

#[test]
fn test_peer_close_disconnects() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    stream.hang_up();
    assert!(!engine.poll(100));
    assert_eq!(engine.link_state(), LinkState::Disconnected);
}

#[test]
fn test_reconnect_throttled_to_one_attempt_per_window() {
    let (mut engine, fetcher, stream) = engine();
    fetcher.respond(STATE);
    stream.refuse();

    engine.poll(0); // fetch
    engine.poll(10); // first connect attempt, refused
    assert_eq!(stream.connect_count(), 1);
    assert_eq!(engine.link_state(), LinkState::Disconnected);

    for now in (20..10 + RECONNECT_INTERVAL_MS).step_by(10) {
        engine.poll(now);
    }
    assert_eq!(stream.connect_count(), 1);

    stream.refuse();
    engine.poll(10 + RECONNECT_INTERVAL_MS);
    assert_eq!(stream.connect_count(), 2);
}

#[test]
fn test_handshake_failure_returns_to_disconnected() {
    let (mut engine, fetcher, stream) = engine();
    fetcher.respond(STATE);
    stream.0.borrow_mut().connect_results.push_back(Ok(()));
    stream.0.borrow_mut().handshake_results.push_back(Err(()));

    engine.poll(0);
    engine.poll(10);
    assert_eq!(engine.link_state(), LinkState::Connecting);
    engine.poll(20);
    assert_eq!(engine.link_state(), LinkState::Disconnected);
    assert!(!stream.is_open());

    // No new attempt until the window has passed
    engine.poll(30);
    assert_eq!(stream.connect_count(), 1);
}

#[test]
fn test_no_attempt_while_handshake_pending() {
    let (mut engine, fetcher, stream) = engine();
    fetcher.respond(STATE);
    stream.accept();

    engine.poll(0);
    engine.poll(10);
    assert_eq!(engine.link_state(), LinkState::Connecting);
    // Even after the throttle window, the pending handshake runs first
    engine.poll(10 + RECONNECT_INTERVAL_MS + 1);
    assert_eq!(stream.connect_count(), 1);
}

#[test]
fn test_set_target_applies_offset_now_and_host_on_next_attempt() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    engine.set_target("htp1.local", 8080, 5);
    assert_eq!(engine.status().display_volume(), -35);
    assert!(engine.take_dirty());
    // Existing connection is kept
    assert!(engine.connectivity());

    stream.break_read();
    engine.poll(100);
    assert_eq!(engine.link_state(), LinkState::Disconnected);

    stream.accept();
    engine.poll(3000); // periodic fetch comes first
    engine.poll(10 + RECONNECT_INTERVAL_MS);
    assert_eq!(engine.link_state(), LinkState::Connecting);
    assert_eq!(
        stream.0.borrow().connects.last(),
        Some(&("htp1.local".to_owned(), 8080))
    );
}

#[test]
fn test_same_offset_does_not_wake() {
    let (mut engine, fetcher, stream) = engine();
    connect(&mut engine, &fetcher, &stream);

    engine.set_target("192.168.1.40", 80, 7);
    assert!(!engine.take_dirty());
}
