mod common;

use std::process::Command;
use std::sync::mpsc;
use std::thread;

use fastwebsockets::OpCode;
use monoio::net::TcpListener;

use common::{block_on, echo_once};

const PROBE_ADDR: &str = "localhost:8765";

// Both phases share the fixed endpoint, so they run inside one test.
#[test]
fn probe_binary_end_to_end() {
    // Nothing is listening yet: the probe must fail without printing either
    // product line, and the diagnostic must name a connection failure.
    let output = Command::new(env!("CARGO_BIN_EXE_ws-probe"))
        .output()
        .expect("run ws-probe");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Sent:"), "stdout was: {stdout}");
    assert!(!stdout.contains("Received:"), "stdout was: {stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("connection error"), "stderr was: {stderr}");

    // Same endpoint with an echo server behind it: both lines on stdout, in
    // order, and a clean exit.
    let (ready_tx, ready_rx) = mpsc::channel();
    let server = thread::spawn(move || {
        block_on(async move {
            let listener = TcpListener::bind(PROBE_ADDR).expect("bind probe endpoint");
            ready_tx.send(()).expect("signal readiness");
            echo_once(&listener).await.expect("serve one probe")
        })
    });
    ready_rx.recv().expect("server readiness");

    let output = Command::new(env!("CARGO_BIN_EXE_ws-probe"))
        .output()
        .expect("run ws-probe");
    let report = server.join().expect("server thread");

    assert!(
        output.status.success(),
        "stderr was: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Sent: Hello, server!\nReceived: Hello, server!\n"
    );
    assert_eq!(report.message, "Hello, server!");
    assert_eq!(report.farewell, OpCode::Close);
    assert!(report.peer_gone);
}
