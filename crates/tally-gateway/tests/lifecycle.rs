#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use tally_gateway::{app_state::AppState, config::GatewayConfig, router, server::Server};

async fn start(cfg: GatewayConfig) -> (std::net::SocketAddr, AppState, tokio_util::sync::CancellationToken, tokio::task::JoinHandle<tally_core::Result<()>>) {
    let state = AppState::new(cfg);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = Server::from_listener(listener, state.clone());
    let addr = server.local_addr().unwrap();
    let cancel = server.cancel_token();
    let app = router::build_router(state.clone());
    let handle = tokio::spawn(server.run(app));
    (addr, state, cancel, handle)
}

#[tokio::test]
async fn serves_over_tcp_then_stops_on_cancel() {
    let (addr, state, cancel, handle) = start(GatewayConfig::default()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let body = r#"{"value":41}"#;
    let req = format!(
        "POST /increment HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(req.as_bytes()).await.unwrap();
    let mut resp = String::new();
    stream.read_to_string(&mut resp).await.unwrap();
    assert!(resp.starts_with("HTTP/1.1 200"), "resp={resp}");
    assert!(resp.ends_with(r#"{"value":42}"#), "resp={resp}");

    cancel.cancel();
    let res = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server must stop within the grace period")
        .unwrap();
    assert!(res.is_ok());
    assert!(state.is_draining());
}

#[tokio::test]
async fn idle_connection_does_not_block_shutdown() {
    let (addr, _state, cancel, handle) = start(GatewayConfig::default()).await;

    // Open a connection and never send a request.
    let _idle = TcpStream::connect(addr).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    cancel.cancel();
    let res = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("drain must be bounded")
        .unwrap();
    assert!(res.is_ok());
}

#[tokio::test]
async fn bind_rejects_address_in_use() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();

    let mut cfg = GatewayConfig::default();
    cfg.server.listen = addr.to_string();
    let err = Server::bind(AppState::new(cfg)).await.err().expect("bind must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}

const BODY: &str = r#"{"value":41}"#;

fn increment_head() -> String {
    format!(
        "POST /increment HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        BODY.len()
    )
}

async fn wait_for_in_flight(state: &AppState, want: i64) {
    for _ in 0..200 {
        if state.metrics().in_flight.get(&[("op", "increment")]) == want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("in-flight gauge never reached {want}");
}

#[tokio::test]
async fn in_flight_gauge_covers_body_read() {
    let (addr, state, cancel, handle) = start(GatewayConfig::default()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(increment_head().as_bytes()).await.unwrap();
    wait_for_in_flight(&state, 1).await;

    tokio::time::sleep(Duration::from_millis(20)).await;
    stream.write_all(BODY.as_bytes()).await.unwrap();
    let mut resp = String::new();
    stream.read_to_string(&mut resp).await.unwrap();
    assert!(resp.ends_with(r#"{"value":42}"#), "resp={resp}");

    let m = state.metrics();
    assert_eq!(m.in_flight.get(&[("op", "increment")]), 0);
    assert_eq!(m.request_duration.count(&[("op", "increment")]), 1);
    assert!(m.render().contains("tally_request_duration_micros_bucket{op=\"increment\",le=\"50\"} 0"));

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn drain_deadline_aborts_stalled_request() {
    let mut cfg = GatewayConfig::default();
    cfg.server.shutdown_grace_ms = 200;
    let (addr, state, cancel, handle) = start(cfg).await;

    // Head only: the request stays in flight waiting for its body.
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(increment_head().as_bytes()).await.unwrap();
    wait_for_in_flight(&state, 1).await;

    let started = Instant::now();
    cancel.cancel();
    let res = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("run must return after the deadline")
        .unwrap();
    assert!(res.is_ok());
    assert!(started.elapsed() >= Duration::from_millis(150), "returned before the deadline");
    assert_eq!(state.metrics().in_flight.get(&[("op", "increment")]), 0);

    // The connection is gone: late body bytes get no response.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let _ = stream.write_all(BODY.as_bytes()).await;
    let mut buf = Vec::new();
    let _ = tokio::time::timeout(Duration::from_secs(2), stream.read_to_end(&mut buf))
        .await
        .expect("socket must be closed");
    let text = String::from_utf8_lossy(&buf);
    assert!(!text.contains("200 OK"), "resp={text}");
}
