//! HTTP contract tests for `AgentClient` against a canned single-request
//! server on a loopback socket.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use weft::client::{AgentClient, ClientError};
use weft::config::{BackendConfig, ModuleToggles};

/// Serve exactly one request with a fixed response; returns the captured
/// request text on join.
struct CannedServer {
    url: String,
    handle: thread::JoinHandle<String>,
}

fn serve(status_line: &str, body: &str) -> CannedServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let url = format!("http://{}", listener.local_addr().unwrap());
    let status_line = status_line.to_string();
    let body = body.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        request
    });

    CannedServer { url, handle }
}

/// Read one HTTP request (headers plus a Content-Length body, if any).
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = find_header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn client_for(url: &str) -> AgentClient {
    AgentClient::new(&BackendConfig {
        url: url.to_string(),
        timeout_secs: 5,
    })
}

#[test]
fn health_parses_status_and_modules() {
    let server = serve(
        "200 OK",
        r#"{"status":"healthy","modules_active":["retrieval","memory"]}"#,
    );
    let check = client_for(&server.url).health().unwrap();

    assert_eq!(check.status, "healthy");
    assert_eq!(check.modules_active, vec!["retrieval", "memory"]);

    let request = server.handle.join().unwrap();
    assert!(request.starts_with("GET /health"));
}

#[test]
fn snapshot_with_missing_keys_is_empty_not_an_error() {
    let server = serve("200 OK", "{}");
    let snapshot = client_for(&server.url).memory_snapshot().unwrap();

    assert!(snapshot.concepts.is_empty());
    assert!(snapshot.concept_index.is_empty());

    let request = server.handle.join().unwrap();
    assert!(request.starts_with("GET /memory"));
}

#[test]
fn chat_posts_enabled_modules_only() {
    let server = serve(
        "200 OK",
        r#"{"response":"hello there","processing_time":0.42,"logs":["recalled 2 messages"]}"#,
    );

    let mut modules = ModuleToggles::defaults();
    modules.set("reflection", false).unwrap();

    let reply = client_for(&server.url)
        .chat("hello", Some("session-1"), &modules)
        .unwrap();
    assert_eq!(reply.response, "hello there");
    assert!((reply.processing_time - 0.42).abs() < 1e-9);
    assert_eq!(reply.logs.len(), 1);

    let request = server.handle.join().unwrap();
    assert!(request.starts_with("POST /chat"));
    assert!(request.contains("\"message\":\"hello\""));
    assert!(request.contains("\"session_id\":\"session-1\""));
    assert!(request.contains("retrieval"));
    assert!(!request.contains("reflection"));
}

#[test]
fn non_success_status_maps_to_status_error() {
    let server = serve("503 Service Unavailable", r#"{"detail":"agent not initialized"}"#);
    let err = client_for(&server.url).health().unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 503, .. }));
    let _ = server.handle.join();
}

#[test]
fn unreachable_backend_maps_to_request_error() {
    // Grab a free port, then close the listener so nothing serves it.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client_for(&url).memory_snapshot().unwrap_err();
    assert!(matches!(err, ClientError::Request { .. }));
}
