//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ollama_checker::resilience::backoff::Backoff;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const LLAMA3: &str = r#"{"models":[{"name":"llama3","digest":"abc","modified_at":"2024-05-01T10:00:00Z","size":4661224676}]}"#;
pub const EMPTY: &str = r#"{"models":[]}"#;

/// What a mock backend does with one connection.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(u16, String),
    /// Read the request, then say nothing for this long.
    Hang(Duration),
    /// Send the status line and a few body bytes, then close mid-body.
    Truncated(u16),
}

/// Start a mock backend that always answers 200 with `body`.
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| async move { Reply::Respond(200, body.to_string()) }).await
}

/// Start a programmable mock backend. `f` receives the zero-based
/// connection index; every response closes its connection, so the index is
/// also the attempt number.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let connections = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let index = connections.fetch_add(1, Ordering::SeqCst);
                    let f = f.clone();
                    tokio::spawn(async move {
                        serve_connection(socket, f(index).await).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn serve_connection(mut socket: TcpStream, reply: Reply) {
    read_request_head(&mut socket).await;

    match reply {
        Reply::Respond(status, body) => {
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_text(status),
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Reply::Truncated(status) => {
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: 4096\r\nConnection: close\r\n\r\npartial",
                status_text(status)
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        Reply::Hang(duration) => {
            tokio::time::sleep(duration).await;
        }
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// An address with nothing listening on it.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn endpoint(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Backoff that records each requested delay and returns a fixed one.
#[derive(Debug)]
pub struct RecordingBackoff {
    delay: Duration,
    attempts: Mutex<Vec<u32>>,
}

impl RecordingBackoff {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            attempts: Mutex::new(Vec::new()),
        })
    }

    pub fn attempts(&self) -> Vec<u32> {
        self.attempts.lock().unwrap().clone()
    }
}

impl Backoff for RecordingBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        self.attempts.lock().unwrap().push(attempt);
        self.delay
    }
}
