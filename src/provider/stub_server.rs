//! Minimal HTTP/1.1 server for exercising the real gateway in tests.
//!
//! Every response closes the connection, so each gateway attempt shows up as
//! one accepted connection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const CHAT_OK: &str = r#"{"model":"gpt-4-0613","choices":[{"message":{"role":"assistant","content":"[USER: NTA]\n[OTHERS: YTA]\nFine."}}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;

#[derive(Debug, Clone)]
pub enum StubReply {
    /// Status code and JSON body
    Respond(u16, &'static str),
    /// Read the request, then hold the connection open without answering
    Silent,
}

pub struct StubServer {
    pub base: String,
    connections: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Serve `replies` in order, one per connection; the last one repeats
    pub async fn start(replies: Vec<StubReply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let connections = Arc::new(AtomicUsize::new(0));
        let bodies = Arc::new(Mutex::new(Vec::new()));

        let (accepted, received) = (connections.clone(), bodies.clone());
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let n = accepted.fetch_add(1, Ordering::SeqCst);
                let reply = replies.get(n).or(replies.last()).cloned();
                let received = received.clone();

                tokio::spawn(async move {
                    let body = read_request(&mut stream).await;
                    received.lock().unwrap().push(body);

                    match reply {
                        Some(StubReply::Respond(status, body)) => {
                            let response = format!(
                                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                                body.len()
                            );
                            let _ = stream.write_all(response.as_bytes()).await;
                            let _ = stream.shutdown().await;
                        }
                        Some(StubReply::Silent) | None => {
                            tokio::time::sleep(Duration::from_secs(60)).await;
                        }
                    }
                });
            }
        });

        Self {
            base,
            connections,
            bodies,
        }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Request bodies received so far, in arrival order
    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

/// Read one request and return its body
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return String::new(),
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);

            let start = end + 4;
            if buf.len() >= start + len {
                return String::from_utf8_lossy(&buf[start..start + len]).into_owned();
            }
        }
    }
}
