//! Minimal HTTP/1.1 server that replays a scripted sequence of replies.
//!
//! Each accepted connection consumes the next reply in the script; once the
//! script is exhausted the last reply is repeated. Hits are counted so tests
//! can assert how many attempts reached the server.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with this status and body.
    Status(u16, &'static str),
    /// Read the request, then close without responding.
    Hangup,
    /// Read the request, wait, then close without responding.
    Stall(Duration),
}

pub fn json(body: &'static str) -> Reply {
    Reply::Status(200, body)
}

pub struct ScriptedServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl ScriptedServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(script: Vec<Reply>) -> ScriptedServer {
    assert!(!script.is_empty(), "script needs at least one reply");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let script = Arc::new(Mutex::new(VecDeque::from(script)));
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let reply = {
                let mut q = script.lock().unwrap();
                if q.len() > 1 {
                    q.pop_front().unwrap()
                } else {
                    q.front().cloned().unwrap()
                }
            };
            hits_srv.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, reply));
        }
    });
    ScriptedServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

/// A base URL on which nothing listens (connection refused).
pub fn closed_base_url() -> String {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").expect("bind");
        l.local_addr().unwrap().port()
    };
    format!("http://127.0.0.1:{}", port)
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

fn handle(mut stream: TcpStream, reply: Reply) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 4096];
    if !matches!(stream.read(&mut buf), Ok(n) if n > 0) {
        return;
    }
    match reply {
        Reply::Status(code, body) => {
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                code,
                reason(code),
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
        Reply::Hangup => {}
        Reply::Stall(d) => thread::sleep(d),
    }
}
