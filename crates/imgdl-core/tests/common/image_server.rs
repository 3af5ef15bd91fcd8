//! Minimal HTTP/1.1 server that answers HEAD and (ranged) GET for integration tests.
//!
//! Serves a single static body for every path. Header behavior is
//! configurable so tests can exercise typed, untyped and blocked HEADs.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ImageServerOptions {
    /// If true, HEAD returns 405 (simulates servers that block HEAD).
    pub block_head: bool,
    /// `Content-Type` sent on HEAD responses.
    pub head_content_type: Option<&'static str>,
    /// `Content-Type` sent on GET responses.
    pub get_content_type: Option<&'static str>,
    /// `Content-Disposition` sent on every successful response.
    pub content_disposition: Option<&'static str>,
    /// Sleep before answering anything.
    pub delay: Option<Duration>,
    /// Status line for every GET (e.g. "404 Not Found"), with an empty body.
    pub get_status: Option<&'static str>,
}

/// Starts a server in a background thread. Returns the base URL
/// (e.g. "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start(body: Vec<u8>, opts: ImageServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = opts.clone();
            thread::spawn(move || handle(stream, &body, &opts));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

/// A base URL nothing listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: &ImageServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    if let Some(d) = opts.delay {
        thread::sleep(d);
    }
    let (method, range) = parse_request(request);

    let mut extra = String::new();
    if let Some(cd) = opts.content_disposition {
        extra.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }

    if method.eq_ignore_ascii_case("HEAD") {
        if opts.block_head {
            let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
            return;
        }
        if let Some(ct) = opts.head_content_type {
            extra.push_str(&format!("Content-Type: {}\r\n", ct));
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}\r\n",
            body.len(),
            extra
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    if method.eq_ignore_ascii_case("GET") {
        if let Some(status) = opts.get_status {
            let response = format!("HTTP/1.1 {}\r\nContent-Length: 0\r\n\r\n", status);
            let _ = stream.write_all(response.as_bytes());
            return;
        }
        if let Some(ct) = opts.get_content_type {
            extra.push_str(&format!("Content-Type: {}\r\n", ct));
        }
        let (status, slice) = match range {
            Some((start, end_incl)) if start < body.len() as u64 => {
                let end_excl = (end_incl.saturating_add(1)).min(body.len() as u64);
                ("206 Partial Content", &body[start as usize..end_excl as usize])
            }
            _ => ("200 OK", body),
        };
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}\r\n",
            status,
            slice.len(),
            extra
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(slice);
        return;
    }
    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
}

/// Returns (method, optional (start, end_inclusive) for Range: bytes=X-Y).
fn parse_request(request: &str) -> (&str, Option<(u64, u64)>) {
    let mut method = "";
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            method = line.split_whitespace().next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                if let Some(part) = value.trim().strip_prefix("bytes=") {
                    if let Some((a, b)) = part.split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end_incl = b.trim().parse::<u64>().unwrap_or(u64::MAX);
                        range = Some((start, end_incl));
                    }
                }
            }
        }
    }
    (method, range)
}
