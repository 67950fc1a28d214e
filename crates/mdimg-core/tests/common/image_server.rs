//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of routes. Each route answers with a status line and
//! body, a redirect, or a delayed response (to exercise timeouts). Unknown
//! paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// `200 OK` with this body.
    Ok(Vec<u8>),
    /// Given status with an empty body.
    Status(u16),
    /// `302 Found` pointing at another path on this server.
    Redirect(String),
    /// Sleep, then `200 OK` with this body.
    Slow(Duration, Vec<u8>),
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    // Routes are keyed without the query string.
    let path = path.split('?').next().unwrap_or(path);

    match routes.get(path) {
        Some(Route::Ok(body)) => respond(&mut stream, "200 OK", "", body),
        Some(Route::Status(code)) => {
            respond(&mut stream, &format!("{} Status", code), "", b"")
        }
        Some(Route::Redirect(to)) => {
            respond(&mut stream, "302 Found", &format!("Location: {}\r\n", to), b"")
        }
        Some(Route::Slow(delay, body)) => {
            thread::sleep(*delay);
            respond(&mut stream, "200 OK", "", body)
        }
        None => respond(&mut stream, "404 Not Found", "", b""),
    }
}

fn respond(stream: &mut std::net::TcpStream, status: &str, extra_headers: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status,
        body.len(),
        extra_headers
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
