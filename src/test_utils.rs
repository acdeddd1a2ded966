//! Helpers shared by tests: a tiny blocking HTTP server on localhost and
//! log capture

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

pub struct TestServer {
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl TestServer {
    /// Wait for the server to finish and return the raw requests it received
    pub fn requests(self) -> Vec<String> {
        self.handle.join().expect("test server panicked")
    }
}

/// Serve exactly `expected` requests, answering each path from `routes`
/// with `(status, body)`; unknown paths get a 404.
pub fn serve(routes: Vec<(&str, u16, &str)>, expected: usize) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let routes: HashMap<String, (u16, String)> = routes
        .into_iter()
        .map(|(path, status, body)| (path.to_string(), (status, body.to_string())))
        .collect();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for stream in listener.incoming().take(expected) {
            let mut stream = stream.expect("accept");
            let request = read_request(&mut stream);
            let path = request
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/")
                .to_string();

            let (status, body) = routes
                .get(&path)
                .cloned()
                .unwrap_or((404, "not found".to_string()));
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).expect("write response");
            seen.push(request);
        }
        seen
    });

    TestServer { base_url, handle }
}

fn read_request(stream: &mut impl Read) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).expect("read request");
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&request).into_owned()
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug-level subscriber and return everything it logged
pub fn capture_logs<F: FnOnce()>(f: F) -> String {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
