#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// A local HTTP responder that answers one connection per queued response,
/// in order, and hands back the raw requests it received.
pub struct CannedServer {
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl CannedServer {
    pub fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let addr = listener.local_addr().expect("local addr");

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().expect("accept connection");
                seen.push(read_request(&mut stream));
                stream.write_all(response.as_bytes()).expect("write response");
                stream.flush().expect("flush response");
            }
            seen
        });

        Self {
            base_url: format!("http://{}", addr),
            handle,
        }
    }

    /// Wait until every queued response was served.
    pub fn requests(self) -> Vec<String> {
        self.handle.join().expect("server thread panicked")
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request = String::new();
    let mut content_length = 0usize;

    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read request line");
        if line.is_empty() || line == "\r\n" {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().expect("content length");
        }
        request.push_str(&line);
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).expect("read request body");
    request.push_str("\r\n");
    request.push_str(&String::from_utf8_lossy(&body));
    request
}

pub fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(body);
    out
}

pub fn ok_form(body: &str) -> String {
    response(
        "200 OK",
        &[("Content-Type", "application/x-www-form-urlencoded")],
        body,
    )
}

pub fn ok_json(body: &str) -> String {
    response("200 OK", &[("Content-Type", "application/json")], body)
}

pub fn rejected(status: &str, message: &str, code: &str) -> String {
    response(status, &[("X-Error", message), ("X-Error-Code", code)], "")
}
