// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{FetchError, Result};
use crate::node::SensorNode;

/// Talks to a real device over HTTP.
pub struct HttpSensorNode {
    client: Client,
    endpoint: String,
}

impl HttpSensorNode {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl SensorNode for HttpSensorNode {
    fn fetch(&mut self) -> Result<String> {
        log::debug!("-> GET {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send()?;

        let status = response.status();
        log::debug!("<- {}", status);
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text()?)
    }
}

#[cfg(test)]
fn serve_once(response: &'static str) -> String {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 1024];
        let _ = stream.read(&mut request);
        stream.write_all(response.as_bytes()).unwrap();
    });

    format!("http://{address}/data")
}

#[test]
fn test_http_node_returns_body() {
    let url = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n[]",
    );
    let mut node = HttpSensorNode::new(url, Duration::from_secs(2)).unwrap();

    assert_eq!(node.fetch().unwrap(), "[]");
}

#[test]
fn test_http_node_reports_status() {
    let url = serve_once("HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
    let mut node = HttpSensorNode::new(url, Duration::from_secs(2)).unwrap();

    assert!(matches!(node.fetch(), Err(FetchError::Status(503))));
}

#[test]
fn test_http_node_refused_connection() {
    // Bind and release a port so nothing is listening on it.
    let address = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut node = HttpSensorNode::new(format!("http://{address}/data"), Duration::from_secs(2)).unwrap();

    let err = node.fetch().unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert!(err.to_string().starts_with("Error fetching data"));
}
