//! Shared utilities for integration testing.

use std::net::SocketAddr;

use echo_api::config::EchoConfig;
use echo_api::http::ECHO_PATH;
use echo_api::{HttpServer, Shutdown};

/// A server running on an ephemeral port; stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    /// Start the echo server with `config`, bound to 127.0.0.1 on any free port.
    pub async fn start(mut config: EchoConfig) -> Self {
        config.listener.host = "127.0.0.1".into();
        config.listener.port = 0;

        let listener = echo_api::net::bind(&config.listener).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let server = HttpServer::new(config);
        tokio::spawn(async move {
            let _ = server.run(listener, signal).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, ECHO_PATH)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// A client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// The lines between `title:` and the next blank line.
#[allow(dead_code)]
pub fn section<'a>(text: &'a str, title: &str) -> &'a str {
    let marker = format!("{title}:\n");
    let start = text.find(&marker).expect("section present") + marker.len();
    let rest = &text[start..];
    rest.find("\n\n").map(|end| &rest[..end]).unwrap_or(rest.trim_end())
}
