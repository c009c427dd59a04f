//! Canned-response HTTP server for platform tests.

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone)]
struct Route {
    prefix: String,
    status: u16,
    body: String,
}

pub struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Serve `(path prefix, status, body)` routes; the longest matching
    /// prefix wins and unmatched paths get a 404. `{base}` in a body is
    /// replaced with the server's own base URL.
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let routes: Vec<Route> = routes
            .into_iter()
            .map(|(prefix, status, body)| Route {
                prefix: prefix.to_string(),
                status,
                body: body.replace("{base}", &base_url),
            })
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = handle(stream, &routes, &log).await;
                });
            }
        });

        Self { base_url, requests }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Raw request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| request_path(r).starts_with(prefix))
            .count()
    }
}

fn request_path(head: &str) -> &str {
    head.split_whitespace().nth(1).unwrap_or("/")
}

async fn handle(
    mut stream: TcpStream,
    routes: &[Route],
    log: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let path = request_path(&head).split('?').next().unwrap_or("/").to_string();
    log.lock().unwrap().push(head);

    let (status, body) = routes
        .iter()
        .filter(|r| path.starts_with(&r.prefix))
        .max_by_key(|r| r.prefix.len())
        .map(|r| (r.status, r.body.clone()))
        .unwrap_or((404, String::from("not found")));

    let response = format!(
        "HTTP/1.1 {} TEST\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
