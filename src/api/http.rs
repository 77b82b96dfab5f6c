//! Implements the `Remote` trait over HTTP with `reqwest`.

use crate::api::{Remote, Reply};
use crate::Result;
use anyhow::Context;
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

/// Sends each request to the backend rooted at `base_url`. There are no retries, timeouts or
/// caching: every call is one fresh request.
///
/// Endpoint paths are resolved below `base_url`, so a backend mounted under a path prefix such as
/// `http://host/backend` receives `/backend/api/expenses`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: Url,
}

impl HttpRemote {
    pub fn new(mut base_url: Url) -> Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Remote for HttpRemote {
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Reply> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Unable to build a URL from {} and {path}", self.base_url))?;

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{method} {url} failed"))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .with_context(|| format!("Unable to read the response body of {method} {url}"))?;
        Ok(Reply::new(status, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// What the stub server saw.
    #[derive(Debug)]
    struct Seen {
        request_line: String,
        body: String,
    }

    /// Starts a server that answers exactly one request with `status` and `body`, then reports
    /// the request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, oneshot::Receiver<Seen>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before the headers were complete");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(ix) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break ix + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let _ = tx.send(Seen {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
            });
        });
        (Url::parse(&format!("http://{addr}")).unwrap(), rx)
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let (url, seen) = serve_once("201 Created", r#"{"id":1}"#).await;
        let remote = HttpRemote::new(url).unwrap();
        let reply = remote
            .send(Method::POST, "/api/expenses", Some(json!({"amount": 10})))
            .await
            .unwrap();
        assert_eq!(reply.status(), 201);
        assert_eq!(reply.text(), r#"{"id":1}"#);

        let seen = seen.await.unwrap();
        assert_eq!(seen.request_line, "POST /api/expenses HTTP/1.1");
        let body: Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(body, json!({"amount": 10}));
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let (url, seen) = serve_once("200 OK", "[]").await;
        let remote = HttpRemote::new(url.join("/backend").unwrap()).unwrap();
        assert_eq!(remote.base_url().path(), "/backend/");
        remote.send(Method::GET, "/api/expenses", None).await.unwrap();
        let seen = seen.await.unwrap();
        assert_eq!(seen.request_line, "GET /backend/api/expenses HTTP/1.1");
    }

    #[tokio::test]
    async fn test_no_content() {
        let (url, seen) = serve_once("204 No Content", "").await;
        let remote = HttpRemote::new(url).unwrap();
        let reply = remote
            .send(Method::DELETE, "/api/incomes/4", None)
            .await
            .unwrap();
        assert_eq!(reply.status(), 204);
        assert_eq!(reply.text(), "");
        let seen = seen.await.unwrap();
        assert_eq!(seen.request_line, "DELETE /api/incomes/4 HTTP/1.1");
        assert!(seen.body.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_a_reply() {
        let (url, _seen) = serve_once("400 Bad Request", r#"{"detail":"bad amount"}"#).await;
        let remote = HttpRemote::new(url).unwrap();
        let reply = remote.send(Method::GET, "/api/stats", None).await.unwrap();
        assert_eq!(reply.status(), 400);
        assert_eq!(reply.text(), r#"{"detail":"bad amount"}"#);
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let remote = HttpRemote::new(Url::parse(&format!("http://{addr}")).unwrap()).unwrap();
        let e = remote
            .send(Method::GET, "/api/expenses", None)
            .await
            .unwrap_err();
        assert!(format!("{e:#}").contains("GET"));
    }
}
