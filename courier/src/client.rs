use std::{collections::HashMap, time::Duration};
use tracing::instrument;

use crate::{
    config::ClientConfig,
    connection::Connection,
    http::{HttpRequest, Method},
    response::HttpResponse,
    Result,
};

/// Configurable HTTP client.
///
/// Setters take `&mut self` and request methods take `&self`, so the
/// configuration cannot change while a request is running. Each request
/// resolves once the whole response body has been read.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.config.set_connect_timeout(timeout);
    }

    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.config.set_read_timeout(timeout);
    }

    pub fn set_trust_all_certificates(&mut self, trust_all: bool) {
        self.config.set_trust_all_certificates(trust_all);
    }

    pub fn set_http_proxy(&mut self, host: impl Into<String>, port: u16) {
        self.config.set_http_proxy(host, port);
    }

    pub fn set_socks_proxy(&mut self, host: impl Into<String>, port: u16) {
        self.config.set_socks_proxy(host, port);
    }

    pub fn clear_proxy(&mut self) {
        self.config.clear_proxy();
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.config.set_header(name, value);
    }

    pub fn set_headers(&mut self, headers: HashMap<String, String>) {
        self.config.set_headers(headers);
    }

    pub fn set_json(&mut self) {
        self.config.set_json();
    }

    #[instrument(skip(self))]
    pub async fn send_get_request(&self, url: &str) -> Result<HttpResponse> {
        Connection::open(&self.config, Method::GET, url)?
            .execute()
            .await
    }

    #[instrument(skip(self, body))]
    pub async fn send_post_request(&self, url: &str, body: &str) -> Result<HttpResponse> {
        Connection::open(&self.config, Method::POST, url)?
            .body(body.as_bytes().to_vec())
            .execute()
            .await
    }

    #[instrument(skip(self, body))]
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse> {
        let connection = Connection::open(&self.config, method, url)?;
        match body {
            Some(body) => connection.body(body),
            None => connection,
        }
        .execute()
        .await
    }

    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let connection =
            Connection::open(&self.config, request.method, &request.url)?.headers(&request.headers)?;
        if request.body.is_empty() {
            connection.execute().await
        } else {
            connection.body(request.body).execute().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hashmap,
        tests::server::{self, StubServer},
        Error, RequestError,
    };

    fn url(server: &StubServer, path: &str) -> String {
        format!("http://{}{}", server.addr(), path)
    }

    #[tokio::test]
    async fn test_default_get() {
        let mut server = server::http(server::response(200, &[], "hello\nworld\n")).await;
        let client = HttpClient::new();
        let response = client.send_get_request(&url(&server, "/get")).await.unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body(), "hello\nworld\n");
        assert_eq!(response.header("content-length"), Some("12"));

        let request = server.next_request().await;
        assert_eq!(request.request_line(), "GET /get HTTP/1.1");
    }

    #[tokio::test]
    async fn test_configured_headers_are_sent() {
        let mut server = server::http(server::response(200, &[], "ok")).await;
        let mut client = HttpClient::new();
        client.set_headers(hashmap! {
            "X-Token".to_string() => "secret".to_string(),
            "Accept".to_string() => "text/plain".to_string(),
        });
        client.set_header("User-Agent", "Custom User Agent");
        client.send_get_request(&url(&server, "/")).await.unwrap();

        let request = server.next_request().await;
        assert_eq!(request.header("x-token"), Some("secret"));
        assert_eq!(request.header("accept"), Some("text/plain"));
        assert_eq!(request.header("user-agent"), Some("Custom User Agent"));
    }

    #[tokio::test]
    async fn test_post_body_sent_once() {
        let mut server = server::http(server::response(201, &[], "created")).await;
        let mut client = HttpClient::new();
        client.set_json();
        let response = client
            .send_post_request(&url(&server, "/post"), "a=1&b=2")
            .await
            .unwrap();
        assert_eq!(response.status_code(), 201);
        assert_eq!(response.body(), "created");

        let request = server.next_request().await;
        assert_eq!(request.request_line(), "POST /post HTTP/1.1");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("content-length"), Some("7"));
        assert_eq!(request.body, b"a=1&b=2");
    }

    #[tokio::test]
    async fn test_error_status_returns_error_body() {
        let server = server::http(server::response(404, &[], "no such page")).await;
        let client = HttpClient::new();
        let response = client.send_get_request(&url(&server, "/missing")).await.unwrap();
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.body(), "no such page");
    }

    #[tokio::test]
    async fn test_multi_valued_headers() {
        let server = server::http(server::response(
            200,
            &[("X-Multi", "first"), ("X-Multi", "second")],
            "",
        ))
        .await;
        let client = HttpClient::new();
        let response = client.send_get_request(&url(&server, "/")).await.unwrap();
        assert_eq!(response.header("X-Multi"), Some("first"));
        assert_eq!(response.headers()["x-multi"], vec!["first", "second"]);
        assert_eq!(response.header("X-Absent"), None);
    }

    #[tokio::test]
    async fn test_http_proxy_routing() {
        let mut proxy = server::http(server::response(200, &[], "via proxy")).await;
        let mut client = HttpClient::new();
        client.set_http_proxy("127.0.0.1", proxy.addr().port());
        let response = client
            .send_get_request("http://courier.invalid/get")
            .await
            .unwrap();
        assert_eq!(response.body(), "via proxy");

        let request = proxy.next_request().await;
        assert_eq!(
            request.request_line(),
            "GET http://courier.invalid/get HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_generic_request() {
        let mut server = server::http(server::response(204, &[], "")).await;
        let mut client = HttpClient::new();
        client.set_header("X-Scope", "client");
        let mut request = HttpRequest::post(url(&server, "/items/1"), b"{}".to_vec());
        request.method = Method::from_bytes(b"PUT").unwrap();
        request.headers.insert("X-Scope".to_string(), "request".to_string());
        let response = client.request(request).await.unwrap();
        assert_eq!(response.status_code(), 204);
        assert!(response.bytes().is_empty());

        let request = server.next_request().await;
        assert_eq!(request.request_line(), "PUT /items/1 HTTP/1.1");
        assert_eq!(request.header("x-scope"), Some("request"));
        assert_eq!(request.body, b"{}");

        let response = client
            .send(Method::from_bytes(b"DELETE").unwrap(), &url(&server, "/items/1"), None)
            .await
            .unwrap();
        assert_eq!(response.status_code(), 204);
        let request = server.next_request().await;
        assert_eq!(request.request_line(), "DELETE /items/1 HTTP/1.1");
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn test_trust_all_certificates() {
        let server = server::https(server::response(200, &[], "secure")).await;
        let target = format!("https://{}/", server.addr());

        let client = HttpClient::new();
        assert!(matches!(
            client.send_get_request(&target).await,
            Err(Error::Io(_))
        ));

        let mut client = HttpClient::new();
        client.set_trust_all_certificates(true);
        let response = client.send_get_request(&target).await.unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body(), "secure");
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = HttpClient::new();
        assert!(matches!(
            client.send_get_request("http//broken").await,
            Err(Error::Request(RequestError::InvalidUrl(_)))
        ));
        assert!(matches!(
            client.send_post_request("mailto:someone@example.com", "x").await,
            Err(Error::Request(RequestError::InvalidUrl(_)))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut client = HttpClient::new();
        client.set_connect_timeout(Duration::from_millis(500));
        assert!(matches!(
            client.send_get_request(&format!("http://{}/", addr)).await,
            Err(Error::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_socks_proxy_routing() {
        let mut proxy = server::socks(server::response(200, &[], "via socks")).await;
        let mut client = HttpClient::new();
        client.set_socks_proxy("127.0.0.1", proxy.addr().port());
        let response = client
            .send_get_request("http://courier.invalid/get")
            .await
            .unwrap();
        assert_eq!(response.body(), "via socks");

        let request = proxy.next_request().await;
        let tunnel = request.tunnel.as_ref().unwrap();
        assert_eq!(tunnel.greeting, [5, 1, 0]);
        assert_eq!(tunnel.target, "courier.invalid:80");
        assert_eq!(request.request_line(), "GET /get HTTP/1.1");
    }

    #[tokio::test]
    async fn test_read_timeout() {
        let mut server = server::stalled(
            "HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\npart".to_string(),
        )
        .await;
        let mut client = HttpClient::new();
        client.set_read_timeout(Duration::from_millis(200));

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.send_get_request(&url(&server, "/slow")),
        )
        .await
        .expect("read timeout was not enforced");
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(server.next_request().await.request_line(), "GET /slow HTTP/1.1");
    }
}
