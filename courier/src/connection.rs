use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

use crate::{
    config::ClientConfig, http::Method, response::HttpResponse, tls::TlsPolicy, Error,
    RequestError, RequestResult, Result,
};

#[derive(Debug)]
pub struct Connection {
    url: Url,
    method: Method,
    policy: TlsPolicy,
    request: reqwest::RequestBuilder,
}

impl Connection {
    pub fn open(config: &ClientConfig, method: Method, url: &str) -> Result<Self> {
        let url = parse_url(url)?;
        let policy = TlsPolicy::for_target(&url, config.trust_all_certificates);

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .no_proxy();
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.to_reqwest()?);
        }
        let client = policy.apply(builder).build().map_err(Error::TlsInit)?;

        debug!(
            %method,
            %url,
            proxy = ?config.proxy.as_ref().map(|proxy| proxy.url()),
            trust_all = policy.is_permissive(),
            "opening connection"
        );

        let request = client
            .request(method.to_reqwest(), url.clone())
            .headers(header_map(&config.headers)?);
        Ok(Self {
            url,
            method,
            policy,
            request,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn policy(&self) -> TlsPolicy {
        self.policy
    }

    /// Adds headers on top of the configured ones, replacing same-named ones.
    pub fn headers(mut self, headers: &HashMap<String, String>) -> Result<Self> {
        if !headers.is_empty() {
            self.request = self.request.headers(header_map(headers)?);
        }
        Ok(self)
    }

    pub fn body(mut self, body: impl Into<reqwest::Body>) -> Self {
        self.request = self.request.body(body);
        self
    }

    pub async fn execute(self) -> Result<HttpResponse> {
        let response = self.request.send().await?;
        let response = HttpResponse::read(response).await?;
        debug!(
            method = %self.method,
            url = %self.url,
            status = response.status_code(),
            length = response.bytes().len(),
            "response read"
        );
        Ok(response)
    }
}

fn parse_url(url: &str) -> RequestResult<Url> {
    let parsed =
        Url::parse(url).map_err(|e| RequestError::InvalidUrl(format!("{} for {}", e, url)))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(RequestError::InvalidUrl(format!(
                "unsupported scheme {} in {}",
                scheme, url
            )))
        }
    }
    if parsed.host_str().is_none() {
        return Err(RequestError::InvalidUrl(format!("no host in {}", url)));
    }
    Ok(parsed)
}

fn header_map(headers: &HashMap<String, String>) -> RequestResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RequestError::InvalidHeader(format!("{} for {:?}", e, name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| RequestError::InvalidHeader(format!("{} for {}: {:?}", e, name, value)))?;
        map.insert(name, value);
    }
    Ok(map)
}
