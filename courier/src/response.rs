use bytes::Bytes;
use reqwest::header::HeaderMap;
use std::{borrow::Cow, collections::HashMap};

use crate::Result;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    status_code: u16,
    headers: HashMap<String, Vec<String>>,
    body: Bytes,
}

impl HttpResponse {
    pub fn new(status_code: u16, headers: HashMap<String, Vec<String>>, body: Bytes) -> Self {
        let mut merged: HashMap<String, Vec<String>> = HashMap::with_capacity(headers.len());
        for (name, values) in headers {
            merged
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }
        Self {
            status_code,
            headers: merged,
            body,
        }
    }

    /// Reads `response` to completion.
    ///
    /// For error statuses the transport hands back the error body on the same
    /// stream, so it is what ends up in [`HttpResponse::body`].
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status_code = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?;
        Ok(Self {
            status_code,
            headers,
            body,
        })
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// All headers keyed by lower-cased name, values in arrival order.
    pub fn headers(&self) -> &HashMap<String, Vec<String>> {
        &self.headers
    }

    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn body(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }
}

fn collect_headers(map: &HeaderMap) -> HashMap<String, Vec<String>> {
    map.keys()
        .map(|name| {
            let values = map
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            (name.as_str().to_string(), values)
        })
        .collect()
}
