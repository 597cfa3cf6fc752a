use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, time::Duration};

use crate::{RequestError, RequestResult};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    Http,
    Socks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proxy {
    pub kind: ProxyKind,
    pub host: String,
    pub port: u16,
}

impl Proxy {
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self {
            kind: ProxyKind::Http,
            host: host.into(),
            port,
        }
    }

    pub fn socks(host: impl Into<String>, port: u16) -> Self {
        Self {
            kind: ProxyKind::Socks,
            host: host.into(),
            port,
        }
    }

    /// Proxy url understood by the transport.
    ///
    /// SOCKS proxies resolve target hostnames on the proxy side.
    pub fn url(&self) -> String {
        let scheme = match self.kind {
            ProxyKind::Http => "http",
            ProxyKind::Socks => "socks5h",
        };
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", scheme, self.host, self.port)
        }
    }

    pub(crate) fn to_reqwest(&self) -> RequestResult<reqwest::Proxy> {
        if self.host.is_empty() {
            return Err(RequestError::InvalidProxy("empty proxy host".to_string()));
        }
        reqwest::Proxy::all(self.url())
            .map_err(|e| RequestError::InvalidProxy(format!("{} for {}", e, self.url())))
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(rename = "connect_timeout_ms", with = "millis")]
    pub connect_timeout: Duration,
    #[serde(rename = "read_timeout_ms", with = "millis")]
    pub read_timeout: Duration,
    pub trust_all_certificates: bool,
    pub headers: HashMap<String, String>,
    pub proxy: Option<Proxy>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            trust_all_certificates: false,
            headers: HashMap::new(),
            proxy: None,
        }
    }
}

impl ClientConfig {
    #[cfg(feature = "config-json")]
    pub fn from_json(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.connect_timeout = timeout;
    }

    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = timeout;
    }

    /// Disables certificate and hostname verification for HTTPS targets.
    pub fn set_trust_all_certificates(&mut self, trust_all: bool) {
        self.trust_all_certificates = trust_all;
    }

    pub fn set_http_proxy(&mut self, host: impl Into<String>, port: u16) {
        self.proxy = Some(Proxy::http(host, port));
    }

    pub fn set_socks_proxy(&mut self, host: impl Into<String>, port: u16) {
        self.proxy = Some(Proxy::socks(host, port));
    }

    pub fn clear_proxy(&mut self) {
        self.proxy = None;
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn set_headers(&mut self, headers: HashMap<String, String>) {
        self.headers = headers;
    }

    pub fn set_json(&mut self) {
        self.set_header("Content-Type", "application/json");
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
