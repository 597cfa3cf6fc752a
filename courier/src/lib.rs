mod error;

pub mod client;
pub mod config;
pub mod connection;
pub mod http;
pub mod response;
pub mod tls;

pub use client::HttpClient;
pub use config::{ClientConfig, Proxy, ProxyKind};
pub use error::*;
pub use http::{HttpRequest, Method};
pub use response::HttpResponse;
