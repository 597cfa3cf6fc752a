use std::{env, process::ExitCode};

use courier::HttpClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://httpbin.org/get";
const DEFAULT_PROXY: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("request failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> courier::Result<()> {
    let url = env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());
    let proxy = env::var("COURIER_PROXY").unwrap_or_else(|_| DEFAULT_PROXY.to_string());

    let mut client = HttpClient::new();
    match proxy.rsplit_once(':').map(|(host, port)| (host, port.parse::<u16>())) {
        Some((host, Ok(port))) if env::var_os("COURIER_SOCKS").is_some() => {
            client.set_socks_proxy(host, port)
        }
        Some((host, Ok(port))) => client.set_http_proxy(host, port),
        _ => info!(%proxy, "no usable proxy, connecting directly"),
    }
    client.set_trust_all_certificates(true);
    client.set_header("User-Agent", "Custom User Agent");

    let response = client.send_get_request(&url).await?;
    println!("GET Response Code: {}", response.status_code());
    println!("GET Response Headers: {:?}", response.headers());
    println!("GET Response Header: {:?}", response.header("Server"));
    println!("GET Response Body: {}", response.body());

    client.set_json();
    let response = client
        .send_post_request(&url, "title=test&body=test&userId=1")
        .await?;
    println!("POST Response Code: {}", response.status_code());
    println!("POST Response Body: {}", response.body());
    Ok(())
}
