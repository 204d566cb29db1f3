use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::payload::parse_payload;

const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let timeout = env::var("UFC_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);
        Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .context("failed to build http client")
    })
}

/// Base URL of the analytics service, without a trailing slash.
pub fn base_url() -> String {
    env::var("UFC_API_BASE_URL")
        .ok()
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// GET `{base_url}{path}` and parse the body as JSON. Network failure,
/// non-2xx status, and malformed bodies all surface as the same error; the
/// caller never distinguishes causes.
pub fn fetch_endpoint(path: &str) -> Result<Value> {
    let client = http_client()?;
    let url = format!("{}{path}", base_url());
    let resp = client.get(&url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status}"));
    }
    parse_payload(&body)
}

/// Endpoint path for a fighter-name search, with the free-text query
/// percent-encoded before it lands in the path.
pub fn search_path(query: &str) -> String {
    format!("/fighters/search/{}", urlencoding::encode(query.trim()))
}
