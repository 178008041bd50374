use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tokio::sync::OnceCell;

pub const UNKNOWN_IP: &str = "unknown";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    ip: String,
}

/// Public IP of this session, looked up once and reused for every write.
///
/// Concurrent first callers wait on the same lookup. The lookup is bounded by
/// a timeout so writes never wait on an unresponsive service. A failed or
/// expired lookup is remembered as [`UNKNOWN_IP`] and never retried.
#[derive(Debug)]
pub struct PublicIp {
    lookup_url: Option<String>,
    timeout: Duration,
    cell: OnceCell<String>,
}

impl PublicIp {
    pub fn new(lookup_url: impl Into<String>) -> Self {
        let url = lookup_url.into();
        PublicIp {
            lookup_url: (!url.trim().is_empty()).then_some(url),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
            cell: OnceCell::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skips the lookup entirely; every write is tagged with a fixed value.
    pub fn fixed(ip: impl Into<String>) -> Self {
        PublicIp {
            lookup_url: None,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
            cell: OnceCell::new_with(Some(ip.into())),
        }
    }

    pub async fn get(&self, http: &reqwest::Client) -> &str {
        self.cell
            .get_or_init(|| async {
                let Some(url) = &self.lookup_url else {
                    return UNKNOWN_IP.to_string();
                };
                match tokio::time::timeout(self.timeout, lookup(http, url)).await {
                    Ok(Ok(ip)) => ip,
                    Ok(Err(e)) => {
                        log::warn!("Public IP lookup failed, tagging writes as {}: {}", UNKNOWN_IP, e);
                        UNKNOWN_IP.to_string()
                    }
                    Err(_) => {
                        log::warn!(
                            "Public IP lookup gave no answer within {:?}, tagging writes as {}",
                            self.timeout,
                            UNKNOWN_IP
                        );
                        UNKNOWN_IP.to_string()
                    }
                }
            })
            .await
    }
}

/// Accepts `{"ip": "..."}` or a bare address in plain text.
async fn lookup(http: &reqwest::Client, url: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    log::info!("Resolving public IP via {}", url);
    let res = http.get(url).send().await?.error_for_status()?;

    let is_json = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("json"));

    let ip = if is_json {
        res.json::<IpLookupResponse>().await?.ip
    } else {
        res.text().await?
    };

    let ip = ip.trim().to_string();
    if ip.is_empty() {
        return Err("lookup service returned an empty address".into());
    }
    Ok(ip)
}
