use log::{debug, warn};
use serde::Deserialize;
use std::time::Duration;

/// Shape of the local forwarding service's `GET /api/tunnels` response.
#[derive(Deserialize, Debug)]
pub struct TunnelsResponse {
    #[serde(default)]
    pub tunnels: Vec<TunnelDescriptor>,
}

#[derive(Deserialize, Debug)]
pub struct TunnelDescriptor {
    pub public_url: String,
}

/// No tunnel advertising an HTTP(S) endpoint was found within the retry budget.
#[derive(Debug, PartialEq, Eq)]
pub struct DiscoveryExhausted {
    pub attempts: u32,
}

impl std::fmt::Display for DiscoveryExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no HTTP tunnel found after {} attempt(s)", self.attempts)
    }
}

impl std::error::Error for DiscoveryExhausted {}

/// Pick the first advertised tunnel with an HTTP(S) public URL.
pub fn select_public_url(response: &TunnelsResponse) -> Option<&str> {
    response
        .tunnels
        .iter()
        .map(|t| t.public_url.as_str())
        .find(|u| {
            url::Url::parse(u)
                .map(|parsed| parsed.scheme() == "http" || parsed.scheme() == "https")
                .unwrap_or(false)
        })
}

/// Resolve the current public base URL of the banking API by polling the local
/// tunnel discovery endpoint.
///
/// Performs up to `max_attempts` sequential rounds separated by `delay`. A
/// failed request, an unparseable body, or a tunnel list without an HTTP(S)
/// endpoint are all transient conditions ("the tunnel is still starting") and
/// simply consume one round.
pub async fn resolve_base_url(
    client: &reqwest::Client,
    discovery_url: &str,
    max_attempts: u32,
    delay: Duration,
) -> Result<String, DiscoveryExhausted> {
    for attempt in 1..=max_attempts {
        match fetch_tunnels(client, discovery_url).await {
            Ok(response) => {
                if let Some(public_url) = select_public_url(&response) {
                    debug!(
                        "tunnel: resolved base URL {} on attempt {}/{}",
                        public_url, attempt, max_attempts
                    );
                    return Ok(public_url.to_string());
                }
                debug!(
                    "tunnel: no HTTP tunnel advertised yet (attempt {}/{})",
                    attempt, max_attempts
                );
            }
            Err(e) => {
                debug!(
                    "tunnel: discovery request failed (attempt {}/{}): {}",
                    attempt, max_attempts, e
                );
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(delay).await;
        }
    }

    warn!(
        "tunnel: giving up, no HTTP tunnel found after {} attempt(s)",
        max_attempts
    );
    Err(DiscoveryExhausted {
        attempts: max_attempts,
    })
}

async fn fetch_tunnels(
    client: &reqwest::Client,
    discovery_url: &str,
) -> Result<TunnelsResponse, reqwest::Error> {
    client
        .get(discovery_url)
        .send()
        .await?
        .json::<TunnelsResponse>()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn tunnels(urls: &[&str]) -> TunnelsResponse {
        TunnelsResponse {
            tunnels: urls
                .iter()
                .map(|u| TunnelDescriptor {
                    public_url: u.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_select_first_http_tunnel() {
        let response = tunnels(&["https://abc123.ngrok.io", "http://def456.ngrok.io"]);
        assert_eq!(select_public_url(&response), Some("https://abc123.ngrok.io"));
    }

    #[test]
    fn test_select_skips_non_http_schemes() {
        let response = tunnels(&["tcp://0.tcp.ngrok.io:4041", "https://abc123.ngrok.io"]);
        assert_eq!(select_public_url(&response), Some("https://abc123.ngrok.io"));
    }

    #[test]
    fn test_select_none_when_no_http_tunnel() {
        let response = tunnels(&["tcp://0.tcp.ngrok.io:4041"]);
        assert_eq!(select_public_url(&response), None);
    }

    #[test]
    fn test_select_none_when_empty() {
        let response = tunnels(&[]);
        assert_eq!(select_public_url(&response), None);
    }

    /// Minimal HTTP server answering every request with the given JSON body,
    /// counting hits.
    async fn spawn_discovery_stub(body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind failed");
        let addr = listener.local_addr().expect("local_addr failed");
        let hits = Arc::new(AtomicUsize::new(0));

        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                server_hits.fetch_add(1, Ordering::SeqCst);

                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        (format!("http://{}/api/tunnels", addr), hits)
    }

    #[tokio::test]
    async fn test_exhausted_after_exact_attempt_count() {
        let (url, hits) =
            spawn_discovery_stub(r#"{"tunnels":[{"public_url":"tcp://0.tcp.ngrok.io:4041"}]}"#)
                .await;

        let client = reqwest::Client::new();
        let err = resolve_base_url(&client, &url, 3, Duration::from_millis(0))
            .await
            .expect_err("resolution should fail");

        assert_eq!(err, DiscoveryExhausted { attempts: 3 });
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_resolves_on_first_advertised_http_tunnel() {
        let (url, hits) = spawn_discovery_stub(
            r#"{"tunnels":[{"public_url":"tcp://0.tcp.ngrok.io:4041"},{"public_url":"https://abc123.ngrok.io"}]}"#,
        )
        .await;

        let client = reqwest::Client::new();
        let base = resolve_base_url(&client, &url, 3, Duration::from_millis(0))
            .await
            .expect("resolution should succeed");

        assert_eq!(base, "https://abc123.ngrok.io");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
