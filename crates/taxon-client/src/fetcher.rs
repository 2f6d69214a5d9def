use std::net::IpAddr;
use std::time::Duration;

use reqwest::Client;
use reqwest::redirect::Policy;
use taxon_core::error::AppError;
use taxon_core::traits::Fetcher;
use url::Url;

/// User-Agent sent with every page fetch. Several sites reject requests
/// carrying a default HTTP-library agent, so we present a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36";

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 5;

/// HTTP page fetcher using reqwest.
///
/// Downloads raw HTML with a browser User-Agent and a bounded per-request
/// timeout. The underlying client and its connection pool are shared by all
/// clones, so a single fetcher can serve a whole concurrent batch.
///
/// Requests to loopback/private/reserved hosts are refused by default;
/// [`allow_private_hosts`](Self::allow_private_hosts) disables the guard for
/// local use where the operator controls the URLs.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    timeout_secs: u64,
    deny_private_hosts: bool,
}

impl PageFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
            deny_private_hosts: true,
        })
    }

    /// Permit fetching loopback and private-range hosts.
    pub fn allow_private_hosts(mut self) -> Self {
        self.deny_private_hosts = false;
        self
    }
}

impl Fetcher for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        if self.deny_private_hosts {
            ensure_public_host(url)?;
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}

/// Reject URLs that point at loopback, private, or otherwise reserved hosts.
///
/// Checks the scheme, localhost-style names, and literal IP hosts. Hostnames
/// are not pre-resolved; the guard is a hygiene measure for operator-supplied
/// URLs, not a hardened SSRF boundary.
fn ensure_public_host(url: &str) -> Result<(), AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::HttpError(format!(
                "URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::HttpError("URL has no host".to_string()))?;

    if host.eq_ignore_ascii_case("localhost") || host.ends_with(".localhost") {
        return Err(AppError::HttpError(format!(
            "Refusing to fetch local host {host}"
        )));
    }

    if let Ok(ip) = host.trim_matches(['[', ']']).parse::<IpAddr>() {
        if is_reserved_ip(ip) {
            return Err(AppError::HttpError(format!(
                "Refusing to fetch reserved address {ip}"
            )));
        }
    }

    Ok(())
}

/// True for loopback, private, link-local, and similar non-public ranges.
fn is_reserved_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                // 100.64.0.0/10 carrier-grade NAT
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64)
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_reserved_ip(IpAddr::V4(mapped));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                // fe80::/10 link-local and fc00::/7 unique-local
                || (v6.segments()[0] & 0xFFC0) == 0xFE80
                || (v6.segments()[0] & 0xFE00) == 0xFC00
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_ranges_are_flagged() {
        for addr in [
            "127.0.0.1",
            "10.0.0.1",
            "172.16.0.1",
            "192.168.1.1",
            "169.254.169.254",
            "0.0.0.0",
            "100.64.0.1",
            "::1",
            "fe80::1",
            "fc00::1",
            "::ffff:127.0.0.1",
        ] {
            assert!(is_reserved_ip(addr.parse().unwrap()), "{addr}");
        }
    }

    #[test]
    fn public_addresses_pass() {
        for addr in ["8.8.8.8", "1.1.1.1", "93.184.216.34", "2001:4860:4860::8888"] {
            assert!(!is_reserved_ip(addr.parse().unwrap()), "{addr}");
        }
    }

    #[test]
    fn guard_rejects_local_and_non_http_urls() {
        assert!(ensure_public_host("file:///etc/passwd").is_err());
        assert!(ensure_public_host("http://localhost:8000/admin").is_err());
        assert!(ensure_public_host("http://127.0.0.1/").is_err());
        assert!(ensure_public_host("http://[::1]/").is_err());
        assert!(ensure_public_host("https://example.com/page").is_ok());
    }
}
