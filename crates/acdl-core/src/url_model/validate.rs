//! Source URL validation: scheme, host domain and path checks.

use url::{Host, Url};

/// Host rule for accepted source pages: registrable domain label plus public suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRule {
    pub domain: String,
    pub suffix: String,
}

impl DomainRule {
    pub fn new(domain: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            suffix: suffix.into(),
        }
    }

    /// True if `host`'s registrable domain is `domain` under `suffix`.
    /// Subdomains match; look-alikes (`notacademia.edu`, `academia.edu.au`) do not.
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();
        let suffix = self.suffix.to_ascii_lowercase();
        let Some(rest) = host.strip_suffix(suffix.as_str()) else {
            return false;
        };
        let Some(rest) = rest.strip_suffix('.') else {
            return false;
        };
        let registrable = rest.rsplit('.').next().unwrap_or("");
        !registrable.is_empty() && registrable.eq_ignore_ascii_case(&self.domain)
    }
}

/// Why a candidate source URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error parsing URL: {url} ({reason})")]
pub struct InvalidUrl {
    pub url: String,
    pub reason: &'static str,
}

/// A validated source page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    raw: String,
    parsed: Url,
}

impl SourceUrl {
    /// Parse and validate `raw` against `rule`.
    pub fn parse(raw: &str, rule: &DomainRule) -> Result<Self, InvalidUrl> {
        let invalid = |reason| InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        // The url crate is lenient (`http:host/x`, `http:///host/x`, bare
        // authority without path); check the raw shape first.
        let (_, rest) = raw.split_once("://").ok_or_else(|| invalid("missing scheme or host"))?;
        let authority_end = rest.find(['/', '?', '#']);
        let authority = &rest[..authority_end.unwrap_or(rest.len())];
        if authority.is_empty() {
            return Err(invalid("missing host"));
        }
        match authority_end.map(|i| &rest[i..i + 1]) {
            Some("/") => {}
            _ => return Err(invalid("missing path")),
        }

        let parsed = Url::parse(raw).map_err(|_| invalid("not a valid URL"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(invalid("scheme must be http or https"));
        }
        let host = match parsed.host() {
            Some(Host::Domain(d)) => d.to_string(),
            Some(_) => return Err(invalid("IP address hosts are not accepted")),
            None => return Err(invalid("missing host")),
        };
        if !rule.matches_host(&host) {
            return Err(invalid("host is not on the expected domain"));
        }
        if parsed.path().is_empty() {
            return Err(invalid("missing path"));
        }

        Ok(Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    /// The string exactly as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }
}

/// Pure boolean form of [`SourceUrl::parse`].
pub fn validate_url(url: &str, rule: &DomainRule) -> bool {
    SourceUrl::parse(url, rule).is_ok()
}
