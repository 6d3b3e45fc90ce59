//! RPC URL masking.
//!
//! Provider URLs routinely embed API keys in the path. Any URL that reaches
//! a log line or an error message goes through here first.

use url::Url;

const MASK: &str = "***";

/// Path segments at least this long are treated as embedded API keys.
const SECRET_SEGMENT_MIN_LEN: usize = 20;

/// An endpoint with its secret parts identified.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedUrl {
    masked: String,
    secrets: Vec<String>,
}

impl RedactedUrl {
    /// Masks the segment after a `/v2/` or `/v3/` version marker, any long
    /// opaque segment, passwords, and the query string.
    pub fn new(raw: &str) -> Self {
        let mut secrets = Vec::new();

        let Ok(mut url) = Url::parse(raw) else {
            let segments: Vec<String> = raw.split('/').map(str::to_string).collect();
            let masked = mask_segments(&segments, &mut secrets).join("/");
            return Self { masked, secrets };
        };

        if let Some(password) = url.password().map(str::to_string) {
            secrets.push(password);
            let _ = url.set_password(Some(MASK));
        }
        if let Some(query) = url.query().map(str::to_string) {
            secrets.push(query);
            url.set_query(Some(MASK));
        }

        if let Some(segments) = url.path_segments() {
            let segments: Vec<String> = segments.map(str::to_string).collect();
            let masked = mask_segments(&segments, &mut secrets);
            if masked != segments {
                url.set_path(&masked.join("/"));
            }
        }

        Self {
            masked: url.to_string(),
            secrets,
        }
    }

    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// Remove every secret part of this URL from free-form text, such as a
    /// transport error that echoes the request URL.
    pub fn scrub(&self, text: &str) -> String {
        self.secrets
            .iter()
            .filter(|s| !s.is_empty())
            .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), MASK))
    }
}

impl std::fmt::Debug for RedactedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked)
    }
}

impl std::fmt::Display for RedactedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked)
    }
}

/// Masked form of `raw`, safe to log.
pub fn mask_rpc_url(raw: &str) -> String {
    RedactedUrl::new(raw).masked
}

fn mask_segments(segments: &[String], secrets: &mut Vec<String>) -> Vec<String> {
    let mut masked = Vec::with_capacity(segments.len());
    let mut after_version = false;
    for segment in segments {
        let secret = (after_version && !segment.is_empty())
            || (segment.len() >= SECRET_SEGMENT_MIN_LEN && !segment.contains('.'));
        after_version = matches!(segment.as_str(), "v2" | "v3");
        if secret {
            secrets.push(segment.clone());
            masked.push(MASK.to_string());
        } else {
            masked.push(segment.clone());
        }
    }
    masked
}
