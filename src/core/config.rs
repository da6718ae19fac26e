use anyhow::{anyhow, Result};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://disclosure.edinet-fsa.go.jp/api/v2";

/// Process configuration, resolved once at startup and threaded into the
/// registry client explicitly. A missing API key is fatal here, never a
/// per-query error.
#[derive(Clone, Debug)]
pub struct EdinetConfig {
    pub api_key: String,
    pub endpoint: Url,
}

impl EdinetConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("EDINET_API_KEY")
            .map_err(|_| anyhow!("EDINET_API_KEY environment variable not set"))?;

        let endpoint = std::env::var("EDINET_API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| anyhow!("invalid EDINET_API_ENDPOINT `{}`: {}", endpoint, e))?;

        Ok(Self { api_key, endpoint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_parses() {
        assert!(Url::parse(DEFAULT_ENDPOINT).is_ok());
    }
}
