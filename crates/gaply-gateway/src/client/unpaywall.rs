//! Unpaywall open-access lookups.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::{build_http_client, read_json};
use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::OpenAccessInfo;
use crate::search::OpenAccessSource;

const DOI_PREFIXES: [&str; 4] = ["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "doi:"];

/// Strip resolver prefixes so a DOI can be used as a path segment.
///
/// OpenAlex reports DOIs as `https://doi.org/10.x/y`; Unpaywall wants `10.x/y`.
#[must_use]
pub fn normalize_doi(doi: &str) -> &str {
    let doi = doi.trim();
    DOI_PREFIXES
        .iter()
        .find_map(|prefix| {
            doi.get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .map(|_| &doi[prefix.len()..])
        })
        .unwrap_or(doi)
}

/// Unpaywall API client.
#[derive(Clone)]
pub struct UnpaywallClient {
    client: Client,
    base_url: String,
    email: Option<String>,
    timeout: Duration,
}

impl UnpaywallClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(
                config.search_timeout,
                config.connect_timeout,
                Some(api::USER_AGENT),
            )?,
            base_url: config.unpaywall_base_url.trim_end_matches('/').to_string(),
            email: config.unpaywall_email.clone(),
            timeout: config.search_timeout,
        })
    }

    /// Check if a contact email is configured.
    #[must_use]
    pub fn has_email(&self) -> bool {
        self.email.is_some()
    }

    /// Fetch the open-access record for a DOI.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConfigured`] without a network call when no
    /// contact email is set, otherwise any transport, status or decode error.
    #[instrument(skip(self))]
    pub async fn lookup(&self, doi: &str) -> ClientResult<OpenAccessInfo> {
        let email = self.email.as_deref().ok_or(ClientError::NotConfigured("UNPAYWALL_EMAIL"))?;
        let url = self.lookup_url(doi)?;

        let response = self
            .client
            .get(url)
            .query(&[("email", email)])
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        read_json(response, self.timeout).await
    }

    /// `{base}/v2/{doi}` with each DOI segment percent-encoded.
    ///
    /// DOIs may contain `#` or `?`, which would otherwise end the path.
    fn lookup_url(&self, doi: &str) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("v2")
            .extend(normalize_doi(doi).split('/'));
        Ok(url)
    }
}

#[async_trait]
impl OpenAccessSource for UnpaywallClient {
    async fn lookup(&self, doi: &str) -> ClientResult<OpenAccessInfo> {
        Self::lookup(self, doi).await
    }
}

impl std::fmt::Debug for UnpaywallClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnpaywallClient")
            .field("base_url", &self.base_url)
            .field("has_email", &self.has_email())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_doi_prefixes() {
        assert_eq!(normalize_doi("https://doi.org/10.1/abc"), "10.1/abc");
        assert_eq!(normalize_doi("HTTPS://DOI.ORG/10.1/abc"), "10.1/abc");
        assert_eq!(normalize_doi("doi:10.1/abc"), "10.1/abc");
        assert_eq!(normalize_doi(" 10.1/abc "), "10.1/abc");
    }

    #[test]
    fn test_lookup_url_encodes_segments() {
        let client = UnpaywallClient::new(&Config::for_testing("http://127.0.0.1:9")).unwrap();

        let url = client.lookup_url("https://doi.org/10.1038/nature12373").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/v2/10.1038/nature12373");

        let url = client.lookup_url("10.1002/(SICI)1097-4571#x?y").unwrap();
        assert_eq!(url.path(), "/v2/10.1002/(SICI)1097-4571%23x%3Fy");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_missing_email_fails_without_request() {
        let mut config = Config::for_testing("http://127.0.0.1:9");
        config.unpaywall_email = None;
        let client = UnpaywallClient::new(&config).unwrap();
        let err = tokio_test::block_on(client.lookup("10.1/abc")).unwrap_err();
        assert!(matches!(err, ClientError::NotConfigured("UNPAYWALL_EMAIL")));
    }
}
