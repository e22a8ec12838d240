//! OpenAlex work and Unpaywall record models.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Inverted abstract index: word to the positions where it occurs.
pub type InvertedAbstract = HashMap<String, Vec<u32>>;

/// A work from the OpenAlex `/works` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalWork {
    /// OpenAlex work ID (a URL such as `https://openalex.org/W123`). Empty when absent or null.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Work title.
    #[serde(default)]
    pub title: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub publication_year: Option<i32>,

    /// DOI, usually in `https://doi.org/...` form.
    #[serde(default)]
    pub doi: Option<String>,

    /// Work type (e.g., "article", "dissertation").
    #[serde(default, rename = "type")]
    pub work_type: Option<String>,

    /// Authorships in byline order.
    #[serde(default)]
    pub authorships: Vec<Authorship>,

    /// Abstract as an inverted index.
    #[serde(default)]
    pub abstract_inverted_index: Option<InvertedAbstract>,

    /// Legacy host venue.
    #[serde(default)]
    pub host_venue: Option<HostVenue>,

    /// Primary location, which replaced `host_venue` in newer API versions.
    #[serde(default)]
    pub primary_location: Option<PrimaryLocation>,
}

impl ExternalWork {
    /// Author display names in byline order, one per authorship. Unnamed authors are empty.
    #[must_use]
    pub fn author_names(&self) -> Vec<String> {
        self.authorships
            .iter()
            .map(|a| a.author.as_ref().and_then(|au| au.display_name.clone()).unwrap_or_default())
            .collect()
    }

    /// Whether the declared type mentions a thesis.
    #[must_use]
    pub fn is_thesis(&self) -> bool {
        self.work_type.as_deref().is_some_and(|t| t.to_lowercase().contains("thesis"))
    }

    /// Publisher landing page: host venue URL, else the primary location's.
    #[must_use]
    pub fn landing_url(&self) -> Option<&str> {
        let host = self.host_venue.as_ref().and_then(|v| v.url.as_deref());
        let primary = self.primary_location.as_ref().and_then(|l| l.landing_page_url.as_deref());
        host.filter(|u| !u.is_empty()).or(primary).filter(|u| !u.is_empty())
    }

    /// DOI if present and non-empty.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.doi.as_deref().filter(|d| !d.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single authorship entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authorship {
    /// The author.
    #[serde(default)]
    pub author: Option<AuthorName>,
}

/// Author reference inside an authorship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorName {
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Legacy host venue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostVenue {
    /// Venue URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// Primary location of a work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryLocation {
    /// Landing page URL.
    #[serde(default)]
    pub landing_page_url: Option<String>,
}

/// One page of `/works` results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorksPage {
    /// Works in relevance order.
    #[serde(default)]
    pub results: Vec<ExternalWork>,

    /// Result metadata.
    #[serde(default)]
    pub meta: WorksMeta,
}

/// `/works` result metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorksMeta {
    /// Total number of matching works upstream.
    #[serde(default)]
    pub count: u64,
}

/// Open-access record from Unpaywall `/v2/{doi}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAccessInfo {
    /// Whether the work is open access.
    #[serde(default)]
    pub is_oa: bool,

    /// Best OA location, either a bare URL or a location object.
    #[serde(default)]
    pub best_oa_location: Option<OaLocation>,

    /// Flattened best OA URL.
    #[serde(default)]
    pub best_oa_location_url: Option<String>,
}

impl OpenAccessInfo {
    /// Best OA landing URL, preferring the flattened field.
    #[must_use]
    pub fn best_url(&self) -> Option<&str> {
        let flat = self.best_oa_location_url.as_deref().filter(|u| !u.is_empty());
        flat.or_else(|| self.best_oa_location.as_ref()?.url()).filter(|u| !u.is_empty())
    }
}

/// Unpaywall location, which the API has returned both as a string and an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OaLocation {
    /// Bare URL.
    Url(String),
    /// Location object.
    Location {
        /// Landing page URL.
        #[serde(default)]
        url: Option<String>,
        /// Direct PDF URL.
        #[serde(default)]
        url_for_pdf: Option<String>,
    },
}

impl OaLocation {
    /// Landing URL, falling back to the PDF URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Location { url, url_for_pdf } => url.as_deref().or(url_for_pdf.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_work_parses_minimal() {
        let work: ExternalWork = serde_json::from_value(json!({"id": "W1"})).unwrap();
        assert_eq!(work.id, "W1");
        assert!(work.author_names().is_empty());
        assert!(work.doi().is_none());
        assert!(!work.is_thesis());
    }

    #[test]
    fn test_work_parses_nulls() {
        let work: ExternalWork = serde_json::from_value(json!({
            "id": "W2",
            "title": null,
            "doi": null,
            "host_venue": null,
            "abstract_inverted_index": null,
            "authorships": [{"author": {"display_name": null}}]
        }))
        .unwrap();
        assert!(work.title.is_none());
        assert_eq!(work.author_names(), vec![String::new()]);
        assert!(work.landing_url().is_none());
    }

    #[test]
    fn test_author_names_keep_byline_positions() {
        let work: ExternalWork = serde_json::from_value(json!({
            "id": "W3",
            "authorships": [
                {"author": {"display_name": "Ada Lovelace"}},
                {"author": null},
                {"author": {"display_name": null}},
                {},
                {"author": {"display_name": "Alan Turing"}}
            ]
        }))
        .unwrap();
        assert_eq!(work.author_names(), vec!["Ada Lovelace", "", "", "", "Alan Turing"]);
    }

    #[test]
    fn test_null_id_is_empty() {
        let work: ExternalWork = serde_json::from_value(json!({"id": null, "title": "T"})).unwrap();
        assert_eq!(work.id, "");
        assert_eq!(work.title.as_deref(), Some("T"));

        let page: WorksPage = serde_json::from_value(json!({
            "meta": {"count": 2},
            "results": [{"id": null}, {"id": "https://openalex.org/W9"}]
        }))
        .unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].id, "");
        assert_eq!(page.results[1].id, "https://openalex.org/W9");
    }

    #[test]
    fn test_thesis_case_insensitive() {
        let work = ExternalWork { work_type: Some("PhD-Thesis".into()), ..Default::default() };
        assert!(work.is_thesis());
    }

    #[test]
    fn test_landing_url_prefers_host_venue() {
        let work = ExternalWork {
            host_venue: Some(HostVenue { url: Some("http://venue".into()) }),
            primary_location: Some(PrimaryLocation {
                landing_page_url: Some("http://primary".into()),
            }),
            ..Default::default()
        };
        assert_eq!(work.landing_url(), Some("http://venue"));

        let work = ExternalWork {
            host_venue: Some(HostVenue { url: Some(String::new()) }),
            primary_location: Some(PrimaryLocation {
                landing_page_url: Some("http://primary".into()),
            }),
            ..Default::default()
        };
        assert_eq!(work.landing_url(), Some("http://primary"));
    }

    #[test]
    fn test_best_url_forms() {
        let flat: OpenAccessInfo = serde_json::from_value(json!({
            "is_oa": true,
            "best_oa_location_url": "http://oa.example/pdf"
        }))
        .unwrap();
        assert_eq!(flat.best_url(), Some("http://oa.example/pdf"));

        let string_form: OpenAccessInfo = serde_json::from_value(json!({
            "is_oa": true,
            "best_oa_location": "http://oa.example/landing"
        }))
        .unwrap();
        assert_eq!(string_form.best_url(), Some("http://oa.example/landing"));

        let object_form: OpenAccessInfo = serde_json::from_value(json!({
            "is_oa": true,
            "best_oa_location": {"url": "http://oa.example/obj", "url_for_pdf": null}
        }))
        .unwrap();
        assert_eq!(object_form.best_url(), Some("http://oa.example/obj"));

        let closed: OpenAccessInfo =
            serde_json::from_value(json!({"is_oa": false, "best_oa_location": null})).unwrap();
        assert_eq!(closed.best_url(), None);
    }
}
