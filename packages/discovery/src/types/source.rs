//! Trusted source domains and allow-list matching.

use serde::{Deserialize, Serialize};
use url::Url;

/// Domains searched when the source registry is empty.
pub const FALLBACK_DOMAINS: &[&str] = &[
    "reddit.com",
    "blogto.com",
    "yelp.ca",
    "torontolife.com",
    "eater.com",
];

/// A registered source with its annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub domain: String,
    pub notes: Option<String>,
}

impl Source {
    pub fn new(domain: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            notes: Some(notes.into()),
        }
    }
}

/// A search hit from the provider. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AllowedDomain {
    host: String,
    path_prefix: Option<String>,
}

/// The bounded set of sites a search may return results from.
///
/// An entry `eater.com` permits `eater.com` and any subdomain of it. An entry
/// carrying a path (`cbc.ca/news/canada/toronto`) also requires the URL path
/// to start with that path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAllowList {
    entries: Vec<AllowedDomain>,
    raw: Vec<String>,
}

impl DomainAllowList {
    /// Build from registry domains, falling back to [`FALLBACK_DOMAINS`]
    /// when nothing usable is configured. Never produces an empty list.
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut raw: Vec<String> = Vec::new();
        for domain in domains {
            let d = normalize(domain.as_ref());
            if !d.is_empty() && !raw.contains(&d) {
                raw.push(d);
            }
        }
        if raw.is_empty() {
            raw = FALLBACK_DOMAINS.iter().map(|d| d.to_string()).collect();
        }

        let entries = raw
            .iter()
            .map(|d| match d.split_once('/') {
                Some((host, path)) => AllowedDomain {
                    host: host.to_string(),
                    path_prefix: Some(format!("/{}", path.trim_end_matches('/'))),
                },
                None => AllowedDomain {
                    host: d.clone(),
                    path_prefix: None,
                },
            })
            .collect();

        Self { entries, raw }
    }

    /// Domains as passed to the search provider.
    pub fn domains(&self) -> &[String] {
        &self.raw
    }

    /// Whether a result URL falls inside the allow-list.
    pub fn permits(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);

        self.entries.iter().any(|entry| {
            let host_ok = host == entry.host || host.ends_with(&format!(".{}", entry.host));
            let path_ok = entry
                .path_prefix
                .as_deref()
                .map_or(true, |prefix| parsed.path().starts_with(prefix));
            host_ok && path_ok
        })
    }
}

fn normalize(domain: &str) -> String {
    let d = domain.trim().to_ascii_lowercase();
    let d = d
        .strip_prefix("https://")
        .or_else(|| d.strip_prefix("http://"))
        .unwrap_or(&d);
    let d = d.strip_prefix("www.").unwrap_or(d);
    d.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_falls_back() {
        let list = DomainAllowList::from_domains(Vec::<String>::new());
        assert_eq!(list.domains().len(), FALLBACK_DOMAINS.len());
        assert!(list.permits("https://www.reddit.com/r/toronto"));
    }

    #[test]
    fn subdomains_match_but_lookalikes_do_not() {
        let list = DomainAllowList::from_domains(["eater.com"]);
        assert!(list.permits("https://toronto.eater.com/maps/best-pizza"));
        assert!(!list.permits("https://noteater.com/"));
        assert!(!list.permits("not a url"));
    }

    #[test]
    fn path_entries_constrain_path() {
        let list = DomainAllowList::from_domains(["cbc.ca/news/canada/toronto"]);
        assert!(list.permits("https://www.cbc.ca/news/canada/toronto/dim-sum-1.234"));
        assert!(!list.permits("https://www.cbc.ca/sports/hockey"));
    }

    #[test]
    fn domains_are_normalized_and_deduplicated() {
        let list = DomainAllowList::from_domains(["https://www.BlogTO.com/", "blogto.com", " "]);
        assert_eq!(list.domains(), &["blogto.com".to_string()]);
    }
}
