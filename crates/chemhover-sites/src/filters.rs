//! Host filters.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SitesError;

/// Hostname of `url`, if it parses and has one.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}

/// Matches pages whose hostname equals `host_equals` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFilter {
    #[serde(rename = "hostEquals")]
    pub host_equals: String,
}

/// Ordered list of host filters, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlFilters {
    filters: Vec<UrlFilter>,
}

impl UrlFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `url`'s host is listed. Unparseable URLs never match.
    pub fn matches(&self, url: &str) -> bool {
        match host_of(url) {
            Some(host) => self.contains_host(&host),
            None => false,
        }
    }

    pub fn contains_host(&self, host: &str) -> bool {
        self.filters.iter().any(|f| f.host_equals == host)
    }

    /// Add the host of `url`. Returns false if it was already listed.
    pub fn add(&mut self, url: &str) -> Result<bool, SitesError> {
        let host = host_of(url).ok_or_else(|| SitesError::InvalidUrl(url.to_string()))?;
        if self.contains_host(&host) {
            return Ok(false);
        }
        self.filters.push(UrlFilter { host_equals: host });
        Ok(true)
    }

    /// Remove the host of `url`. Returns false if it was not listed.
    pub fn remove(&mut self, url: &str) -> Result<bool, SitesError> {
        let host = host_of(url).ok_or_else(|| SitesError::InvalidUrl(url.to_string()))?;
        let before = self.filters.len();
        self.filters.retain(|f| f.host_equals != host);
        Ok(self.filters.len() != before)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.host_equals.as_str())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
