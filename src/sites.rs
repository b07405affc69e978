use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};
use url::Url;

use crate::error::Error;

/// A named probe target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl Site {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The ordered set of sites checked together in one batch.
///
/// On disk this is the `data.json` document:
///
/// ```json
/// { "sites": [ { "name": "rust", "url": "https://www.rust-lang.org" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteList {
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl SiteList {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Site> {
        self.sites.iter()
    }

    /// Reads and validates a site list file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if [`SiteList::parse`] rejects it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Loading site list from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Decodes a site list document. Blank content is an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or when [`SiteList::validate`] fails.
    pub fn parse(content: &str) -> Result<Self, Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let list: SiteList = serde_json::from_str(content)?;
        list.validate()?;
        Ok(list)
    }

    /// Checks every entry has a name and an absolute URL, and that names are unique.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in list order.
    pub fn validate(&self) -> Result<(), Error> {
        let mut seen = HashSet::with_capacity(self.sites.len());

        for site in &self.sites {
            if site.name.is_empty() {
                return Err(Error::MissingName);
            }
            if site.url.is_empty() {
                return Err(Error::MissingUrl);
            }
            if let Err(e) = Url::parse(&site.url) {
                warn!("Site {} has an invalid url {:?}", site.name, site.url);
                return Err(e.into());
            }
            if !seen.insert(site.name.as_str()) {
                return Err(Error::DuplicateName(site.name.clone()));
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a SiteList {
    type Item = &'a Site;
    type IntoIter = std::slice::Iter<'a, Site>;

    fn into_iter(self) -> Self::IntoIter {
        self.sites.iter()
    }
}

impl FromIterator<Site> for SiteList {
    fn from_iter<I: IntoIterator<Item = Site>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_site_list() {
        let json = r#"{
            "sites": [
                { "name": "golang learn", "url": "https://go.dev/learn" },
                { "name": "rust", "url": "https://www.rust-lang.org" }
            ]
        }"#;

        let list = SiteList::parse(json).expect("Failed to parse site list");

        assert_eq!(list.len(), 2);
        assert_eq!(list.sites[0].name, "golang learn");
        assert_eq!(list.sites[1].url, "https://www.rust-lang.org");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let json = r#"{ "sites": [ { "url": "https://go.dev/learn" } ] }"#;

        let err = SiteList::parse(json).unwrap_err();
        assert!(matches!(err, Error::MissingName));
        assert_eq!(err.to_string(), "site name is required");
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let json = r#"{ "sites": [ { "name": "golang learn" } ] }"#;

        let err = SiteList::parse(json).unwrap_err();
        assert!(matches!(err, Error::MissingUrl));
        assert_eq!(err.to_string(), "site url is required");
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let json = r#"{ "sites": [ { "name": "docs", "url": "docs/index.html" } ] }"#;

        let err = SiteList::parse(json).unwrap_err();
        assert!(matches!(err, Error::UrlParse(_)));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let list = SiteList::new(vec![
            Site::new("mirror", "https://a.example.com"),
            Site::new("mirror", "https://b.example.com"),
        ]);

        match list.validate() {
            Err(Error::DuplicateName(name)) => assert_eq!(name, "mirror"),
            other => panic!("Expected duplicate name error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_content_is_empty_list() {
        assert!(SiteList::parse("").unwrap().is_empty());
        assert!(SiteList::parse("  \n\t").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = SiteList::parse("{ \"sites\": [").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_load_site_list_from_file() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(
            temp_file,
            r#"{{ "sites": [ {{ "name": "example", "url": "https://example.com" }} ] }}"#
        )
        .expect("Failed to write to temp file");

        let list = SiteList::load(temp_file.path()).expect("Failed to load site list");

        assert_eq!(list.sites, vec![Site::new("example", "https://example.com")]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SiteList::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
