// Page catalog - All pages of a site under test
//
// Locator data is static configuration: JSON files loaded once before the
// scenarios run. A page name and a page URL may each be defined only once
// across everything the catalog loads; two definitions of one page are
// conflicting test data. A load that fails leaves the catalog unchanged.
//
// File format (either form):
//
//   { "pages": [ { "name": "Login", "url": "...", "elements": [ ... ] } ] }
//   { "name": "Login", "url": "...", "elements": [ ... ] }

use crate::error::{Error, Result};
use crate::page::{Page, PageSpec};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Deserialize)]
struct CatalogFile {
    pages: Vec<PageSpec>,
}

/// Reads either file form, keeping serde's error for the form it picked
fn parse_specs(json: &str) -> Result<Vec<PageSpec>> {
    let document: serde_json::Value = serde_json::from_str(json)?;
    if document.get("pages").is_some() {
        let file: CatalogFile = serde_json::from_value(document)?;
        Ok(file.pages)
    } else {
        Ok(vec![serde_json::from_value(document)?])
    }
}

/// Pages by name.
#[derive(Debug, Clone, Default)]
pub struct PageCatalog {
    pages: HashMap<String, Arc<Page>>,
}

impl PageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses locator data from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load_json_str(json)?;
        Ok(catalog)
    }

    /// Loads locator data from one JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load_file(path)?;
        Ok(catalog)
    }

    /// Loads every file matching a glob pattern, e.g. `tests/pages/*.json`.
    ///
    /// Files are read in path order. A pattern matching nothing is an error.
    pub fn from_glob(pattern: &str) -> Result<Self> {
        let entries = glob::glob(pattern)
            .map_err(|e| Error::Config(format!("Invalid locator file pattern '{pattern}': {e}")))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                Error::Config(format!("Cannot read locator file matching '{pattern}': {e}"))
            })?;
            paths.push(path);
        }
        if paths.is_empty() {
            return Err(Error::Config(format!(
                "No locator files match pattern '{pattern}'"
            )));
        }
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            catalog.load_file(&path)?;
        }
        Ok(catalog)
    }

    /// Adds the pages of a JSON string to this catalog.
    ///
    /// All or nothing: on error no page of the document is added.
    pub fn load_json_str(&mut self, json: &str) -> Result<()> {
        let pages = parse_specs(json)?
            .into_iter()
            .map(Page::try_from)
            .collect::<Result<Vec<_>>>()?;

        let mut staged = self.clone();
        for page in pages {
            staged.insert(page)?;
        }
        *self = staged;
        Ok(())
    }

    /// Adds the pages of a JSON file to this catalog
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        self.load_json_str(&json)
            .map_err(|e| e.context(format!("loading locator data from {}", path.display())))?;
        tracing::debug!(path = %path.display(), pages = self.len(), "Loaded locator data");
        Ok(())
    }

    /// Adds a page.
    ///
    /// Fails with [`Error::DuplicatePage`] if the name is taken, and with
    /// [`Error::Config`] if another page already has the same URL.
    pub fn insert(&mut self, page: Page) -> Result<()> {
        if self.pages.contains_key(page.name()) {
            return Err(Error::DuplicatePage(page.name().to_string()));
        }
        if let Some(url) = page.url()
            && let Some(other) = self.page_at(&normalize_url(url))
        {
            return Err(Error::Config(format!(
                "Pages '{}' and '{}' share the URL {url}",
                other.name(),
                page.name()
            )));
        }
        self.pages.insert(page.name().to_string(), Arc::new(page));
        Ok(())
    }

    /// Looks up a page by name
    pub fn get(&self, name: &str) -> Result<Arc<Page>> {
        self.pages
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownPage(name.to_string()))
    }

    /// Finds the page whose URL matches `url`.
    ///
    /// Query, fragment and a trailing slash are ignored.
    pub fn find_by_url(&self, url: &str) -> Option<Arc<Page>> {
        self.page_at(&normalize_url(url)).cloned()
    }

    /// URLs are unique across the catalog, so at most one page matches
    fn page_at(&self, normalized: &str) -> Option<&Arc<Page>> {
        self.pages
            .values()
            .find(|page| page.url().is_some_and(|own| normalize_url(own) == normalized))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn normalize_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => raw.trim().trim_end_matches('/').to_string(),
    }
}
