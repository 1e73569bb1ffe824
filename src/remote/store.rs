//! The remote snippet store: fetch-by-id returning named content blobs.
//!
//! The production implementation reads GitHub gists; tests substitute an
//! in-memory store through the trait.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::logger::debug;

pub trait SnippetStore {
    fn fetch(&self, id: &str) -> Result<SnippetContent>;
}

/// Named content blobs of one snippet.
pub struct SnippetContent {
    pub files: IndexMap<String, String>,
}

impl SnippetContent {
    /// Pick the blob to persist: a file whose stem matches the task's leaf
    /// name, else the first file.
    pub fn primary(&self, leaf: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(name, _)| {
                let stem = name.rsplit_once('.').map_or(name.as_str(), |(stem, _)| stem);
                stem == leaf
            })
            .or_else(|| self.files.first())
            .map(|(_, content)| content.as_str())
    }
}

const GIST_API_BASE: &str = "https://api.github.com/gists";

pub struct GistStore {
    client: reqwest::blocking::Client,
    base: String,
}

#[derive(Deserialize)]
struct GistResponse {
    #[serde(default)]
    files: IndexMap<String, GistFile>,
}

#[derive(Deserialize)]
struct GistFile {
    #[serde(default)]
    content: String,
}

impl GistStore {
    pub fn new() -> Result<Self> {
        Self::with_base(GIST_API_BASE)
    }

    pub fn with_base(base: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("taskdir/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: base.into(),
        })
    }
}

impl SnippetStore for GistStore {
    fn fetch(&self, id: &str) -> Result<SnippetContent> {
        let url = format!("{}/{}", self.base, id);
        debug!("fetching snippet '{}' from {}", id, url);
        let fetch_err = |source| Error::Fetch {
            id: id.to_string(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(fetch_err)?;
        let gist: GistResponse = response.json().map_err(fetch_err)?;

        let files = gist
            .files
            .into_iter()
            .map(|(name, file)| (name, file.content))
            .collect();
        Ok(SnippetContent { files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(entries: &[(&str, &str)]) -> SnippetContent {
        SnippetContent {
            files: entries
                .iter()
                .map(|(name, body)| (name.to_string(), body.to_string()))
                .collect(),
        }
    }

    #[test]
    fn primary_prefers_file_matching_task_leaf() {
        let snippet = content(&[("readme.md", "docs"), ("css.rhai", "|| 1")]);
        assert_eq!(snippet.primary("css"), Some("|| 1"));
    }

    #[test]
    fn primary_falls_back_to_first_file() {
        let snippet = content(&[("whatever.rhai", "|| 2")]);
        assert_eq!(snippet.primary("lint"), Some("|| 2"));
    }

    #[test]
    fn primary_of_empty_snippet_is_none() {
        let snippet = content(&[]);
        assert!(snippet.primary("lint").is_none());
    }
}
