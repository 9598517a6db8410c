//! Paper records as served by the feed backend.
//!
//! Only `paperId` drives controller logic; everything else is display
//! payload. Optional fields tolerate both absence and explicit `null`, since
//! Semantic Scholar-derived payloads use either interchangeably.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown when a paper carries no abstract.
pub const NO_ABSTRACT: &str = "No abstract available.";

/// Author lists longer than this are collapsed to first, second, last.
const COLLAPSE_AUTHORS_OVER: usize = 3;

/// A single paper offered in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub paper_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub open_access_pdf: Option<OpenAccessPdf>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub journal: Option<Journal>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publication_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccessPdf {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(default, rename = "DOI")]
    pub doi: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default)]
    pub name: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Paper {
    /// A paper carrying only its id. Mostly useful in tests and fixtures.
    pub fn new(paper_id: impl Into<String>) -> Self {
        Self {
            paper_id: paper_id.into(),
            title: None,
            abstract_text: None,
            url: None,
            open_access_pdf: None,
            external_ids: None,
            authors: Vec::new(),
            journal: None,
            publication_date: None,
            publication_types: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = names
            .into_iter()
            .map(|n| Author {
                name: Some(n.into()),
            })
            .collect();
        self
    }

    pub fn title_or_id(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.paper_id)
    }

    /// Best link to the paper: its landing page, then the open-access PDF,
    /// then a DOI resolver link.
    pub fn display_url(&self) -> Option<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        if let Some(url) = self
            .open_access_pdf
            .as_ref()
            .and_then(|p| p.url.as_deref())
            .filter(|u| !u.is_empty())
        {
            return Some(url.to_string());
        }
        self.external_ids
            .as_ref()
            .and_then(|ids| ids.doi.as_deref())
            .filter(|d| !d.is_empty())
            .map(|doi| format!("https://doi.org/{doi}"))
    }

    pub fn author_names(&self) -> Vec<&str> {
        self.authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
            .collect()
    }

    /// Author byline. Long lists collapse to `first, second, [...], last`
    /// unless `expanded` is set.
    pub fn author_line(&self, expanded: bool) -> String {
        let names = self.author_names();
        if expanded || names.len() <= COLLAPSE_AUTHORS_OVER {
            return names.join(", ");
        }
        format!(
            "{}, {}, [...], {}",
            names[0],
            names[1],
            names[names.len() - 1]
        )
    }

    /// Whether the byline is long enough to be collapsed.
    pub fn has_collapsible_authors(&self) -> bool {
        self.author_names().len() > COLLAPSE_AUTHORS_OVER
    }

    pub fn journal_name(&self) -> Option<&str> {
        self.journal
            .as_ref()
            .and_then(|j| j.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    pub fn publication_type_line(&self) -> String {
        self.publication_types
            .iter()
            .map(|t| format_publication_type(t))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Publication date as e.g. `Mar 5, 2024`. Values that aren't ISO dates
    /// (year-only entries are common) come back verbatim.
    pub fn formatted_date(&self) -> Option<String> {
        let raw = self.publication_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date.format("%b %-d, %Y").to_string()),
            Err(_) => Some(raw.to_string()),
        }
    }

    pub fn has_long_abstract(&self, limit: usize) -> bool {
        self.abstract_text
            .as_deref()
            .is_some_and(|a| a.chars().count() > limit)
    }

    /// Abstract cut to `limit` characters, with the placeholder text when the
    /// paper has none.
    pub fn abstract_preview(&self, limit: usize) -> String {
        let Some(text) = self.abstract_text.as_deref().filter(|a| !a.trim().is_empty()) else {
            return NO_ABSTRACT.to_string();
        };
        if text.chars().count() <= limit {
            return text.to_string();
        }
        let mut cut: String = text.chars().take(limit).collect();
        cut.truncate(cut.trim_end().len());
        cut.push('\u{2026}');
        cut
    }
}

/// Split a CamelCase publication type for display:
/// `JournalArticle` becomes `Journal Article`.
pub fn format_publication_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.chars() {
        if prev_lower && c.is_uppercase() {
            out.push(' ');
        }
        prev_lower = c.is_lowercase();
        out.push(c);
    }
    out
}
