use serde::{Deserialize, Serialize};

/// Fields requested from the provider when the caller does not choose.
pub const DEFAULT_EXTRACT_FIELDS: [&str; 6] = [
    "title",
    "abstract",
    "fullText",
    "downloadUrl",
    "publishedDate",
    "citationCount",
];

/// Title used when the provider omits one.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Provider-side sort key.
pub enum SortField {
    /// Provider default; no `sort` parameter is sent.
    Relevance,
    CitationCount,
    PublishedDate,
    ProviderScore,
}

impl SortField {
    fn as_param(self) -> Option<&'static str> {
        match self {
            SortField::Relevance => None,
            SortField::CitationCount => Some("citationCount"),
            SortField::PublishedDate => Some("publishedDate"),
            SortField::ProviderScore => Some("providerScore"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_param(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One paper search request.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperQuery {
    pub query: String,
    pub limit: u32,
    pub extract: Vec<String>,
    pub sort: Option<(SortField, SortOrder)>,
}

impl PaperQuery {
    pub fn new(query: impl Into<String>, limit: u32) -> Self {
        Self {
            query: query.into(),
            limit,
            extract: DEFAULT_EXTRACT_FIELDS.iter().map(|f| f.to_string()).collect(),
            sort: None,
        }
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    /// `"{field}:{order}"`, or `None` for relevance ordering.
    pub fn sort_param(&self) -> Option<String> {
        let (field, order) = self.sort?;
        field
            .as_param()
            .map(|f| format!("{}:{}", f, order.as_param()))
    }
}

/// A work as returned by the provider; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWork {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub citation_count: Option<u64>,
}

/// A paper normalized for the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Work {
    pub title: String,
    pub published_date: Option<String>,
    pub abstract_text: Option<String>,
    pub full_text: Option<String>,
    pub download_url: Option<String>,
    pub citation_count: Option<u64>,
}

impl From<RawWork> for Work {
    fn from(raw: RawWork) -> Self {
        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        Self {
            title,
            published_date: raw.published_date,
            abstract_text: raw.abstract_text,
            full_text: raw.full_text,
            download_url: raw.download_url,
            citation_count: raw.citation_count,
        }
    }
}

impl Work {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            published_date: None,
            abstract_text: None,
            full_text: None,
            download_url: None,
            citation_count: None,
        }
    }

    pub fn with_full_text(mut self, text: impl Into<String>) -> Self {
        self.full_text = Some(text.into());
        self
    }

    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    pub fn with_citations(mut self, citations: u64) -> Self {
        self.citation_count = Some(citations);
        self
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    /// Full text, else abstract; blank values don't count.
    pub fn best_text(&self) -> Option<&str> {
        non_blank(self.full_text.as_deref()).or_else(|| non_blank(self.abstract_text.as_deref()))
    }

    pub fn has_usable_text(&self) -> bool {
        self.best_text().is_some()
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
