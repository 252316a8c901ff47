use crate::domain::{Difficulty, UserId};
use serde::Deserialize;

/// Which moderation states a feed request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedScope {
    #[default]
    Published,
    /// Active and inactive alike (admin only)
    All,
    /// The moderation queue (admin only)
    Pending,
}

impl FeedScope {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "published" | "active" => Some(Self::Published),
            "all" => Some(Self::All),
            "pending" | "inactive" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Raw feed query as it arrives from a query string. Every field is text so
/// that malformed values can be dropped instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub max_prep: Option<String>,
    pub q: Option<String>,
    pub author: Option<String>,
    pub scope: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Typed filter conjunction for the feed and search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Inclusive upper bound
    pub max_prep_minutes: Option<i32>,
    pub text: Option<String>,
    pub author: Option<UserId>,
    pub scope: FeedScope,
}

impl ContentFilter {
    /// Parses permissively: blank or malformed values become "no filter".
    #[must_use]
    pub fn from_params(params: &FeedParams) -> Self {
        Self {
            category: non_empty(params.category.as_deref()),
            difficulty: params.difficulty.as_deref().and_then(Difficulty::parse),
            max_prep_minutes: params
                .max_prep
                .as_deref()
                .and_then(|v| v.trim().parse::<i32>().ok())
                .filter(|v| *v >= 0),
            text: non_empty(params.q.as_deref()),
            author: params
                .author
                .as_deref()
                .and_then(|v| v.trim().parse::<i32>().ok())
                .map(UserId::new),
            scope: params
                .scope
                .as_deref()
                .and_then(FeedScope::parse)
                .unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            text: non_empty(Some(text)),
            ..Self::default()
        }
    }
}

impl FeedParams {
    /// Page index; anything unparsable or below 1 is page 1.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v >= 1)
            .unwrap_or(1)
    }

    #[must_use]
    pub fn page_size(&self) -> Option<u64> {
        self.page_size
            .as_deref()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v >= 1)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Case folding applied to searchable text on write and to search input on
/// read. SQLite's `LOWER()` only folds ASCII, so matching happens against
/// columns stored already folded.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Turns free text into a `LIKE` pattern matching it as a literal substring
/// of a [`fold_case`]d column. `\` is the escape character.
#[must_use]
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in fold_case(text).chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
