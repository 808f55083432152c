use chrono::serde::ts_seconds_option;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Query parameters attached to a Graph API request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    fields: Option<String>,
    limit: Option<u32>,
    include_hidden: Option<bool>,

    #[serde(with = "ts_seconds_option")]
    since: Option<DateTime<Utc>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the returned fields, using the Graph field expansion syntax.
    #[must_use]
    pub fn fields<S: Into<String>>(mut self, fields: S) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Number of items per page.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = Some(include_hidden);
        self
    }

    /// Only return items updated at or after `since`.
    #[must_use]
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn get_fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }

    pub fn get_limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn get_since(&self) -> Option<DateTime<Utc>> {
        self.since
    }
}
