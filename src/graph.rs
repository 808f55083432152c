//! Paged edges returned by the Graph API and the client seam used to fetch them.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;
use crate::query::Query;

/// The capability of fetching edges from the Graph API.
///
/// [`HttpGraphClient`](crate::HttpGraphClient) is the real implementation;
/// anything able to hand back pages of nodes can stand in for it.
pub trait GraphClient {
    /// Fetches the first page of the edge found at `path`.
    fn get(&self, path: &str, query: &Query) -> Result<Edge, GraphError>;

    /// Fetches the page following `edge`, or `None` once the edge is exhausted.
    fn next(&self, edge: &Edge) -> Result<Option<Edge>, GraphError>;

    /// Returns a lazy iterator over every page of the edge found at `path`.
    fn pages<S: Into<String>>(&self, path: S, query: Query) -> Pages<'_, Self>
    where
        Self: Sized,
    {
        Pages::new(self, path.into(), query)
    }
}

impl<T: GraphClient + ?Sized> GraphClient for &T {
    fn get(&self, path: &str, query: &Query) -> Result<Edge, GraphError> {
        (**self).get(path, query)
    }

    fn next(&self, edge: &Edge) -> Result<Option<Edge>, GraphError> {
        (**self).next(edge)
    }
}

/// One page of a Graph edge.
#[derive(Clone, Debug, Deserialize)]
pub struct Edge<T = Node> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    #[serde(default)]
    pub paging: Option<Paging>,

    /// Present when the edge was requested with `.summary(1)`.
    #[serde(default)]
    pub summary: Option<Summary>,
}

impl<T> Edge<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            paging: None,
            summary: None,
        }
    }

    pub fn nodes(&self) -> &[T] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// URL of the following page, if any.
    pub fn next_url(&self) -> Option<&str> {
        self.paging.as_ref().and_then(|p| p.next.as_deref())
    }

    /// A copy of this page's metadata without its items, enough to ask the
    /// client for the following page.
    pub fn without_data(&self) -> Self {
        Self {
            data: Vec::new(),
            paging: self.paging.clone(),
            summary: self.summary.clone(),
        }
    }

    /// The `total_count` from the summary metadata, or zero without one.
    pub fn total_count(&self) -> u64 {
        self.summary.as_ref().map_or(0, |s| s.total_count)
    }
}

/// Paging metadata attached to an [`Edge`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Paging {
    pub cursors: Option<Cursors>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Cursors {
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Summary metadata attached to an [`Edge`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_count: u64,
    pub can_comment: Option<bool>,
}

/// A single item of an edge, kept as the raw JSON the API sent.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Node(Value);

impl Node {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Decodes this node into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, GraphError> {
        Ok(T::deserialize(&self.0)?)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node(value)
    }
}

enum State {
    Start { path: String, query: Query },
    Next(Edge),
    Done,
}

/// Lazy sequence of pages, produced by [`GraphClient::pages`].
///
/// The first error ends the sequence.
pub struct Pages<'c, C: ?Sized> {
    client: &'c C,
    state: State,
}

impl<'c, C: GraphClient + ?Sized> Pages<'c, C> {
    pub fn new(client: &'c C, path: String, query: Query) -> Self {
        Self {
            client,
            state: State::Start { path, query },
        }
    }
}

impl<'c, C: GraphClient + ?Sized> Iterator for Pages<'c, C> {
    type Item = Result<Edge, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        let fetched = match std::mem::replace(&mut self.state, State::Done) {
            State::Start { path, query } => self.client.get(&path, &query),
            State::Next(previous) => match self.client.next(&previous) {
                Ok(Some(edge)) => Ok(edge),
                Ok(None) => return None,
                Err(err) => Err(err),
            },
            State::Done => return None,
        };

        match fetched {
            Ok(edge) => {
                self.state = State::Next(edge.without_data());
                Some(Ok(edge))
            }
            Err(err) => Some(Err(err)),
        }
    }
}
