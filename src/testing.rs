//! In-memory Graph API used by the unit tests.
use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::GraphError;
use crate::graph::{Edge, GraphClient, Node, Paging};
use crate::models::Topic;
use crate::query::Query;
use crate::sink::{LogSink, Progress};

enum Response {
    Page { data: Value, next: Option<String> },
    Error(String),
    ClientError(String),
}

/// Serves canned pages keyed by request path (first page) or next URL.
#[derive(Default)]
pub(crate) struct FakeGraph {
    responses: HashMap<String, Response>,
    requests: RefCell<Vec<(String, Option<Query>)>>,
    next_payloads: RefCell<Vec<usize>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, key: &str, data: Value, next: Option<&str>) -> Self {
        self.responses.insert(
            key.to_owned(),
            Response::Page {
                data,
                next: next.map(str::to_owned),
            },
        );
        self
    }

    pub fn error(mut self, key: &str, message: &str) -> Self {
        self.responses
            .insert(key.to_owned(), Response::Error(message.to_owned()));
        self
    }

    /// Fails the request with a transport-level error instead of an API one.
    pub fn client_error(mut self, key: &str, message: &str) -> Self {
        self.responses
            .insert(key.to_owned(), Response::ClientError(message.to_owned()));
        self
    }

    /// Item count of every edge handed to `next`, in order.
    pub fn next_payloads(&self) -> Vec<usize> {
        self.next_payloads.borrow().clone()
    }

    /// Every path or URL requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// The query sent with the first-page request for `path`.
    pub fn query_for(&self, path: &str) -> Option<Query> {
        self.requests
            .borrow()
            .iter()
            .find(|(k, _)| k == path)
            .and_then(|(_, q)| q.clone())
    }

    fn respond(&self, key: &str) -> Result<Edge, GraphError> {
        match self.responses.get(key) {
            Some(Response::Page { data, next }) => {
                let mut edge: Edge = serde_json::from_value(json!({ "data": data }))?;
                edge.paging = next.as_ref().map(|next| Paging {
                    next: Some(next.clone()),
                    ..Paging::default()
                });
                Ok(edge)
            }
            Some(Response::Error(message)) => Err(GraphError::Response {
                code: Some(1),
                kind: Some("GraphMethodException".into()),
                message: message.clone(),
            }),
            Some(Response::ClientError(message)) => Err(GraphError::Client(message.clone())),
            None => Err(GraphError::Client(format!("unexpected request: {key}"))),
        }
    }
}

impl GraphClient for FakeGraph {
    fn get(&self, path: &str, query: &Query) -> Result<Edge, GraphError> {
        self.requests
            .borrow_mut()
            .push((path.to_owned(), Some(query.clone())));
        self.respond(path)
    }

    fn next(&self, edge: &Edge) -> Result<Option<Edge>, GraphError> {
        self.next_payloads.borrow_mut().push(edge.nodes().len());
        match edge.next_url() {
            Some(url) => {
                self.requests.borrow_mut().push((url.to_owned(), None));
                self.respond(url).map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Records everything sent to the progress and log sinks.
#[derive(Default)]
pub(crate) struct Recorder {
    pub messages: Vec<String>,
    pub advances: usize,
    pub topics: Vec<String>,
    pub contributors: Vec<String>,
    pub new_users: Vec<String>,
}

impl Progress for Recorder {
    fn set_message(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }

    fn advance(&mut self) {
        self.advances += 1;
    }
}

impl LogSink for Recorder {
    fn log_topic(&mut self, line: &str) {
        self.topics.push(line.to_owned());
    }

    fn log_contributor(&mut self, line: &str) {
        self.contributors.push(line.to_owned());
    }

    fn log_new_user(&mut self, line: &str) {
        self.new_users.push(line.to_owned());
    }
}

pub(crate) fn author(id: &str) -> Value {
    json!({ "id": id, "name": format!("Name {id}") })
}

pub(crate) fn reply(id: &str, author_id: &str, created: &str, likes: u64) -> Value {
    json!({
        "id": id,
        "from": author(author_id),
        "created_time": created,
        "message": format!("reply {id}"),
        "like_count": likes,
        "comment_count": 0
    })
}

pub(crate) fn comment(
    id: &str,
    author_id: &str,
    created: &str,
    likes: u64,
    replies: Vec<Value>,
) -> Value {
    let count = replies.len();
    json!({
        "id": id,
        "from": author(author_id),
        "created_time": created,
        "message": format!("comment {id}"),
        "like_count": likes,
        "comment_count": count,
        "can_comment": true,
        "comments": {
            "data": replies,
            "summary": { "order": "chronological", "total_count": count }
        }
    })
}

pub(crate) fn post(
    id: &str,
    author_id: &str,
    created: &str,
    likes: u64,
    comments_total: u64,
    comments: Vec<Value>,
) -> Value {
    json!({
        "id": id,
        "from": author(author_id),
        "created_time": created,
        "updated_time": created,
        "message": format!("post {id}"),
        "likes": {
            "data": [],
            "summary": { "total_count": likes, "can_like": true, "has_liked": false }
        },
        "comments": {
            "data": comments,
            "summary": { "order": "ranked", "total_count": comments_total, "can_comment": true }
        }
    })
}

/// Normalizes raw Graph posts the same way the fetcher does.
pub(crate) fn feed(posts: Vec<Value>) -> Vec<Topic> {
    posts
        .into_iter()
        .map(|value| Topic::from_node(&Node::from(value)).unwrap())
        .collect()
}

pub(crate) fn at(s: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .unwrap()
        .and_utc()
}
