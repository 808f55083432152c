//! The data model of a group feed.
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::{Edge, Node};

/// Gives access to the [`Attrs`] shared by topics, comments and replies.
pub trait Record {
    fn attrs(&self) -> &Attrs;

    fn id(&self) -> &str {
        &self.attrs().id
    }

    fn created_time(&self) -> DateTime<Utc> {
        self.attrs().created_time
    }

    fn author(&self) -> Option<&Author> {
        self.attrs().author.as_ref()
    }
}

/// The author of a [`Topic`], [`Comment`] or [`Reply`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Author {
    pub id: String,

    /// Empty when the API withholds the display name.
    #[serde(default)]
    pub name: String,
}

/// Common attributes between [`Topic`]'s, [`Comment`]'s and [`Reply`]'s.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attrs {
    /// A unique ID identifying the content.
    pub id: String,

    /// Missing when the API hides who posted the content.
    pub author: Option<Author>,

    /// The date at which this content was created.
    pub created_time: DateTime<Utc>,

    pub message: Option<String>,

    pub likes_count: u64,
}

/// A root post of the group feed together with its comment tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Topic {
    #[serde(flatten)]
    pub attrs: Attrs,

    /// Last activity on the topic, including new comments.
    pub updated_time: DateTime<Utc>,

    /// Total comments reported by the API, which may exceed `comments.len()`.
    pub comments_count: u64,

    pub can_comment: bool,

    pub comments: Vec<Comment>,
}

/// A comment on a [`Topic`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comment {
    #[serde(flatten)]
    pub attrs: Attrs,

    /// Number of replies reported by the API.
    pub comments_count: u64,

    pub can_comment: bool,

    pub replies: Vec<Reply>,
}

/// A reply to a [`Comment`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reply {
    #[serde(flatten)]
    pub attrs: Attrs,
}

impl Record for Topic {
    fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

impl Record for Comment {
    fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

impl Record for Reply {
    fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

#[derive(Deserialize)]
struct RawTopic {
    id: String,
    from: Option<Author>,
    #[serde(deserialize_with = "graph_time::deserialize")]
    created_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "graph_time::deserialize_option")]
    updated_time: Option<DateTime<Utc>>,
    message: Option<String>,
    likes: Option<Edge<IgnoredAny>>,
    comments: Option<Edge<RawComment>>,
}

#[derive(Deserialize)]
struct RawComment {
    id: String,
    from: Option<Author>,
    #[serde(deserialize_with = "graph_time::deserialize")]
    created_time: DateTime<Utc>,
    message: Option<String>,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    comment_count: u64,
    #[serde(default)]
    can_comment: bool,
    comments: Option<Edge<RawReply>>,
}

#[derive(Deserialize)]
struct RawReply {
    id: String,
    from: Option<Author>,
    #[serde(deserialize_with = "graph_time::deserialize")]
    created_time: DateTime<Utc>,
    message: Option<String>,
    #[serde(default)]
    like_count: u64,
}

impl Topic {
    /// Normalizes a feed node, reading the like and comment totals from the
    /// summary metadata of its nested edges.
    pub fn from_node(node: &Node) -> Result<Self, GraphError> {
        let raw: RawTopic = node.decode()?;

        let likes_count = raw.likes.as_ref().map_or(0, Edge::total_count);
        let (comments_count, can_comment, comments) = match raw.comments {
            Some(edge) => (
                edge.total_count(),
                edge.summary
                    .as_ref()
                    .and_then(|s| s.can_comment)
                    .unwrap_or(false),
                edge.data.into_iter().map(Comment::from).collect(),
            ),
            None => (0, false, Vec::new()),
        };

        Ok(Topic {
            updated_time: raw.updated_time.unwrap_or(raw.created_time),
            attrs: Attrs {
                id: raw.id,
                author: raw.from,
                created_time: raw.created_time,
                message: raw.message,
                likes_count,
            },
            comments_count,
            can_comment,
            comments,
        })
    }
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            attrs: Attrs {
                id: raw.id,
                author: raw.from,
                created_time: raw.created_time,
                message: raw.message,
                likes_count: raw.like_count,
            },
            comments_count: raw.comment_count,
            can_comment: raw.can_comment,
            replies: raw
                .comments
                .map(|edge| edge.data.into_iter().map(Reply::from).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<RawReply> for Reply {
    fn from(raw: RawReply) -> Self {
        Reply {
            attrs: Attrs {
                id: raw.id,
                author: raw.from,
                created_time: raw.created_time,
                message: raw.message,
                likes_count: raw.like_count,
            },
        }
    }
}

/// Graph timestamps look like `2024-03-02T10:00:00+0000`.
mod graph_time {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_str(s, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(s))
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(d)?;
        parse(&s).map_err(de::Error::custom)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(s) => parse(&s).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, comment, post, reply};
    use serde_json::json;

    #[test]
    fn test_topic_from_node_reads_summaries() {
        let value = post(
            "g_1",
            "u1",
            "2024-03-02T10:00:00+0000",
            10,
            3,
            vec![comment(
                "c1",
                "u2",
                "2024-03-02T11:00:00+0000",
                2,
                vec![reply("r1", "u3", "2024-03-02T12:00:00+0000", 1)],
            )],
        );
        let topic = Topic::from_node(&Node::from(value)).unwrap();

        assert_eq!(topic.id(), "g_1");
        assert_eq!(topic.author().unwrap().name, "Name u1");
        assert_eq!(topic.created_time(), at("2024-03-02 10:00:00"));
        assert_eq!(topic.attrs.likes_count, 10);
        assert_eq!(topic.comments_count, 3);
        assert!(topic.can_comment);

        let c1 = &topic.comments[0];
        assert_eq!(c1.attrs.likes_count, 2);
        assert_eq!(c1.comments_count, 1);
        assert_eq!(c1.replies[0].id(), "r1");
        assert_eq!(c1.replies[0].created_time(), at("2024-03-02 12:00:00"));
    }

    #[test]
    fn test_topic_without_nested_edges() {
        let node = Node::from(json!({
            "id": "g_2",
            "created_time": "2024-03-02T10:00:00+0100",
        }));
        let topic = Topic::from_node(&node).unwrap();

        assert!(topic.author().is_none());
        assert_eq!(topic.created_time(), at("2024-03-02 09:00:00"));
        assert_eq!(topic.updated_time, topic.created_time());
        assert_eq!(topic.attrs.likes_count, 0);
        assert_eq!(topic.comments_count, 0);
        assert!(!topic.can_comment);
        assert!(topic.comments.is_empty());
    }

    #[test]
    fn test_author_without_name() {
        let mut value = post("g_4", "u1", "2024-03-02T10:00:00+0000", 0, 0, vec![]);
        value["from"] = json!({ "id": "u1" });

        let topic = Topic::from_node(&Node::from(value)).unwrap();
        let author = topic.author().unwrap();
        assert_eq!(author.id, "u1");
        assert_eq!(author.name, "");
    }

    #[test]
    fn test_invalid_timestamp_is_a_client_error() {
        let node = Node::from(json!({ "id": "g_3", "created_time": "yesterday" }));
        assert!(matches!(
            Topic::from_node(&node),
            Err(GraphError::Client(_))
        ));
    }

    #[test]
    fn test_rfc3339_timestamps_are_accepted() {
        assert_eq!(
            graph_time::parse("2024-03-02T10:00:00Z").unwrap(),
            at("2024-03-02 10:00:00")
        );
    }
}
