//! Runs the whole mapping sequence and summarizes it.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collection::{
    CommentCollection, ReplyCollection, TopicCollection, User, UserCollection,
};
use crate::config::DATETIME_FORMAT;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::mapper::Mapper;
use crate::models::Record;
use crate::sink::{LogSink, Progress};

/// Statistics for one reporting window.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub topics: usize,
    pub comments: usize,
    pub replies: usize,
    pub topic_likes: u64,
    pub active_users: usize,
    pub new_users: usize,
    pub most_liked_topic: Option<String>,
    pub most_commented_topic: Option<String>,
    pub top_users: Vec<User>,
}

/// Maps topics, comments, replies and users for the configured window, then
/// counts new members.
///
/// The window closes at `now` when the configuration has no `end_datetime`.
pub fn generate<C, P, L>(mapper: &mut Mapper<C, P, L>, now: DateTime<Utc>) -> Result<Summary>
where
    C: GraphClient,
    P: Progress,
    L: LogSink,
{
    let config = mapper.config();
    config.validate()?;
    let (start, end) = config.window(now)?;
    let weights = config.points;
    let top = config.top_users;

    let mut topics = TopicCollection::new();
    let mut comments = CommentCollection::new();
    let mut replies = ReplyCollection::new();
    let mut users = UserCollection::new(weights);

    mapper.map_topics(&mut topics, start, end)?;
    mapper.map_comments(&mut comments, start, end);
    mapper.map_replies(&mut replies, start, end);
    mapper.map_users(&mut users, start, end);
    let new_users = mapper.new_users_count()?;

    Ok(Summary {
        start,
        end,
        topics: topics.len(),
        comments: comments.len(),
        replies: replies.len(),
        topic_likes: topics.total_likes(),
        active_users: users.len(),
        new_users,
        most_liked_topic: topics.most_liked().map(|t| t.id().to_owned()),
        most_commented_topic: topics.most_commented().map(|t| t.id().to_owned()),
        top_users: users.top_users().into_iter().take(top).cloned().collect(),
    })
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Report {} - {}",
            self.start.format(DATETIME_FORMAT),
            self.end.format(DATETIME_FORMAT)
        )?;
        writeln!(f, "    Topics: {}", self.topics)?;
        writeln!(f, "    Comments: {}", self.comments)?;
        writeln!(f, "    Replies: {}", self.replies)?;
        writeln!(f, "    Likes on topics: {}", self.topic_likes)?;
        writeln!(f, "    Active users: {}", self.active_users)?;
        writeln!(f, "    New users: {}", self.new_users)?;
        if let Some(id) = &self.most_liked_topic {
            writeln!(f, "    Most liked topic: {}", id)?;
        }
        if let Some(id) = &self.most_commented_topic {
            writeln!(f, "    Most active topic: {}", id)?;
        }
        for (rank, user) in self.top_users.iter().enumerate() {
            writeln!(f, "    {}. {} ({} points)", rank + 1, user.name, user.points)?;
        }
        Ok(())
    }
}
