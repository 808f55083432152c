//! Fetches a group's feed and members and maps them onto collections.
use chrono::{DateTime, Utc};

use crate::collection::{
    CommentCollection, ReplyCollection, TopicCollection, User, UserCollection,
};
use crate::config::{Config, DATETIME_FORMAT};
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{Record, Topic};
use crate::query::Query;
use crate::sink::{LogSink, Progress};

/// Fields requested for each feed item: the topic, its first 200 comments and
/// their first 200 replies, with like and comment totals.
pub const FEED_FIELDS: &str = "comments.limit(200).summary(1){like_count,comment_count,from,created_time,message,can_comment,comments.limit(200).summary(1){like_count,comment_count,from,created_time,message}},likes.limit(0).summary(1),from,created_time,updated_time,message";

const FEED_PAGE_SIZE: u32 = 100;
const MEMBERS_PAGE_SIZE: u32 = 1000;

/// Drives the Graph client and fills the collections.
///
/// [`Mapper::map_topics`] fetches the feed; the other `map_*` operations
/// reuse the snapshot it leaves behind, so call it first.
pub struct Mapper<C, P, L> {
    config: Config,
    client: C,
    progress: P,
    log: L,
    feed: Vec<Topic>,
}

fn step<P: Progress>(progress: &mut P, message: &str) {
    progress.set_message(message);
    progress.advance();
}

impl<C, P, L> Mapper<C, P, L>
where
    C: GraphClient,
    P: Progress,
    L: LogSink,
{
    pub fn new(config: Config, client: C, progress: P, log: L) -> Self {
        Self {
            config,
            client,
            progress,
            log,
            feed: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The snapshot left by the last successful [`Mapper::fetch_feed`].
    pub fn feed(&self) -> &[Topic] {
        &self.feed
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Fetches every feed page updated since `start_datetime`.
    ///
    /// Replaces the previous snapshot. If any page fails, the snapshot is left
    /// empty.
    pub fn fetch_feed(&mut self) -> Result<&[Topic]> {
        step(&mut self.progress, "Fetching feed...");
        self.feed.clear();

        let query = Query::new()
            .fields(FEED_FIELDS)
            .include_hidden(true)
            .limit(FEED_PAGE_SIZE)
            .since(self.config.start_datetime()?);
        let path = format!("/{}/feed", self.config.group_id);

        let mut feed = Vec::new();
        for (n, page) in self.client.pages(path, query).enumerate() {
            let page = page?;
            let topics = page
                .nodes()
                .iter()
                .map(Topic::from_node)
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let updated = topics.first().map_or_else(
                || "-".to_string(),
                |t| t.updated_time.format(DATETIME_FORMAT).to_string(),
            );
            step(
                &mut self.progress,
                &format!(
                    "Fetching feed from API page {} and with the topic updated {}",
                    n + 1,
                    updated
                ),
            );
            feed.extend(topics);
        }

        log::info!("Fetched {} topics from group {}", feed.len(), self.config.group_id);
        self.feed = feed;
        step(&mut self.progress, "Adding topics to collection...");

        Ok(&self.feed)
    }

    /// Fetches the feed, adds in-window topics to `topics` and logs each one.
    pub fn map_topics(
        &mut self,
        topics: &mut TopicCollection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        topics.set_start_date(start);
        topics.set_end_date(end);
        self.fetch_feed()?;
        topics.add_topics_from_feed(&self.feed);

        for topic in topics.iter() {
            self.log.log_topic(&topic_line(topic));
        }
        Ok(())
    }

    pub fn map_comments(
        &self,
        comments: &mut CommentCollection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        comments.set_start_date(start);
        comments.set_end_date(end);
        comments.add_comments_from_feed(&self.feed);
    }

    pub fn map_replies(
        &self,
        replies: &mut ReplyCollection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        replies.set_start_date(start);
        replies.set_end_date(end);
        replies.add_replies_from_feed(&self.feed);
    }

    /// Aggregates contributors from the fetched feed and logs them by rank.
    pub fn map_users(
        &mut self,
        users: &mut UserCollection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        users.set_start_date(start);
        users.set_end_date(end);
        users.add_users_from_feed(&self.feed);

        for user in users.top_users() {
            self.log.log_contributor(&contributor_line(user));
        }
    }

    /// Counts members who joined after `last_member_name`.
    ///
    /// Members are listed newest first. Counting stops at the first member
    /// named `last_member_name`, who is logged but not counted, or once
    /// `api_pages` pages have been read.
    pub fn new_users_count(&mut self) -> Result<usize> {
        step(&mut self.progress, "Retrieving members...");

        let query = Query::new().fields("id,name").limit(MEMBERS_PAGE_SIZE);
        let path = format!("/{}/members", self.config.group_id);
        let cap = match self.config.api_pages {
            0 => usize::MAX,
            pages => pages,
        };
        let sentinel = self.config.last_member_name.as_str();

        let mut count = 0;
        for (n, page) in self.client.pages(path, query).take(cap).enumerate() {
            let page = page?;
            step(
                &mut self.progress,
                &format!("Retrieving members from API page {}", n + 1),
            );

            for member in page.nodes() {
                let id = member.str_field("id").unwrap_or_default();
                let name = member.str_field("name").unwrap_or_default();
                self.log.log_new_user(&format!("{}\t{}", id, name));

                if !sentinel.is_empty() && name == sentinel {
                    log::info!("Reached last known member {} after {} new members", name, count);
                    self.progress.advance();
                    return Ok(count);
                }
                count += 1;
            }
        }

        self.progress.advance();
        Ok(count)
    }
}

fn topic_line(topic: &Topic) -> String {
    format!(
        "{}\t Likes: {}\t Comments: {}",
        topic.id(),
        topic.attrs.likes_count,
        topic.comments_count
    )
}

fn contributor_line(user: &User) -> String {
    format!(
        "{}\t{}\tPoints: {}\tTopics: {}\tComments: {}",
        user.id, user.name, user.points, user.topics_count, user.comments_count
    )
}
