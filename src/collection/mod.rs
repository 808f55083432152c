//! Date-windowed collections built from a fetched feed.
//!
//! Every collection applies the same inclusion rule: a record is kept only
//! when its creation time lies within the collection's [`Window`], both
//! bounds included.
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Comment, Record, Reply, Topic};

mod users;

pub use users::{User, UserCollection};

pub type TopicCollection = Collection<Topic>;
pub type CommentCollection = Collection<Comment>;
pub type ReplyCollection = Collection<Reply>;

/// An inclusive date range. A missing bound leaves that side open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| time >= start) && self.end.map_or(true, |end| time <= end)
    }
}

/// Records keyed by id, iterated in insertion order.
#[derive(Clone, Debug)]
pub struct Collection<T> {
    window: Window,
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            window: Window::default(),
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Record + Clone> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_start_date(&mut self, start: DateTime<Utc>) {
        self.window.start = Some(start);
    }

    pub fn set_end_date(&mut self, end: DateTime<Utc>) {
        self.window.end = Some(end);
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Sum of likes over every record in the collection.
    pub fn total_likes(&self) -> u64 {
        self.items.iter().map(|r| r.attrs().likes_count).sum()
    }

    /// The record with the most likes; the earliest inserted wins a tie.
    pub fn most_liked(&self) -> Option<&T> {
        self.items
            .iter()
            .reduce(|best, r| {
                if r.attrs().likes_count > best.attrs().likes_count {
                    r
                } else {
                    best
                }
            })
    }

    /// Adds `record` if it falls inside the window. Re-adding an id replaces
    /// the stored record in place.
    fn insert(&mut self, record: &T) -> bool {
        if !self.window.contains(record.created_time()) {
            return false;
        }

        match self.index.get(record.id()) {
            Some(&i) => self.items[i] = record.clone(),
            None => {
                self.index.insert(record.id().to_owned(), self.items.len());
                self.items.push(record.clone());
            }
        }
        true
    }
}

impl Collection<Topic> {
    pub fn add_topics_from_feed(&mut self, feed: &[Topic]) {
        for topic in feed {
            self.insert(topic);
        }
    }

    /// The topic with the most comments; the earliest inserted wins a tie.
    pub fn most_commented(&self) -> Option<&Topic> {
        self.items.iter().reduce(|best, t| {
            if t.comments_count > best.comments_count {
                t
            } else {
                best
            }
        })
    }
}

impl Collection<Comment> {
    pub fn add_comments_from_feed(&mut self, feed: &[Topic]) {
        for comment in feed.iter().flat_map(|t| &t.comments) {
            self.insert(comment);
        }
    }
}

impl Collection<Reply> {
    pub fn add_replies_from_feed(&mut self, feed: &[Topic]) {
        let replies = feed
            .iter()
            .flat_map(|t| &t.comments)
            .flat_map(|c| &c.replies);
        for reply in replies {
            self.insert(reply);
        }
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
