use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Window;
use crate::config::PointsConfig;
use crate::models::{Author, Record, Topic};

/// A contributor, aggregated over every record they authored in the window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub points: u64,
    pub topics_count: u64,
    /// Comments and replies together.
    pub comments_count: u64,
    pub replies_count: u64,
    /// Likes received on authored records.
    pub likes_count: u64,
}

impl User {
    fn new(author: &Author) -> Self {
        Self {
            id: author.id.clone(),
            name: author.name.clone(),
            points: 0,
            topics_count: 0,
            comments_count: 0,
            replies_count: 0,
            likes_count: 0,
        }
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Topic,
    Comment,
    Reply,
}

/// Contributors keyed by author id, kept in order of first appearance.
#[derive(Clone, Debug, Default)]
pub struct UserCollection {
    window: Window,
    weights: PointsConfig,
    users: Vec<User>,
    index: HashMap<String, usize>,
    counted: HashSet<String>,
}

impl UserCollection {
    pub fn new(weights: PointsConfig) -> Self {
        Self {
            weights,
            ..Self::default()
        }
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
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.index.get(id).map(|&i| &self.users[i])
    }

    /// Users in order of first appearance.
    pub fn iter(&self) -> std::slice::Iter<'_, User> {
        self.users.iter()
    }

    /// Credits authors of every in-window topic, comment and reply.
    ///
    /// A record is only ever counted once, so feeding the same snapshot again
    /// leaves the totals unchanged.
    pub fn add_users_from_feed(&mut self, feed: &[Topic]) {
        for topic in feed {
            self.credit(topic, Kind::Topic);
            for comment in &topic.comments {
                self.credit(comment, Kind::Comment);
                for reply in &comment.replies {
                    self.credit(reply, Kind::Reply);
                }
            }
        }
    }

    /// Users by descending points; equal points keep first-seen order.
    pub fn top_users(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.iter().collect();
        users.sort_by(|a, b| b.points.cmp(&a.points));
        users
    }

    fn credit<R: Record>(&mut self, record: &R, kind: Kind) {
        if !self.window.contains(record.created_time()) {
            return;
        }
        let Some(author) = record.author() else {
            return;
        };
        if !self.counted.insert(record.id().to_owned()) {
            return;
        }

        let likes = record.attrs().likes_count;
        let weight = match kind {
            Kind::Topic => self.weights.topic,
            Kind::Comment => self.weights.comment,
            Kind::Reply => self.weights.reply,
        };
        let points = weight.saturating_add(self.weights.like.saturating_mul(likes));

        let i = match self.index.get(&author.id) {
            Some(&i) => i,
            None => {
                self.index.insert(author.id.clone(), self.users.len());
                self.users.push(User::new(author));
                self.users.len() - 1
            }
        };
        let user = &mut self.users[i];

        user.points = user.points.saturating_add(points);
        user.likes_count = user.likes_count.saturating_add(likes);
        match kind {
            Kind::Topic => user.topics_count += 1,
            Kind::Comment => user.comments_count += 1,
            Kind::Reply => {
                user.comments_count += 1;
                user.replies_count += 1;
            }
        }
    }
}
