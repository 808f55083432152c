//! # groupstats
//!
//! The `groupstats` crate pulls a group's feed and member list from the
//! [Graph API](https://developers.facebook.com/docs/graph-api/), and aggregates
//! them into topics, comments, replies and contributors for a reporting window.
//!
//! ## Producing a report
//!
//! The following example loads a configuration file, fetches everything the
//! report needs and prints the summary. Topic, contributor and new member lines
//! are written to the configured log directory.
//!
//! ```rust,no_run
//! use groupstats::{report, Config, FileLog, HttpGraphClient, LogProgress, Mapper};
//!
//! # fn main() -> groupstats::Result<()> {
//! let config = Config::load("groupstats.toml")?;
//! let client = HttpGraphClient::new(&config.graph)?;
//! let log = FileLog::create(&config.log_dir)?;
//!
//! let mut mapper = Mapper::new(config, client, LogProgress::new(), log);
//! let summary = report::generate(&mut mapper, chrono::Utc::now())?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Walking an edge page by page
//!
//! Every edge is exposed as a lazy sequence of pages, so limiting how much is
//! fetched is just a matter of taking fewer pages.
//!
//! ```rust,no_run
//! use groupstats::{GraphClient, GraphConfig, HttpGraphClient, Query};
//!
//! # fn main() -> Result<(), groupstats::GraphError> {
//! let client = HttpGraphClient::new(&GraphConfig::default())?;
//! let query = Query::new().fields("id,name").limit(100);
//!
//! for page in client.pages("/2204685680/members", query).take(2) {
//!     for member in page?.nodes() {
//!         println!("{:?}", member.str_field("name"));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod graph;
pub mod mapper;
pub mod models;
pub mod report;
pub mod sink;

mod client;
mod query;

#[cfg(test)]
mod testing;

pub use client::HttpGraphClient;
pub use collection::{
    CommentCollection, ReplyCollection, TopicCollection, User, UserCollection, Window,
};
pub use config::{Config, GraphConfig, PointsConfig};
pub use error::{Error, GraphError, Result};
pub use graph::{Edge, GraphClient, Node, Pages};
pub use mapper::Mapper;
pub use query::Query;
pub use sink::{FileLog, LogProgress, LogSink, Progress};
