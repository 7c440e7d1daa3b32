//! Core of the unified mentions inbox.
//!
//! Items from chat, email and issue trackers are classified on ingestion
//! ([`signals`], [`tagging`]), kept in copy-on-write stores ([`store`]) and
//! turned into a filtered, sorted and thread-grouped feed ([`feed`]).

pub mod config;
pub mod constants;
pub mod feed;
pub mod fixtures;
pub mod models;
pub mod signals;
pub mod store;
pub mod tagging;
pub mod tracing_setup;

pub use config::CoreConfig;
pub use feed::{assemble_feed, Feed, Selection};
pub use fixtures::{load_fixtures, parse_fixtures, sample_inbox, FixtureError, FixtureSet};
pub use store::{ConnectorIndex, ConnectorStore, InboxState, MentionStore};
