pub mod commands;
pub mod config;
pub mod format;
pub mod repl;

pub use commands::{
    feed_lines, handle_connectors, handle_feed, handle_senders, handle_show, load_state, FilterArgs,
};
pub use config::CliConfig;
pub use repl::{parse_command, ReplCommand, ReplSession};
