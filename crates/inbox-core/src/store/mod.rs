pub mod connector_store;
pub mod inbox_state;
pub mod mention_store;

pub use connector_store::{ConnectorIndex, ConnectorStore};
pub use inbox_state::InboxState;
pub use mention_store::{MentionList, MentionStore};
