pub mod connector;
pub mod filter_state;
pub mod mention;
pub mod time_range;

pub use connector::{ConnectorRecord, ConnectorUpdate};
pub use filter_state::{parse_lenient, FilterState, FilterUpdate, SortBy};
pub use mention::{
    DetectedContext, MentionActions, MentionDraft, MentionKind, MentionRecord, MentionSource,
    MentionStatus, Priority, PriorityFactors, PriorityHints, Sender, TagType,
};
pub use time_range::TimeRange;

/// A string that does not name any variant of one of the model enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
