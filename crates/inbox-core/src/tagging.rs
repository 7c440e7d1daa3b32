use crate::models::{DetectedContext, Priority, TagType};

/// Assign the display tag for a classified item.
///
/// Only high-priority items are promoted to `ActionNeeded` / `CriticalInfo`;
/// medium and low priority action items end up under `Others`.
pub fn compute_tag_type(context: DetectedContext, priority: Priority) -> TagType {
    match (context, priority) {
        (DetectedContext::ActionNeeded, Priority::High) => TagType::ActionNeeded,
        (DetectedContext::Information, Priority::High) => TagType::CriticalInfo,
        (DetectedContext::Resolved, _) => TagType::Resolved,
        _ => TagType::Others,
    }
}
