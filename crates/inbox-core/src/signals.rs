//! Signal extraction over mention text.
//!
//! Matching is plain substring search over the lowercased concatenation of
//! title and content, so "Done" matches inside "abandoned" as well. Phrase
//! lists live in [`crate::constants`].

use crate::constants::{ACTION_SIGNALS, INFO_SIGNALS, RESOLVED_SIGNALS, URGENCY_PHRASES};
use crate::models::DetectedContext;

/// Lowercased "title content" text the phrase lists are matched against.
fn searchable_text(title: &str, content: &str) -> String {
    format!("{} {}", title, content).to_lowercase()
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

/// Classify text into a coarse content category.
///
/// Lists are checked in a fixed order: resolved, then action, then
/// information. The first list with a hit wins, so an item that asks for
/// something and later confirms it is finished counts as resolved. Text with
/// no hits is information.
pub fn detect_context(title: &str, content: &str) -> DetectedContext {
    let text = searchable_text(title, content);

    if contains_any(&text, RESOLVED_SIGNALS) {
        return DetectedContext::Resolved;
    }
    if contains_any(&text, ACTION_SIGNALS) {
        return DetectedContext::ActionNeeded;
    }
    if contains_any(&text, INFO_SIGNALS) {
        return DetectedContext::Information;
    }
    DetectedContext::Information
}

/// Every urgency phrase found in the text, in phrase-list order.
pub fn extract_urgency_signals(title: &str, content: &str) -> Vec<String> {
    let text = searchable_text(title, content);

    URGENCY_PHRASES
        .iter()
        .filter(|phrase| text.contains(*phrase))
        .map(|phrase| phrase.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_takes_precedence() {
        assert_eq!(
            detect_context("Can you review the fix?", "Never mind, it's merged now."),
            DetectedContext::Resolved
        );
        for resolved in RESOLVED_SIGNALS {
            for action in ACTION_SIGNALS {
                assert_eq!(
                    detect_context(action, resolved),
                    DetectedContext::Resolved,
                    "{} + {}",
                    action,
                    resolved
                );
            }
        }
    }

    #[test]
    fn test_action_before_information() {
        assert_eq!(
            detect_context("FYI", "but please check the numbers"),
            DetectedContext::ActionNeeded
        );
        assert_eq!(
            detect_context("Action Required: Q4 Budget Review", "I need you to approve"),
            DetectedContext::ActionNeeded
        );
    }

    #[test]
    fn test_information_and_default() {
        assert_eq!(
            detect_context("Heads up", "the office is closing early"),
            // "closing" does not contain "closed"
            DetectedContext::Information
        );
        assert_eq!(detect_context("Lunch?", "Tacos at noon"), DetectedContext::Information);
        assert_eq!(detect_context("", ""), DetectedContext::Information);
    }

    #[test]
    fn test_matching_spans_title_and_content() {
        // The space inserted between title and content is part of the text
        assert_eq!(detect_context("please", "check"), DetectedContext::ActionNeeded);
    }

    #[test]
    fn test_urgency_signals_in_list_order() {
        assert_eq!(
            extract_urgency_signals("URGENT please check", ""),
            vec!["urgent".to_string(), "please check".to_string()]
        );
        assert_eq!(
            extract_urgency_signals("Please check by EOD", "this is critical and urgent, ASAP"),
            vec!["urgent", "asap", "critical", "by eod", "please check"]
        );
        assert!(extract_urgency_signals("Sprint planning", "at 2 PM").is_empty());
    }

    #[test]
    fn test_urgency_signals_not_duplicated() {
        assert_eq!(extract_urgency_signals("urgent urgent", "URGENT"), vec!["urgent"]);
    }
}
