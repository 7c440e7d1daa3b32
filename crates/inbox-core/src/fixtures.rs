//! Sample data and fixture loading.
//!
//! Stands in for the chat / email / issue-tracker adapters: records arrive
//! here already parsed and go through the same ingestion as live data would.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    ConnectorRecord, MentionActions, MentionDraft, MentionKind, MentionRecord, MentionSource, MentionStatus,
    Priority, PriorityHints, Sender,
};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Connectors plus ingested mentions, ready to load into the stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureSet {
    pub connectors: Vec<ConnectorRecord>,
    /// Deserialized through `MentionDraft`, so classification always runs
    pub mentions: Vec<MentionRecord>,
}

pub fn parse_fixtures(json: &str) -> Result<FixtureSet, FixtureError> {
    let fixtures: FixtureSet = serde_json::from_str(json)?;
    Ok(fixtures)
}

pub fn load_fixtures(path: &Path) -> Result<FixtureSet, FixtureError> {
    let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let fixtures = parse_fixtures(&json)?;
    tracing::info!(
        path = %path.display(),
        connectors = fixtures.connectors.len(),
        mentions = fixtures.mentions.len(),
        "Loaded fixtures"
    );
    Ok(fixtures)
}

fn person(name: &str, email: &str, role: &str) -> Sender {
    let seed = name.split_whitespace().next().unwrap_or(name);
    Sender {
        name: name.to_string(),
        avatar: Some(format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", seed)),
        email: Some(email.to_string()),
        role: Some(role.to_string()),
    }
}

fn actions(can_reply: bool, source_url: &str) -> MentionActions {
    MentionActions {
        can_reply,
        source_url: source_url.to_string(),
        ..Default::default()
    }
}

fn hints(sender_importance: bool, solo_responsibility: bool, context_urgency: bool) -> PriorityHints {
    PriorityHints {
        sender_importance,
        solo_responsibility,
        context_urgency,
    }
}

/// The demo workspace: three connectors and eight mentions spread over the
/// last few hours before `now`.
pub fn sample_inbox(now: DateTime<Utc>) -> FixtureSet {
    let connectors = vec![
        ConnectorRecord {
            last_sync: Some(now - Duration::minutes(5)),
            ..ConnectorRecord::new("slack-1", "Slack", MentionSource::Chat, 5)
        },
        ConnectorRecord {
            last_sync: Some(now - Duration::minutes(2)),
            ..ConnectorRecord::new("email-1", "Gmail", MentionSource::Email, 4)
        },
        ConnectorRecord {
            last_sync: Some(now - Duration::minutes(10)),
            ..ConnectorRecord::new("jira-1", "Jira", MentionSource::IssueTracker, 3)
        },
    ];

    let drafts = vec![
        MentionDraft {
            context: "We're planning to migrate the production database this weekend. The script has been tested in staging but needs your final approval before we proceed.".into(),
            group_id: Some("migration-project".into()),
            group_label: Some("Database Migration Project".into()),
            hints: hints(false, true, true),
            actions: actions(true, "https://company.slack.com/archives/C1234567890/p1234567890123456"),
            ..MentionDraft::new(
                MentionKind::Mention,
                MentionSource::Chat,
                person("Sarah Chen", "sarah.chen@company.com", "Tech Lead"),
                now - Duration::minutes(2),
                "Urgent: Database migration needs review",
                "@john can you review the database migration script? We need to deploy this by EOD.",
                Priority::High,
            )
            .with_id("slack-1")
        },
        MentionDraft {
            context: "The migration script looks solid. I've tested it in our dev environment and everything works as expected. Just make sure we have a rollback plan.".into(),
            group_id: Some("migration-project".into()),
            group_label: Some("Database Migration Project".into()),
            is_new_in_thread: true,
            actions: actions(true, "https://company.slack.com/archives/C1234567890/p1234567890123457"),
            ..MentionDraft::new(
                MentionKind::ThreadResponse,
                MentionSource::Chat,
                person("Mike Rodriguez", "mike.rodriguez@company.com", "Senior Developer"),
                now - Duration::minutes(5),
                "Re: Database migration needs review",
                "I've reviewed the script and it looks good. One small suggestion: add a rollback procedure.",
                Priority::Medium,
            )
            .with_id("slack-2")
            .in_thread("slack-1")
        },
        MentionDraft {
            context: "The Q4 budget has been prepared and needs your review. Please review the attached spreadsheet and provide your feedback by Friday.".into(),
            hints: hints(true, true, true),
            actions: actions(true, "https://mail.google.com/mail/u/0/#inbox/1234567890abcdef"),
            ..MentionDraft::new(
                MentionKind::Assignment,
                MentionSource::Email,
                person("Lisa Wang", "lisa.wang@company.com", "CEO"),
                now - Duration::minutes(15),
                "Action Required: Q4 Budget Review",
                "Hi John, I need you to review and approve the Q4 budget allocation for the engineering team.",
                Priority::High,
            )
            .with_id("email-1")
        },
        MentionDraft {
            context: "We've updated our security policies to align with industry best practices. Please review the attached document and ensure your team is aware of the changes.".into(),
            actions: actions(true, "https://mail.google.com/mail/u/0/#inbox/1234567890abcdef"),
            ..MentionDraft::new(
                MentionKind::Mention,
                MentionSource::Email,
                person("David Kim", "david.kim@company.com", "Security Lead"),
                now - Duration::minutes(30),
                "FYI: New security policy update",
                "Hi team, just wanted to let you know about the new security policy that goes into effect next week.",
                Priority::Medium,
            )
            .with_id("email-2")
            .with_status(MentionStatus::Read)
        },
        MentionDraft {
            context: "Users are reporting that the login page is not loading properly on mobile devices. The issue appears to be related to the responsive design implementation.".into(),
            group_id: Some("mobile-bugs".into()),
            group_label: Some("Mobile Bug Fixes".into()),
            hints: hints(false, true, true),
            actions: actions(false, "https://company.atlassian.net/browse/BUG-1234"),
            ..MentionDraft::new(
                MentionKind::Assignment,
                MentionSource::IssueTracker,
                person("System", "system@company.com", "System"),
                now - Duration::minutes(45),
                "Bug: Login page not loading on mobile",
                "You have been assigned to investigate and fix the login page issue on mobile devices.",
                Priority::High,
            )
            .with_id("jira-1")
        },
        MentionDraft {
            context: "Users have been requesting dark mode support for the application. This would be a great addition to improve accessibility and user experience.".into(),
            group_id: Some("feature-requests".into()),
            group_label: Some("Feature Requests".into()),
            actions: actions(true, "https://company.atlassian.net/browse/FEAT-5678"),
            ..MentionDraft::new(
                MentionKind::Mention,
                MentionSource::IssueTracker,
                person("Alex Thompson", "alex.thompson@company.com", "Product Manager"),
                now - Duration::hours(1),
                "Feature Request: Dark mode support",
                "Can we add dark mode support to the application? This would improve user experience significantly.",
                Priority::Medium,
            )
            .with_id("jira-2")
            .with_status(MentionStatus::Read)
        },
        MentionDraft {
            context: "We have our weekly sprint planning meeting scheduled for 2 PM today. Please prepare your user stories and be ready to discuss priorities.".into(),
            actions: actions(true, "https://company.slack.com/archives/C1234567890/p1234567890123458"),
            ..MentionDraft::new(
                MentionKind::Mention,
                MentionSource::Chat,
                person("Emma Wilson", "emma.wilson@company.com", "Scrum Master"),
                now - Duration::hours(2),
                "Meeting reminder: Sprint planning",
                "@john don't forget about our sprint planning meeting at 2 PM today.",
                Priority::Low,
            )
            .with_id("slack-3")
            .with_status(MentionStatus::Read)
        },
        MentionDraft {
            context: "The annual performance review process has begun. Please complete your self-assessment form and submit it by the end of next week.".into(),
            hints: hints(false, true, false),
            actions: actions(true, "https://mail.google.com/mail/u/0/#inbox/1234567890abcdef"),
            ..MentionDraft::new(
                MentionKind::Assignment,
                MentionSource::Email,
                person("HR Team", "hr@company.com", "HR"),
                now - Duration::hours(3),
                "Action Required: Performance review",
                "Your annual performance review is due next week. Please complete the self-assessment form.",
                Priority::Medium,
            )
            .with_id("email-3")
        },
        MentionDraft {
            context: "I completely agree with this feature request. Dark mode would significantly improve the user experience, especially for users who work in low-light environments.".into(),
            group_id: Some("feature-requests".into()),
            group_label: Some("Feature Requests".into()),
            is_new_in_thread: true,
            actions: actions(true, "https://company.atlassian.net/browse/FEAT-5678"),
            ..MentionDraft::new(
                MentionKind::ThreadResponse,
                MentionSource::IssueTracker,
                person("Maria Garcia", "maria.garcia@company.com", "UX Designer"),
                now - Duration::hours(4),
                "Re: Feature Request: Dark mode support",
                "I agree! Dark mode would be a great addition. I can help with the design mockups.",
                Priority::Low,
            )
            .with_id("jira-3")
            .in_thread("jira-2")
            .with_status(MentionStatus::Read)
        },
    ];

    FixtureSet {
        connectors,
        mentions: drafts.into_iter().map(MentionRecord::ingest).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetectedContext, TagType};
    use chrono::TimeZone;
    use std::io::Write;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sample_inbox_shape() {
        let sample = sample_inbox(now());
        assert_eq!(sample.connectors.len(), 3);
        assert_eq!(sample.mentions.len(), 9);

        let threaded: Vec<&str> = sample
            .mentions
            .iter()
            .filter(|m| m.thread_id.is_some())
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(threaded, vec!["slack-2", "jira-3"]);
    }

    #[test]
    fn test_sample_classification() {
        let sample = sample_inbox(now());
        let get = |id: &str| sample.mentions.iter().find(|m| m.id == id).unwrap();

        assert_eq!(get("slack-1").tag_type(), TagType::ActionNeeded);
        assert_eq!(get("email-1").tag_type(), TagType::ActionNeeded);
        assert_eq!(get("email-2").detected_context(), DetectedContext::Information);
        assert_eq!(get("email-2").tag_type(), TagType::Others);
        // "fix" is not "fixed": the assignment stays action-needed
        assert_eq!(get("jira-1").detected_context(), DetectedContext::ActionNeeded);
        assert_eq!(get("slack-3").detected_context(), DetectedContext::Information);
        // "I've reviewed" matches "review"
        assert_eq!(get("slack-2").detected_context(), DetectedContext::ActionNeeded);
        assert_eq!(get("slack-2").tag_type(), TagType::Others);
        assert_eq!(
            get("email-3").priority_factors().urgency_signals,
            vec!["action required".to_string()]
        );
    }

    #[test]
    fn test_parse_fixtures_runs_ingestion() {
        let json = r#"{
            "connectors": [
                {"id": "slack-1", "name": "Slack", "type": "chat", "isEnabled": true, "priority": 5, "isConnected": true}
            ],
            "mentions": [
                {
                    "type": "assignment",
                    "source": "chat",
                    "sender": {"name": "Sarah Chen"},
                    "timestamp": "2025-03-10T11:00:00Z",
                    "title": "Deploy done",
                    "content": "Migration completed",
                    "priority": "high"
                }
            ]
        }"#;
        let fixtures = parse_fixtures(json).unwrap();

        assert_eq!(fixtures.connectors[0].source, MentionSource::Chat);
        let mention = &fixtures.mentions[0];
        assert!(!mention.id.is_empty());
        assert_eq!(mention.tag_type(), TagType::Resolved);
        assert_eq!(mention.status(), MentionStatus::Unread);
    }

    #[test]
    fn test_load_fixtures_from_file() {
        let sample = sample_inbox(now());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&sample).unwrap().as_bytes())
            .unwrap();

        let loaded = load_fixtures(file.path()).unwrap();
        assert_eq!(loaded.connectors, sample.connectors);
        assert_eq!(loaded.mentions, sample.mentions);
    }

    #[test]
    fn test_load_errors() {
        let missing = load_fixtures(Path::new("/nonexistent/fixtures.json"));
        assert!(matches!(missing, Err(FixtureError::Io { .. })));

        let invalid = parse_fixtures("{ not json");
        assert!(matches!(invalid, Err(FixtureError::Json(_))));
    }
}
