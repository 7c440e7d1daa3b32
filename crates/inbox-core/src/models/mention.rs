use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;
use crate::constants::MAX_EXPLAINED_SIGNALS;
use crate::signals::{detect_context, extract_urgency_signals};
use crate::tagging::compute_tag_type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    /// The user was named in a message
    Mention,
    /// Something was assigned to the user
    Assignment,
    /// A reply landed in a thread the user is part of
    ThreadResponse,
}

impl MentionKind {
    pub const ALL: [MentionKind; 3] = [Self::Mention, Self::Assignment, Self::ThreadResponse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::Assignment => "assignment",
            Self::ThreadResponse => "thread_response",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::Assignment => "assignment",
            Self::ThreadResponse => "thread response",
        }
    }
}

impl fmt::Display for MentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "mention" => Ok(Self::Mention),
            "assignment" => Ok(Self::Assignment),
            "thread_response" | "reply" => Ok(Self::ThreadResponse),
            _ => Err(UnknownVariant::new("mention kind", s)),
        }
    }
}

/// Upstream system an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionSource {
    Chat,
    Email,
    IssueTracker,
}

impl MentionSource {
    pub const ALL: [MentionSource; 3] = [Self::Chat, Self::Email, Self::IssueTracker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Email => "email",
            Self::IssueTracker => "issue_tracker",
        }
    }
}

impl fmt::Display for MentionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentionSource {
    type Err = UnknownVariant;

    /// Accepts the canonical names plus the product names the sources are
    /// usually known by.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "chat" | "slack" => Ok(Self::Chat),
            "email" | "mail" => Ok(Self::Email),
            "issue_tracker" | "issues" | "jira" => Ok(Self::IssueTracker),
            _ => Err(UnknownVariant::new("source", s)),
        }
    }
}

/// Intrinsic importance, assigned at ingestion and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric weight used by the priority sort (high sorts first).
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage state. The only part of a record that changes after ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionStatus {
    #[default]
    Unread,
    Read,
    Done,
    Archived,
}

impl MentionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Done => "done",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for MentionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            "done" => Ok(Self::Done),
            "archived" => Ok(Self::Archived),
            _ => Err(UnknownVariant::new("status", s)),
        }
    }
}

/// Coarse content category derived from title + content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedContext {
    ActionNeeded,
    Information,
    Resolved,
}

/// Display tag derived from the detected context and the item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    ActionNeeded,
    CriticalInfo,
    Resolved,
    Others,
}

impl TagType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ActionNeeded => "Action Needed",
            Self::CriticalInfo => "Critical Info",
            Self::Resolved => "Resolved",
            Self::Others => "Info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role label (CEO, Tech Lead, ...) used when explaining importance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Sender {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
            email: None,
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Priority factors supplied by the source adapter. Urgency signals are not
/// part of this: they are always extracted from the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorityHints {
    pub sender_importance: bool,
    pub solo_responsibility: bool,
    pub context_urgency: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityFactors {
    pub sender_importance: bool,
    pub urgency_signals: Vec<String>,
    pub solo_responsibility: bool,
    pub context_urgency: bool,
}

impl PriorityFactors {
    /// Human-readable reasons this item is prioritized, for the detail view.
    pub fn explanations(&self, sender: &Sender) -> Vec<String> {
        let mut reasons = Vec::new();

        if self.sender_importance {
            let role = sender.role.as_deref().unwrap_or("VIP");
            reasons.push(format!("Message from {}", role));
        }
        if !self.urgency_signals.is_empty() {
            let shown: Vec<&str> = self
                .urgency_signals
                .iter()
                .take(MAX_EXPLAINED_SIGNALS)
                .map(String::as_str)
                .collect();
            reasons.push(format!("Urgency signals: {}", shown.join(", ")));
        }
        if self.solo_responsibility {
            reasons.push("You are solely responsible".to_string());
        }
        if self.context_urgency {
            reasons.push("Context marked urgent".to_string());
        }

        if !self.sender_importance && self.urgency_signals.is_empty() && !self.solo_responsibility {
            return vec!["No specific priority factors detected".to_string()];
        }
        reasons
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionActions {
    pub can_reply: bool,
    pub can_mark_done: bool,
    pub can_archive: bool,
    #[serde(default)]
    pub source_url: String,
}

impl Default for MentionActions {
    fn default() -> Self {
        Self {
            can_reply: true,
            can_mark_done: true,
            can_archive: true,
            source_url: String::new(),
        }
    }
}

/// An inbound item as supplied by a source adapter, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionDraft {
    /// Generated at ingestion when missing
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: MentionKind,
    pub source: MentionSource,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub is_thread_response: bool,
    pub priority: Priority,
    #[serde(default)]
    pub status: MentionStatus,
    #[serde(default)]
    pub archive_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub group_label: Option<String>,
    #[serde(default)]
    pub is_new_in_thread: bool,
    #[serde(default, rename = "priorityFactors")]
    pub hints: PriorityHints,
    #[serde(default)]
    pub actions: MentionActions,
}

impl MentionDraft {
    pub fn new(
        kind: MentionKind,
        source: MentionSource,
        sender: Sender,
        timestamp: DateTime<Utc>,
        title: impl Into<String>,
        content: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: None,
            kind,
            source,
            sender,
            timestamp,
            title: title.into(),
            content: content.into(),
            context: String::new(),
            thread_id: None,
            is_thread_response: false,
            priority,
            status: MentionStatus::Unread,
            archive_until: None,
            group_id: None,
            group_label: None,
            is_new_in_thread: false,
            hints: PriorityHints::default(),
            actions: MentionActions::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn in_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self.is_thread_response = true;
        self
    }

    pub fn with_status(mut self, status: MentionStatus) -> Self {
        self.status = status;
        self
    }
}

/// An ingested notification-like item.
///
/// Title, content and the fields derived from them are private: the derived
/// classification is computed once in [`MentionRecord::ingest`] and can only
/// stay consistent if the text it was computed from cannot change. Status and
/// archive date are only changed by the mention store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "MentionDraft")]
pub struct MentionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MentionKind,
    pub source: MentionSource,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    title: String,
    content: String,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub is_thread_response: bool,
    pub priority: Priority,
    status: MentionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    archive_until: Option<DateTime<Utc>>,
    detected_context: DetectedContext,
    tag_type: TagType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
    pub is_new_in_thread: bool,
    priority_factors: PriorityFactors,
    pub actions: MentionActions,
}

impl MentionRecord {
    /// Classify a draft and turn it into a record.
    pub fn ingest(draft: MentionDraft) -> Self {
        let id = draft
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let detected_context = detect_context(&draft.title, &draft.content);
        let tag_type = compute_tag_type(detected_context, draft.priority);
        let urgency_signals = extract_urgency_signals(&draft.title, &draft.content);

        let (status, archive_until) = match (draft.status, draft.archive_until) {
            (MentionStatus::Archived, Some(until)) => (MentionStatus::Archived, Some(until)),
            (MentionStatus::Archived, None) => {
                tracing::warn!(id = %id, "archived item without archive date, ingesting as read");
                (MentionStatus::Read, None)
            }
            (status, _) => (status, None),
        };

        tracing::debug!(
            id = %id,
            source = %draft.source,
            ?detected_context,
            ?tag_type,
            "ingested mention"
        );

        Self {
            id,
            kind: draft.kind,
            source: draft.source,
            sender: draft.sender,
            timestamp: draft.timestamp,
            title: draft.title,
            content: draft.content,
            context: draft.context,
            thread_id: draft.thread_id,
            is_thread_response: draft.is_thread_response,
            priority: draft.priority,
            status,
            archive_until,
            detected_context,
            tag_type,
            group_id: draft.group_id,
            group_label: draft.group_label,
            is_new_in_thread: draft.is_new_in_thread,
            priority_factors: PriorityFactors {
                sender_importance: draft.hints.sender_importance,
                urgency_signals,
                solo_responsibility: draft.hints.solo_responsibility,
                context_urgency: draft.hints.context_urgency,
            },
            actions: draft.actions,
        }
    }

    // ===== Getters =====

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> MentionStatus {
        self.status
    }

    /// Present iff the status is `Archived`.
    pub fn archive_until(&self) -> Option<DateTime<Utc>> {
        self.archive_until
    }

    pub fn detected_context(&self) -> DetectedContext {
        self.detected_context
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn priority_factors(&self) -> &PriorityFactors {
        &self.priority_factors
    }

    pub fn is_unread(&self) -> bool {
        self.status == MentionStatus::Unread
    }

    pub fn priority_explanations(&self) -> Vec<String> {
        self.priority_factors.explanations(&self.sender)
    }

    // ===== Triage (copy-on-write) =====

    /// Copy with a new non-archived status. Leaving `Archived` drops the
    /// archive date.
    pub(crate) fn with_status(&self, status: MentionStatus) -> Self {
        debug_assert!(status != MentionStatus::Archived);
        Self {
            status,
            archive_until: None,
            ..self.clone()
        }
    }

    /// Copy archived until the given time.
    pub(crate) fn archived_until(&self, until: DateTime<Utc>) -> Self {
        Self {
            status: MentionStatus::Archived,
            archive_until: Some(until),
            ..self.clone()
        }
    }
}

impl From<MentionDraft> for MentionRecord {
    fn from(draft: MentionDraft) -> Self {
        Self::ingest(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_test_draft(title: &str, content: &str, priority: Priority) -> MentionDraft {
        MentionDraft::new(
            MentionKind::Mention,
            MentionSource::Chat,
            Sender::named("Sarah Chen").with_role("Tech Lead"),
            Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
            title,
            content,
            priority,
        )
    }

    #[test]
    fn test_ingest_derives_classification() {
        let record = MentionRecord::ingest(
            make_test_draft(
                "Urgent: Database migration needs review",
                "@john can you review the database migration script? We need to deploy this by EOD.",
                Priority::High,
            )
            .with_id("slack-1"),
        );

        assert_eq!(record.id, "slack-1");
        assert_eq!(record.detected_context(), DetectedContext::ActionNeeded);
        assert_eq!(record.tag_type(), TagType::ActionNeeded);
        assert_eq!(
            record.priority_factors().urgency_signals,
            vec!["urgent".to_string(), "by eod".to_string()]
        );
    }

    #[test]
    fn test_ingest_generates_missing_id() {
        let a = MentionRecord::ingest(make_test_draft("hello", "", Priority::Low));
        let b = MentionRecord::ingest(make_test_draft("hello", "", Priority::Low).with_id("  "));
        assert!(!a.id.is_empty());
        assert!(!b.id.trim().is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_ingest_normalizes_archive_date() {
        let until = Utc.with_ymd_and_hms(2025, 3, 11, 9, 0, 0).unwrap();

        let mut draft = make_test_draft("note", "", Priority::Low).with_status(MentionStatus::Done);
        draft.archive_until = Some(until);
        let record = MentionRecord::ingest(draft);
        assert_eq!(record.status(), MentionStatus::Done);
        assert!(record.archive_until().is_none());

        let draft = make_test_draft("note", "", Priority::Low).with_status(MentionStatus::Archived);
        let record = MentionRecord::ingest(draft);
        assert_eq!(record.status(), MentionStatus::Read);
        assert!(record.archive_until().is_none());

        let mut draft = make_test_draft("note", "", Priority::Low).with_status(MentionStatus::Archived);
        draft.archive_until = Some(until);
        let record = MentionRecord::ingest(draft);
        assert_eq!(record.status(), MentionStatus::Archived);
        assert_eq!(record.archive_until(), Some(until));
    }

    #[test]
    fn test_with_status_clears_archive_date() {
        let record = MentionRecord::ingest(make_test_draft("note", "", Priority::Low));
        let until = record.timestamp + Duration::days(1);

        let archived = record.archived_until(until);
        assert_eq!(archived.status(), MentionStatus::Archived);
        assert_eq!(archived.archive_until(), Some(until));

        let revived = archived.with_status(MentionStatus::Unread);
        assert_eq!(revived.status(), MentionStatus::Unread);
        assert!(revived.archive_until().is_none());
        // Everything else is untouched
        assert_eq!(revived.title(), record.title());
        assert_eq!(revived.tag_type(), record.tag_type());
    }

    #[test]
    fn test_deserialize_recomputes_derived_fields() {
        let json = r#"{
            "id": "email-2",
            "type": "mention",
            "source": "email",
            "sender": {"name": "David Kim", "role": "Security Lead"},
            "timestamp": "2025-03-10T09:00:00Z",
            "title": "FYI: New security policy update",
            "content": "just wanted to let you know about the new policy",
            "priority": "high",
            "status": "read",
            "tagType": "resolved",
            "detectedContext": "resolved",
            "priorityFactors": {"urgencySignals": ["urgent"], "soloResponsibility": true}
        }"#;
        let record: MentionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.detected_context(), DetectedContext::Information);
        assert_eq!(record.tag_type(), TagType::CriticalInfo);
        assert!(record.priority_factors().urgency_signals.is_empty());
        assert!(record.priority_factors().solo_responsibility);
        assert_eq!(record.status(), MentionStatus::Read);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let record = MentionRecord::ingest(
            make_test_draft("Please check", "", Priority::High).in_thread("slack-1"),
        );
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "mention");
        assert_eq!(value["source"], "chat");
        assert_eq!(value["threadId"], "slack-1");
        assert_eq!(value["isThreadResponse"], true);
        assert_eq!(value["tagType"], "action_needed");
        assert_eq!(value["priorityFactors"]["urgencySignals"][0], "please check");
        assert!(value.get("archiveUntil").is_none());
    }

    #[test]
    fn test_explanations() {
        let sender = Sender::named("Lisa Wang").with_role("CEO");
        let factors = PriorityFactors {
            sender_importance: true,
            urgency_signals: vec!["urgent".into(), "asap".into(), "by eod".into()],
            solo_responsibility: true,
            context_urgency: false,
        };
        assert_eq!(
            factors.explanations(&sender),
            vec![
                "Message from CEO".to_string(),
                "Urgency signals: urgent, asap".to_string(),
                "You are solely responsible".to_string(),
            ]
        );

        let anonymous = Sender::named("Someone");
        let vip = PriorityFactors {
            sender_importance: true,
            ..Default::default()
        };
        assert_eq!(vip.explanations(&anonymous), vec!["Message from VIP".to_string()]);

        // Context urgency alone is not enough to count as a factor
        let only_context = PriorityFactors {
            context_urgency: true,
            ..Default::default()
        };
        assert_eq!(
            only_context.explanations(&anonymous),
            vec!["No specific priority factors detected".to_string()]
        );
    }

    #[test]
    fn test_parse_source_aliases() {
        assert_eq!("chat".parse::<MentionSource>().unwrap(), MentionSource::Chat);
        assert_eq!("Slack".parse::<MentionSource>().unwrap(), MentionSource::Chat);
        assert_eq!("jira".parse::<MentionSource>().unwrap(), MentionSource::IssueTracker);
        assert_eq!(
            "issue-tracker".parse::<MentionSource>().unwrap(),
            MentionSource::IssueTracker
        );
        assert!("pager".parse::<MentionSource>().is_err());
        assert_eq!(
            "thread-response".parse::<MentionKind>().unwrap(),
            MentionKind::ThreadResponse
        );
    }
}
