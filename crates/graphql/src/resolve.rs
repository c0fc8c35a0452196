//! Structural type resolution for untagged message documents.
//!
//! Messages built inside this crate are always a tagged [`MessageRecord`].
//! Documents coming from producers that do not emit a tag (JSON imports) are
//! classified here by the field only one variant can carry. Both the
//! `Message` interface and the `MessageResult` union resolve through
//! [`resolve_message_kind`].
//!
//! [`MessageRecord`]: crate::store::MessageRecord

use {serde_json::Value, tracing::trace};

/// Concrete variants of the `Message` interface / `MessageResult` union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageKind {
    Notice,
    Remind,
}

impl MessageKind {
    /// Fields that identify a variant, in resolution priority order.
    pub const DISCRIMINANTS: [(&'static str, MessageKind); 2] = [
        ("noticeTime", MessageKind::Notice),
        ("endTime", MessageKind::Remind),
    ];

    /// GraphQL object type name of the variant.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Notice => "Notice",
            Self::Remind => "Remind",
        }
    }

    /// Name of the time field that only this variant carries.
    pub fn time_field(self) -> &'static str {
        match self {
            Self::Notice => "noticeTime",
            Self::Remind => "endTime",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Pick the concrete variant of an untagged message document.
///
/// A field counts as carried when it is present and not `null`. `noticeTime`
/// is checked before `endTime`, so a document carrying both is a `Notice`.
/// Returns `None` when the document matches no variant (including non-object
/// documents).
pub fn resolve_message_kind(document: &Value) -> Option<MessageKind> {
    let object = document.as_object()?;
    let kind = MessageKind::DISCRIMINANTS
        .iter()
        .find(|(field, _)| object.get(*field).is_some_and(|v| !v.is_null()))
        .map(|(_, kind)| *kind);
    trace!(?kind, %document, "resolved message document");
    kind
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, serde_json::json};

    #[rstest]
    #[case(json!({ "content": "这是 notice", "noticeTime": 1524710641 }))]
    #[case(json!({ "noticeTime": "2018-04-26" }))]
    #[case(json!({ "noticeTime": 0 }))]
    #[case(json!({ "noticeTime": 1, "endTime": null }))]
    fn notice_time_resolves_notice(#[case] doc: Value) {
        assert_eq!(resolve_message_kind(&doc), Some(MessageKind::Notice));
    }

    #[rstest]
    #[case(json!({ "content": "这是 remind", "endTime": 1524710641 }))]
    #[case(json!({ "endTime": "2018-04-26T00:00:00Z" }))]
    #[case(json!({ "noticeTime": null, "endTime": 5 }))]
    fn end_time_resolves_remind(#[case] doc: Value) {
        assert_eq!(resolve_message_kind(&doc), Some(MessageKind::Remind));
    }

    #[rstest]
    #[case(json!({ "content": "orphan" }))]
    #[case(json!({}))]
    #[case(json!({ "noticeTime": null, "endTime": null }))]
    #[case(json!("noticeTime"))]
    #[case(json!([{ "noticeTime": 1 }]))]
    #[case(Value::Null)]
    fn unmatched_documents_resolve_to_none(#[case] doc: Value) {
        assert_eq!(resolve_message_kind(&doc), None);
    }

    #[test]
    fn notice_wins_when_both_fields_are_present() {
        let doc = json!({ "content": "both", "endTime": 2, "noticeTime": 1 });
        assert_eq!(resolve_message_kind(&doc), Some(MessageKind::Notice));
    }

    #[test]
    fn type_names_match_schema() {
        assert_eq!(MessageKind::Notice.type_name(), "Notice");
        assert_eq!(MessageKind::Remind.to_string(), "Remind");
        assert_eq!(MessageKind::Remind.time_field(), "endTime");
    }
}
