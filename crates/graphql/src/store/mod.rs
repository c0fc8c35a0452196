//! Record types and the repository traits resolvers read and write through.
//!
//! The in-memory implementations in [`memory`] are what the server runs with;
//! a persistent backend only has to implement the three traits.

pub mod memory;
mod seed;

use std::sync::Arc;

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    serde::Deserialize,
};

use crate::{
    resolve::{MessageKind, resolve_message_kind},
    scalars::{Date, DateError},
};

pub use memory::{InMemoryAuthors, InMemoryMessages, InMemoryPosts};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Couldn't find post with id {0}")]
    PostNotFound(i32),
}

/// Why an untagged message document could not become a [`MessageRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("document matches neither Notice nor Remind")]
    Unresolved,

    #[error("{field}: {source}")]
    InvalidTime {
        field: &'static str,
        #[source]
        source: DateError,
    },

    #[error("malformed message document: {0}")]
    Malformed(String),
}

// ── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub state: Option<String>,
}

/// Author fields supplied by a caller; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAuthor {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub id: i32,
    pub author_id: i32,
    pub title: Option<String>,
    pub votes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeRecord {
    pub id: i32,
    pub content: Option<String>,
    pub notice_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemindRecord {
    pub id: i32,
    pub content: Option<String>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRecord {
    Notice(NoticeRecord),
    Remind(RemindRecord),
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    content: Option<String>,
}

impl MessageRecord {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Notice(_) => MessageKind::Notice,
            Self::Remind(_) => MessageKind::Remind,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::Notice(n) => n.id,
            Self::Remind(r) => r.id,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Notice(n) => n.content.as_deref(),
            Self::Remind(r) => r.content.as_deref(),
        }
    }

    /// `noticeTime` for notices, `endTime` for reminds.
    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Self::Notice(n) => n.notice_time,
            Self::Remind(r) => r.end_time,
        }
    }

    pub(crate) fn with_id(mut self, id: i32) -> Self {
        match &mut self {
            Self::Notice(n) => n.id = id,
            Self::Remind(r) => r.id = id,
        }
        self
    }

    /// Build a record from an untagged document such as
    /// `{"content": "这是 notice", "noticeTime": 1524710641}`.
    ///
    /// The variant comes from [`resolve_message_kind`]; only the winning
    /// variant's time field is read, so a Notice never picks up an `endTime`.
    /// Any `id` in the document is ignored.
    pub fn from_document(document: &serde_json::Value) -> Result<Self, DocumentError> {
        let kind = resolve_message_kind(document).ok_or(DocumentError::Unresolved)?;
        let raw = RawMessage::deserialize(document)
            .map_err(|e| DocumentError::Malformed(e.to_string()))?;

        let field = kind.time_field();
        let time = document
            .get(field)
            .ok_or(DocumentError::Unresolved)
            .and_then(|v| {
                Date::coerce_json(v).map_err(|source| DocumentError::InvalidTime { field, source })
            })?
            .instant();

        Ok(match kind {
            MessageKind::Notice => Self::Notice(NoticeRecord {
                id: 0,
                content: raw.content,
                notice_time: time,
            }),
            MessageKind::Remind => Self::Remind(RemindRecord {
                id: 0,
                content: raw.content,
                end_time: time,
            }),
        })
    }
}

// ── Repositories ────────────────────────────────────────────────────────────

#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn list(&self) -> Vec<AuthorRecord>;
    async fn get(&self, id: i32) -> Option<AuthorRecord>;
    /// Store a new author under the id after the highest one stored.
    async fn insert(&self, author: NewAuthor) -> AuthorRecord;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list(&self) -> Vec<PostRecord>;
    async fn get(&self, id: i32) -> Option<PostRecord>;
    async fn by_author(&self, author_id: i32) -> Vec<PostRecord>;
    async fn upvote(&self, id: i32) -> Result<PostRecord, StoreError>;
    async fn clear_votes(&self, id: i32) -> Result<PostRecord, StoreError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// All messages, notices first, each kind in id order.
    async fn list(&self) -> Vec<MessageRecord>;
    async fn of_kind(&self, kind: MessageKind) -> Vec<MessageRecord>;
    async fn first(&self, kind: MessageKind) -> Option<MessageRecord>;
    /// Messages whose time field lies in `[from, to]`; an open bound is
    /// unbounded.
    async fn between(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<MessageRecord>;
    /// Store a message under the next free id of its kind.
    async fn insert(&self, message: MessageRecord) -> MessageRecord;
}

/// Repository bundle handed to the schema as context data.
#[derive(Clone)]
pub struct Stores {
    pub authors: Arc<dyn AuthorRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub messages: Arc<dyn MessageRepository>,
}

impl Stores {
    /// In-memory stores holding the sample authors, posts, notices and reminds.
    pub fn seeded() -> Self {
        Self {
            authors: Arc::new(InMemoryAuthors::new(seed::authors())),
            posts: Arc::new(InMemoryPosts::new(seed::posts())),
            messages: Arc::new(InMemoryMessages::new(seed::messages())),
        }
    }

    pub fn empty() -> Self {
        Self {
            authors: Arc::new(InMemoryAuthors::default()),
            posts: Arc::new(InMemoryPosts::default()),
            messages: Arc::new(InMemoryMessages::default()),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn notice_document_becomes_notice_record() {
        let record =
            MessageRecord::from_document(&json!({"content": "这是 notice", "noticeTime": 1524710641}))
                .unwrap();
        let MessageRecord::Notice(notice) = record else {
            panic!("expected notice, got {record:?}");
        };
        assert_eq!(notice.content.as_deref(), Some("这是 notice"));
        assert_eq!(notice.notice_time.timestamp_millis(), 1_524_710_641);
    }

    #[test]
    fn remind_document_accepts_iso_time() {
        let record =
            MessageRecord::from_document(&json!({"endTime": "2018-04-26T02:44:01Z"})).unwrap();
        assert_eq!(record.kind(), MessageKind::Remind);
        assert_eq!(record.content(), None);
        assert_eq!(record.time().to_rfc3339(), "2018-04-26T02:44:01+00:00");
    }

    #[test]
    fn document_with_both_times_keeps_only_notice_time() {
        let record =
            MessageRecord::from_document(&json!({"noticeTime": 1, "endTime": 2})).unwrap();
        assert_eq!(record.kind(), MessageKind::Notice);
        assert_eq!(record.time().timestamp_millis(), 1);
    }

    #[test]
    fn unresolvable_document_is_reported() {
        assert_eq!(
            MessageRecord::from_document(&json!({"content": "?"})),
            Err(DocumentError::Unresolved)
        );
    }

    #[test]
    fn bad_time_or_content_is_reported() {
        let err = MessageRecord::from_document(&json!({"noticeTime": "yesterday"})).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::InvalidTime {
                field: "noticeTime",
                ..
            }
        ));

        let err =
            MessageRecord::from_document(&json!({"content": 5, "endTime": 1})).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }
}
