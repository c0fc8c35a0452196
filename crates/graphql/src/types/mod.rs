//! GraphQL output and input types.
//!
//! Output types wrap the store records. `Author` and `Post` use `#[Object]`
//! because their relations are looked up through the repositories; the
//! message variants are plain `SimpleObject`s built from a record plus the
//! configured `Date` wire format.

use async_graphql::{Context, Enum, InputObject, Interface, Object, Result, SimpleObject, Union};
use quill_config::DateFormat;

use crate::{
    context::GqlContext,
    scalars::Date,
    store::{
        AuthorRecord, DocumentError, MessageRecord, MessageRepository, NewAuthor, NoticeRecord,
        PostRecord, RemindRecord,
    },
};

// ── Country ─────────────────────────────────────────────────────────────────

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Country {
    #[default]
    Cn,
    Eng,
    Jp,
    Uk,
    Ca,
}

impl Country {
    pub fn code(self) -> &'static str {
        match self {
            Self::Cn => "CN",
            Self::Eng => "ENG",
            Self::Jp => "JP",
            Self::Uk => "UK",
            Self::Ca => "CA",
        }
    }
}

// ── Authors & posts ─────────────────────────────────────────────────────────

pub struct Author(pub AuthorRecord);

#[Object]
impl Author {
    /// Sequence number
    async fn id(&self) -> i32 {
        self.0.id
    }

    async fn first_name(&self) -> Option<&str> {
        self.0.first_name.as_deref()
    }

    async fn last_name(&self) -> Option<&str> {
        self.0.last_name.as_deref()
    }

    /// The stored state, or the requested country code when none is stored.
    async fn state(
        &self,
        #[graphql(default_with = "Some(Country::Cn)")] state: Option<Country>,
    ) -> Option<String> {
        self.0
            .state
            .clone()
            .or_else(|| state.map(|c| c.code().to_string()))
    }

    /// The list of Posts by this author
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let c = GqlContext::from_ctx(ctx)?;
        let posts = c.stores.posts.by_author(self.0.id).await;
        Ok(posts.into_iter().map(Post).collect())
    }
}

pub struct Post(pub PostRecord);

#[Object]
impl Post {
    async fn id(&self) -> i32 {
        self.0.id
    }

    async fn title(&self) -> Option<&str> {
        self.0.title.as_deref()
    }

    async fn author(&self, ctx: &Context<'_>) -> Result<Option<Author>> {
        let c = GqlContext::from_ctx(ctx)?;
        Ok(c.stores.authors.get(self.0.author_id).await.map(Author))
    }

    async fn votes(&self) -> i32 {
        self.0.votes
    }
}

// ── Messages ────────────────────────────────────────────────────────────────

/// Notice object
#[derive(Debug, Clone, SimpleObject)]
pub struct Notice {
    /// Notice content
    pub content: Option<String>,
    /// Notice time
    pub notice_time: Option<Date>,
}

impl Notice {
    pub fn from_record(record: NoticeRecord, format: DateFormat) -> Self {
        Self {
            content: record.content,
            notice_time: Some(Date::new(record.notice_time).with_format(format)),
        }
    }
}

/// Remind object
#[derive(Debug, Clone, SimpleObject)]
pub struct Remind {
    pub content: Option<String>,
    pub end_time: Option<Date>,
}

impl Remind {
    pub fn from_record(record: RemindRecord, format: DateFormat) -> Self {
        Self {
            content: record.content,
            end_time: Some(Date::new(record.end_time).with_format(format)),
        }
    }
}

/// Message interface
#[derive(Debug, Clone, Interface)]
#[graphql(field(name = "content", ty = "&Option<String>"))]
pub enum Message {
    Notice(Notice),
    Remind(Remind),
}

impl Message {
    pub fn from_record(record: MessageRecord, format: DateFormat) -> Self {
        match record {
            MessageRecord::Notice(n) => Self::Notice(Notice::from_record(n, format)),
            MessageRecord::Remind(r) => Self::Remind(Remind::from_record(r, format)),
        }
    }

    /// Resolve an untagged document to its concrete variant, store it, and
    /// return the stored message.
    pub async fn import(
        messages: &dyn MessageRepository,
        document: &serde_json::Value,
        format: DateFormat,
    ) -> Result<Self, DocumentError> {
        let record = MessageRecord::from_document(document)?;
        Ok(Self::from_record(messages.insert(record).await, format))
    }
}

/// Union of Notice and Remind
#[derive(Debug, Clone, Union)]
pub enum MessageResult {
    Notice(Notice),
    Remind(Remind),
}

impl MessageResult {
    pub fn from_record(record: MessageRecord, format: DateFormat) -> Self {
        match record {
            MessageRecord::Notice(n) => Self::Notice(Notice::from_record(n, format)),
            MessageRecord::Remind(r) => Self::Remind(Remind::from_record(r, format)),
        }
    }

    /// Resolve an untagged document to its concrete variant, store it, and
    /// return the stored message.
    pub async fn import(
        messages: &dyn MessageRepository,
        document: &serde_json::Value,
        format: DateFormat,
    ) -> Result<Self, DocumentError> {
        let record = MessageRecord::from_document(document)?;
        Ok(Self::from_record(messages.insert(record).await, format))
    }
}

// ── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, InputObject)]
pub struct AuthorInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub state: Option<String>,
}

impl From<AuthorInput> for NewAuthor {
    fn from(input: AuthorInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            state: input.state,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct NoticeInput {
    pub content: Option<String>,
    pub notice_time: Date,
}

impl From<NoticeInput> for MessageRecord {
    fn from(input: NoticeInput) -> Self {
        Self::Notice(NoticeRecord {
            id: 0,
            content: input.content,
            notice_time: input.notice_time.instant(),
        })
    }
}

#[derive(Debug, InputObject)]
pub struct RemindInput {
    pub content: Option<String>,
    pub end_time: Date,
}

impl From<RemindInput> for MessageRecord {
    fn from(input: RemindInput) -> Self {
        Self::Remind(RemindRecord {
            id: 0,
            content: input.content,
            end_time: input.end_time.instant(),
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::store::InMemoryMessages, serde_json::json};

    #[tokio::test]
    async fn interface_and_union_sites_agree() {
        let store = InMemoryMessages::default();
        let docs = [
            json!({"content": "n", "noticeTime": 1}),
            json!({"content": "r", "endTime": 1}),
            json!({"noticeTime": 1, "endTime": 2}),
        ];
        for doc in &docs {
            let via_interface = Message::import(&store, doc, DateFormat::EpochMillis)
                .await
                .unwrap();
            let via_union = MessageResult::import(&store, doc, DateFormat::EpochMillis)
                .await
                .unwrap();
            let same = matches!(
                (&via_interface, &via_union),
                (Message::Notice(_), MessageResult::Notice(_))
                    | (Message::Remind(_), MessageResult::Remind(_))
            );
            assert!(same, "{doc}: {via_interface:?} vs {via_union:?}");
        }
        assert_eq!(store.list().await.len(), 6);
    }

    #[tokio::test]
    async fn neither_site_stores_an_untagged_orphan() {
        let store = InMemoryMessages::default();
        let doc = json!({"content": "orphan"});
        assert_eq!(
            Message::import(&store, &doc, DateFormat::EpochMillis)
                .await
                .unwrap_err(),
            DocumentError::Unresolved
        );
        assert_eq!(
            MessageResult::import(&store, &doc, DateFormat::EpochMillis)
                .await
                .unwrap_err(),
            DocumentError::Unresolved
        );
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn notice_never_carries_end_time() {
        let store = InMemoryMessages::default();
        let doc = json!({"content": "both", "noticeTime": 5, "endTime": 9});
        let Message::Notice(notice) = Message::import(&store, &doc, DateFormat::Iso8601)
            .await
            .unwrap()
        else {
            panic!("expected notice");
        };
        let time = notice.notice_time.unwrap();
        assert_eq!(time.timestamp_millis(), 5);
        assert_eq!(time.format(), DateFormat::Iso8601);
    }

    #[test]
    fn country_codes() {
        assert_eq!(Country::default().code(), "CN");
        assert_eq!(Country::Eng.code(), "ENG");
    }
}
