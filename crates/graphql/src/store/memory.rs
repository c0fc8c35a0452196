//! In-memory repositories keyed by record id.

use std::collections::BTreeMap;

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    tokio::sync::RwLock,
    tracing::debug,
};

use crate::{
    resolve::MessageKind,
    store::{
        AuthorRecord, AuthorRepository, MessageRecord, MessageRepository, NewAuthor, PostRecord,
        PostRepository, StoreError,
    },
};

#[derive(Default)]
pub struct InMemoryAuthors {
    rows: RwLock<BTreeMap<i32, AuthorRecord>>,
}

impl InMemoryAuthors {
    pub fn new(authors: impl IntoIterator<Item = AuthorRecord>) -> Self {
        Self {
            rows: RwLock::new(authors.into_iter().map(|a| (a.id, a)).collect()),
        }
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthors {
    async fn list(&self) -> Vec<AuthorRecord> {
        self.rows.read().await.values().cloned().collect()
    }

    async fn get(&self, id: i32) -> Option<AuthorRecord> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn insert(&self, author: NewAuthor) -> AuthorRecord {
        let mut rows = self.rows.write().await;
        let id = rows
            .last_key_value()
            .map_or(1, |(last, _)| last.saturating_add(1));
        let record = AuthorRecord {
            id,
            first_name: author.first_name,
            last_name: author.last_name,
            state: author.state,
        };
        rows.insert(id, record.clone());
        debug!(id, "author added");
        record
    }
}

#[derive(Default)]
pub struct InMemoryPosts {
    rows: RwLock<BTreeMap<i32, PostRecord>>,
}

impl InMemoryPosts {
    pub fn new(posts: impl IntoIterator<Item = PostRecord>) -> Self {
        Self {
            rows: RwLock::new(posts.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    async fn update(
        &self,
        id: i32,
        apply: impl FnOnce(&mut PostRecord) + Send,
    ) -> Result<PostRecord, StoreError> {
        let mut rows = self.rows.write().await;
        let post = rows.get_mut(&id).ok_or(StoreError::PostNotFound(id))?;
        apply(post);
        Ok(post.clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn list(&self) -> Vec<PostRecord> {
        self.rows.read().await.values().cloned().collect()
    }

    async fn get(&self, id: i32) -> Option<PostRecord> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn by_author(&self, author_id: i32) -> Vec<PostRecord> {
        self.rows
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect()
    }

    async fn upvote(&self, id: i32) -> Result<PostRecord, StoreError> {
        let post = self
            .update(id, |p| p.votes = p.votes.saturating_add(1))
            .await?;
        debug!(id, votes = post.votes, "post upvoted");
        Ok(post)
    }

    async fn clear_votes(&self, id: i32) -> Result<PostRecord, StoreError> {
        let post = self.update(id, |p| p.votes = 0).await?;
        debug!(id, "post votes cleared");
        Ok(post)
    }
}

/// Messages keyed by `(kind, id)`, so iteration yields notices before reminds.
#[derive(Default)]
pub struct InMemoryMessages {
    rows: RwLock<BTreeMap<(MessageKind, i32), MessageRecord>>,
}

impl InMemoryMessages {
    pub fn new(messages: impl IntoIterator<Item = MessageRecord>) -> Self {
        Self {
            rows: RwLock::new(
                messages
                    .into_iter()
                    .map(|m| ((m.kind(), m.id()), m))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessages {
    async fn list(&self) -> Vec<MessageRecord> {
        self.rows.read().await.values().cloned().collect()
    }

    async fn of_kind(&self, kind: MessageKind) -> Vec<MessageRecord> {
        self.rows
            .read()
            .await
            .range((kind, i32::MIN)..=(kind, i32::MAX))
            .map(|(_, m)| m.clone())
            .collect()
    }

    async fn first(&self, kind: MessageKind) -> Option<MessageRecord> {
        self.rows
            .read()
            .await
            .range((kind, i32::MIN)..=(kind, i32::MAX))
            .next()
            .map(|(_, m)| m.clone())
    }

    async fn between(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<MessageRecord> {
        self.rows
            .read()
            .await
            .values()
            .filter(|m| {
                let t = m.time();
                from.is_none_or(|from| t >= from) && to.is_none_or(|to| t <= to)
            })
            .cloned()
            .collect()
    }

    async fn insert(&self, message: MessageRecord) -> MessageRecord {
        let mut rows = self.rows.write().await;
        let kind = message.kind();
        let id = rows
            .range((kind, i32::MIN)..=(kind, i32::MAX))
            .next_back()
            .map_or(1, |((_, last), _)| last.saturating_add(1));
        let record = message.with_id(id);
        rows.insert((kind, id), record.clone());
        debug!(%kind, id, "message added");
        record
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::store::{NoticeRecord, RemindRecord, Stores},
    };

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn notice(id: i32, millis: i64) -> MessageRecord {
        MessageRecord::Notice(NoticeRecord {
            id,
            content: Some(format!("notice {id}")),
            notice_time: at(millis),
        })
    }

    fn remind(id: i32, millis: i64) -> MessageRecord {
        MessageRecord::Remind(RemindRecord {
            id,
            content: Some(format!("remind {id}")),
            end_time: at(millis),
        })
    }

    #[tokio::test]
    async fn author_ids_follow_highest_id() {
        let stores = Stores::seeded();
        let added = stores
            .authors
            .insert(NewAuthor {
                first_name: Some("Ada".into()),
                ..Default::default()
            })
            .await;
        assert_eq!(added.id, 4);
        assert_eq!(stores.authors.get(4).await, Some(added));
        assert_eq!(stores.authors.list().await.len(), 4);
    }

    #[tokio::test]
    async fn author_insert_skips_past_gaps() {
        let author = |id| AuthorRecord {
            id,
            first_name: Some(format!("author {id}")),
            last_name: None,
            state: None,
        };
        let store = InMemoryAuthors::new([author(2), author(3)]);
        let added = store.insert(NewAuthor::default()).await;
        assert_eq!(added.id, 4);
        assert_eq!(store.get(3).await, Some(author(3)));
        assert_eq!(store.list().await.len(), 3);

        let first = InMemoryAuthors::default().insert(NewAuthor::default()).await;
        assert_eq!(first.id, 1);
    }

    #[tokio::test]
    async fn votes_change_and_missing_posts_error() {
        let posts = Stores::seeded().posts;
        assert_eq!(posts.upvote(4).await.unwrap().votes, 8);
        assert_eq!(posts.clear_votes(4).await.unwrap().votes, 0);
        assert_eq!(posts.get(4).await.unwrap().votes, 0);

        let err = posts.upvote(42).await.unwrap_err();
        assert_eq!(err, StoreError::PostNotFound(42));
        assert_eq!(err.to_string(), "Couldn't find post with id 42");
        assert!(posts.clear_votes(42).await.is_err());
    }

    #[tokio::test]
    async fn posts_by_author() {
        let posts = Stores::seeded().posts;
        let ids: Vec<_> = posts.by_author(2).await.iter().map(|p| p.id).collect();
        assert_eq!(ids, [2, 3]);
        assert!(posts.by_author(99).await.is_empty());
    }

    #[tokio::test]
    async fn messages_list_notices_first() {
        let store = InMemoryMessages::new([remind(1, 10), notice(2, 30), notice(1, 20)]);
        let order: Vec<_> = store
            .list()
            .await
            .iter()
            .map(|m| (m.kind(), m.id()))
            .collect();
        assert_eq!(order, [
            (MessageKind::Notice, 1),
            (MessageKind::Notice, 2),
            (MessageKind::Remind, 1),
        ]);
        assert_eq!(store.first(MessageKind::Notice).await, Some(notice(1, 20)));
        assert_eq!(store.of_kind(MessageKind::Remind).await, [remind(1, 10)]);
    }

    #[tokio::test]
    async fn between_is_inclusive_on_both_ends() {
        let store = InMemoryMessages::new([notice(1, 10), notice(2, 20), remind(1, 30)]);
        let hits = store.between(Some(at(10)), Some(at(30))).await;
        assert_eq!(hits.len(), 3);

        let hits = store.between(Some(at(11)), None).await;
        assert_eq!(hits, [notice(2, 20), remind(1, 30)]);

        let hits = store.between(None, Some(at(19))).await;
        assert_eq!(hits, [notice(1, 10)]);
    }

    #[tokio::test]
    async fn insert_assigns_next_id_per_kind() {
        let store = InMemoryMessages::new([notice(1, 0), notice(5, 0)]);
        let n = store.insert(notice(0, 1)).await;
        let r = store.insert(remind(77, 1)).await;
        assert_eq!((n.kind(), n.id()), (MessageKind::Notice, 6));
        assert_eq!((r.kind(), r.id()), (MessageKind::Remind, 1));
        assert!(Stores::empty().messages.list().await.is_empty());
    }
}
