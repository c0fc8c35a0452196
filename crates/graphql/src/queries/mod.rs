//! GraphQL query resolvers.

use async_graphql::{Context, Object, Result};

use crate::{
    context::GqlContext,
    error::gql_err,
    resolve::MessageKind,
    scalars::Date,
    store::MessageRecord,
    types::{Author, Message, MessageResult, Notice, Post, Remind},
};

/// Root query type.
#[derive(Default)]
pub struct QueryRoot;

/// `searchInterface` / `searchUnion` return the first notice for `"notice"`
/// and the first remind for anything else.
async fn search(ctx: &Context<'_>, text: &str) -> Result<MessageRecord> {
    let c = GqlContext::from_ctx(ctx)?;
    let kind = if text == "notice" {
        MessageKind::Notice
    } else {
        MessageKind::Remind
    };
    c.stores
        .messages
        .first(kind)
        .await
        .ok_or_else(|| gql_err(format!("no {kind} to return")))
}

#[Object(name = "Query")]
impl QueryRoot {
    // ── Authors & posts ─────────────────────────────────────────────────────

    /// All posts
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let c = GqlContext::from_ctx(ctx)?;
        Ok(c.stores.posts.list().await.into_iter().map(Post).collect())
    }

    /// All authors
    async fn authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let c = GqlContext::from_ctx(ctx)?;
        Ok(c.stores.authors.list().await.into_iter().map(Author).collect())
    }

    async fn author(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Author ID")] id: i32,
    ) -> Result<Option<Author>> {
        let c = GqlContext::from_ctx(ctx)?;
        Ok(c.stores.authors.get(id).await.map(Author))
    }

    // ── Messages ────────────────────────────────────────────────────────────

    async fn notices(&self, ctx: &Context<'_>) -> Result<Vec<Notice>> {
        let c = GqlContext::from_ctx(ctx)?;
        let notices = c.stores.messages.of_kind(MessageKind::Notice).await;
        Ok(notices
            .into_iter()
            .filter_map(|m| match m {
                MessageRecord::Notice(n) => Some(Notice::from_record(n, c.date_format)),
                MessageRecord::Remind(_) => None,
            })
            .collect())
    }

    async fn reminds(&self, ctx: &Context<'_>) -> Result<Vec<Remind>> {
        let c = GqlContext::from_ctx(ctx)?;
        let reminds = c.stores.messages.of_kind(MessageKind::Remind).await;
        Ok(reminds
            .into_iter()
            .filter_map(|m| match m {
                MessageRecord::Remind(r) => Some(Remind::from_record(r, c.date_format)),
                MessageRecord::Notice(_) => None,
            })
            .collect())
    }

    /// Every notice and remind.
    async fn messages(&self, ctx: &Context<'_>) -> Result<Vec<Message>> {
        let c = GqlContext::from_ctx(ctx)?;
        let messages = c.stores.messages.list().await;
        Ok(messages
            .into_iter()
            .map(|m| Message::from_record(m, c.date_format))
            .collect())
    }

    /// Messages whose time lies within `[from, to]`. Either bound may be
    /// omitted.
    async fn messages_between(
        &self,
        ctx: &Context<'_>,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<Message>> {
        let c = GqlContext::from_ctx(ctx)?;
        let messages = c
            .stores
            .messages
            .between(from.map(|d| d.instant()), to.map(|d| d.instant()))
            .await;
        Ok(messages
            .into_iter()
            .map(|m| Message::from_record(m, c.date_format))
            .collect())
    }

    // ── Polymorphic search ──────────────────────────────────────────────────

    async fn search_interface(&self, ctx: &Context<'_>, text: String) -> Result<Message> {
        let record = search(ctx, &text).await?;
        let c = GqlContext::from_ctx(ctx)?;
        Ok(Message::from_record(record, c.date_format))
    }

    async fn search_union(&self, ctx: &Context<'_>, text: String) -> Result<MessageResult> {
        let record = search(ctx, &text).await?;
        let c = GqlContext::from_ctx(ctx)?;
        Ok(MessageResult::from_record(record, c.date_format))
    }
}
