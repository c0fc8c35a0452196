//! GraphQL mutation resolvers.

use async_graphql::{Context, Object, Result};

use crate::{
    context::GqlContext,
    error::{document_err, gql_err, store_err},
    scalars::Json,
    store::MessageRecord,
    types::{
        Author, AuthorInput, Message, MessageResult, Notice, NoticeInput, Post, Remind,
        RemindInput,
    },
};

/// Root mutation type.
#[derive(Default)]
pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    async fn add_author(&self, ctx: &Context<'_>, author: AuthorInput) -> Result<Option<Author>> {
        let c = GqlContext::from_ctx(ctx)?;
        Ok(Some(Author(c.stores.authors.insert(author.into()).await)))
    }

    async fn up_vote_post(&self, ctx: &Context<'_>, post_id: i32) -> Result<Option<Post>> {
        let c = GqlContext::from_ctx(ctx)?;
        let post = c.stores.posts.upvote(post_id).await.map_err(store_err)?;
        Ok(Some(Post(post)))
    }

    async fn clear_vote_post(&self, ctx: &Context<'_>, post_id: i32) -> Result<Option<Post>> {
        let c = GqlContext::from_ctx(ctx)?;
        let post = c.stores.posts.clear_votes(post_id).await.map_err(store_err)?;
        Ok(Some(Post(post)))
    }

    async fn add_notice(&self, ctx: &Context<'_>, notice: NoticeInput) -> Result<Option<Notice>> {
        let c = GqlContext::from_ctx(ctx)?;
        match c.stores.messages.insert(notice.into()).await {
            MessageRecord::Notice(n) => Ok(Some(Notice::from_record(n, c.date_format))),
            MessageRecord::Remind(_) => Err(gql_err("stored message changed kind")),
        }
    }

    async fn add_remind(&self, ctx: &Context<'_>, remind: RemindInput) -> Result<Option<Remind>> {
        let c = GqlContext::from_ctx(ctx)?;
        match c.stores.messages.insert(remind.into()).await {
            MessageRecord::Remind(r) => Ok(Some(Remind::from_record(r, c.date_format))),
            MessageRecord::Notice(_) => Err(gql_err("stored message changed kind")),
        }
    }

    /// Store an untagged message document. The variant is taken from the
    /// document's shape: `noticeTime` makes a Notice, `endTime` a Remind.
    async fn import_message(&self, ctx: &Context<'_>, document: Json) -> Result<Option<Message>> {
        let c = GqlContext::from_ctx(ctx)?;
        let message = Message::import(c.stores.messages.as_ref(), &document.0, c.date_format)
            .await
            .map_err(|e| document_err(e, "Message", "Mutation.importMessage"))?;
        Ok(Some(message))
    }

    /// Same as `importMessage`, typed as the `MessageResult` union.
    async fn import_message_result(
        &self,
        ctx: &Context<'_>,
        document: Json,
    ) -> Result<Option<MessageResult>> {
        let c = GqlContext::from_ctx(ctx)?;
        let result =
            MessageResult::import(c.stores.messages.as_ref(), &document.0, c.date_format)
                .await
                .map_err(|e| document_err(e, "MessageResult", "Mutation.importMessageResult"))?;
        Ok(Some(result))
    }
}
