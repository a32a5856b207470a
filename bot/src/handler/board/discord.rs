use super::BoardPlatform;
use crate::errors::Result;
use crate::structs::{BoardMessage, Emoji};

use serenity::async_trait;
use serenity::model::id::{ChannelId, MessageId, UserId};
use serenity::prelude::Context;

/// [`BoardPlatform`] talking to discord through the event's context
pub struct DiscordBoard<'a> {
    ctx: &'a Context,
}

impl<'a> DiscordBoard<'a> {
    pub const fn new(ctx: &'a Context) -> DiscordBoard<'a> {
        DiscordBoard { ctx }
    }
}

#[async_trait]
impl BoardPlatform for DiscordBoard<'_> {
    async fn remove_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        user: UserId,
        emoji: &Emoji,
    ) -> Result<()> {
        channel
            .delete_reaction(&self.ctx.http, message, Some(user), emoji.reaction_type())
            .await?;
        Ok(())
    }

    async fn post(&self, channel: ChannelId, message: &BoardMessage) -> Result<MessageId> {
        let posted = channel
            .send_message(&self.ctx.http, |builder| {
                builder
                    .content(&message.content)
                    .embed(|embed| message.embed(embed))
            })
            .await?;
        Ok(posted.id)
    }

    async fn edit(&self, channel: ChannelId, message: MessageId, content: &str) -> Result<()> {
        channel
            .edit_message(&self.ctx.http, message, |builder| builder.content(content))
            .await?;
        Ok(())
    }
}
