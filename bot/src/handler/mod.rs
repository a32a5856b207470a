mod board;
mod commands;
mod suggestions;
mod xp;

use crate::config::Config;
use crate::errors::Result;
use crate::structs::{Actor, Emoji, ReactionEvent, SourceMessage};
use board::{Board, DiscordBoard, SqliteBoardStore};

use log::{debug, error, info};
use serenity::{
    async_trait,
    model::application::interaction::Interaction,
    model::channel::{Message, Reaction},
    model::gateway::Ready,
    prelude::*,
};
use std::sync::Arc;

pub struct Handler {
    config: Arc<Config>,
}

impl Handler {
    pub fn new(config: Arc<Config>) -> Handler {
        Handler { config }
    }

    fn store(&self) -> SqliteBoardStore {
        SqliteBoardStore {
            pings_by_default: self.config.pings_by_default,
        }
    }
}

fn log_error<T>(r: Result<T>, label: &str) -> Option<T> {
    match r {
        Ok(value) => Some(value),
        Err(why) => {
            error!("{label} failed with error: {why}");
            None
        }
    }
}

/// Reaction events only carry ids, the full message is fetched before
/// anything looks at it
async fn fetch_message(ctx: &Context, reaction: &Reaction) -> Result<SourceMessage> {
    let mut message = ctx
        .http
        .get_message(reaction.channel_id.0, reaction.message_id.0)
        .await?;
    // messages fetched over http don't know their guild
    message.guild_id = message.guild_id.or(reaction.guild_id);
    Ok(SourceMessage::from(&message))
}

async fn fetch_event(ctx: &Context, reaction: &Reaction) -> Result<ReactionEvent> {
    let message = fetch_message(ctx, reaction).await?;
    let user = reaction.user(ctx).await?;
    Ok(ReactionEvent {
        message,
        emoji: Emoji::from(&reaction.emoji),
        user: Actor {
            id: user.id,
            bot: user.bot,
        },
    })
}

#[async_trait]
impl EventHandler for Handler {
    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        let event = match log_error(fetch_event(&ctx, &reaction).await, "Resolve reaction") {
            Some(event) => event,
            None => return,
        };

        let store = self.store();
        let platform = DiscordBoard::new(&ctx);
        let board = Board::new(&self.config, &store, &platform, ctx.cache.current_user_id());
        if let Some(outcome) = log_error(board.reaction_added(&event).await, "Board reaction add")
        {
            debug!("reaction on {} resolved to {outcome:?}", event.message.id);
        }

        log_error(
            suggestions::refresh_tally(&self.config.suggestions, &event.message),
            "Suggestion tally",
        );
    }

    async fn reaction_remove(&self, ctx: Context, reaction: Reaction) {
        let message = match log_error(fetch_message(&ctx, &reaction).await, "Resolve reaction") {
            Some(message) => message,
            None => return,
        };
        let emoji = Emoji::from(&reaction.emoji);

        let store = self.store();
        let platform = DiscordBoard::new(&ctx);
        let board = Board::new(&self.config, &store, &platform, ctx.cache.current_user_id());
        if let Some(outcome) = log_error(
            board.reaction_removed(&message, &emoji).await,
            "Board reaction remove",
        ) {
            debug!("reaction removal on {} resolved to {outcome:?}", message.id);
        }

        log_error(
            suggestions::refresh_tally(&self.config.suggestions, &message),
            "Suggestion tally",
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // dont care about bot messages
        if msg.author.bot || msg.guild_id != Some(self.config.guild) {
            return;
        }

        log_error(xp::award(&ctx, &self.config, &msg).await, "XP award");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            log_error(
                commands::handle(&ctx, &command, &self.config).await,
                &format!("Command /{}", command.data.name),
            );
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        log_error(
            commands::register(&ctx, self.config.guild).await,
            "Command registration",
        );
    }
}
