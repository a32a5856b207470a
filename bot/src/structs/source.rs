use super::Emoji;

use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::model::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
    pub bot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionTally {
    pub emoji: Emoji,
    pub count: u64,
    /// the bot itself holds this reaction
    pub me: bool,
}

impl ReactionTally {
    /// Count without the bot's own reaction
    #[inline]
    pub const fn count_excluding_self(&self) -> u64 {
        self.count.saturating_sub(self.me as u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedSummary {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Snapshot of a message as the board sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub id: MessageId,
    pub channel: ChannelId,
    pub guild: Option<GuildId>,
    pub author: Author,
    pub content: String,
    pub embed: Option<EmbedSummary>,
    pub embed_count: usize,
    pub images: Vec<String>,
    pub reactions: Vec<ReactionTally>,
    /// name of the slash command this message answers
    pub interaction: Option<String>,
    pub link: String,
    pub timestamp: Option<Timestamp>,
}

impl SourceMessage {
    pub fn tally(&self, key: &str) -> Option<&ReactionTally> {
        self.reactions.iter().find(|tally| tally.emoji.matches(key))
    }

    /// Reactions with `key` not counting the bot's own. A reaction that
    /// isn't on the message counts as 0.
    pub fn count_excluding_self(&self, key: &str) -> u64 {
        self.tally(key)
            .map_or(0, ReactionTally::count_excluding_self)
    }
}

impl From<&Message> for SourceMessage {
    fn from(msg: &Message) -> SourceMessage {
        let name = msg
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .unwrap_or_else(|| msg.author.name.clone());

        let mut images: Vec<String> = msg
            .attachments
            .iter()
            .filter(|attachment| {
                attachment
                    .content_type
                    .as_ref()
                    .map_or(false, |t| t.starts_with("image"))
            })
            .map(|attachment| attachment.url.clone())
            .collect();
        for embed in &msg.embeds {
            if let Some(image) = &embed.image {
                images.push(image.url.clone());
            } else if let Some(thumbnail) = &embed.thumbnail {
                images.push(thumbnail.url.clone());
            }
        }

        SourceMessage {
            id: msg.id,
            channel: msg.channel_id,
            guild: msg.guild_id,
            author: Author {
                id: msg.author.id,
                name,
                avatar: msg.author.face(),
                bot: msg.author.bot,
            },
            content: msg.content.clone(),
            embed: msg.embeds.first().map(|embed| EmbedSummary {
                title: embed.title.clone(),
                description: embed.description.clone(),
            }),
            embed_count: msg.embeds.len(),
            images,
            reactions: msg
                .reactions
                .iter()
                .map(|reaction| ReactionTally {
                    emoji: Emoji::from(&reaction.reaction_type),
                    count: reaction.count,
                    me: reaction.me,
                })
                .collect(),
            interaction: msg.interaction.as_ref().map(|i| i.name.clone()),
            link: msg.link(),
            timestamp: Some(msg.timestamp),
        }
    }
}

/// The user behind a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub bot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub message: SourceMessage,
    pub emoji: Emoji,
    pub user: Actor,
}
