//! Reaction driven promotion of messages to the board channel.
//!
//! A message moves from unposted to posted once its board emoji count
//! (without the bot's own reaction) reaches the threshold. Posted messages are
//! updated on every later reaction, whatever the count, and are never taken
//! down from here.

mod discord;
mod store;

pub use discord::DiscordBoard;
pub use store::SqliteBoardStore;

use crate::config::Config;
use crate::errors::Result;
use crate::handler::suggestions::opposing_reactions;
use crate::structs::board::board_content;
use crate::structs::{BoardMessage, Emoji, ReactionEvent, SourceMessage};

use chrono::{DateTime, Duration, Utc};
use db::structs::{BoardEntry, BoardState};
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::model::id::{ChannelId, MessageId, UserId};

/// How long a claim without a board message holds off other promotions
pub const CLAIM_LEASE_SECS: i64 = 300;
const RECORD_ATTEMPTS: u64 = 3;
const RECORD_BACKOFF_MS: u64 = 50;

/// Claims taken before this are expired at `now`
pub fn lease_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(CLAIM_LEASE_SECS)
}

/// Persistent side of the board: the source to board post index and the
/// author preferences a post depends on
pub trait BoardStore: Send + Sync {
    fn lookup(&self, source: MessageId) -> Result<Option<BoardState>>;

    /// Atomically reserves the index row for `source` as of `now`. False if
    /// the row is posted or claimed at or after `stale_before`.
    fn claim(
        &self,
        source: &SourceMessage,
        count: u64,
        ping: bool,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool>;

    fn record(&self, source: MessageId, board_message: MessageId) -> Result<()>;

    fn release(&self, source: MessageId) -> Result<()>;

    /// Leaves `count` on a claimed row for its creator to pick up. False once
    /// the row has its board message.
    fn set_pending_count(&self, source: MessageId, count: u64) -> Result<bool>;

    fn set_count(&self, source: MessageId, count: u64) -> Result<()>;

    /// Whether `author` wants to be pinged when they make the board
    fn board_pings(&self, author: UserId) -> Result<bool>;
}

/// Platform calls the board makes
#[async_trait]
pub trait BoardPlatform: Send + Sync {
    async fn remove_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        user: UserId,
        emoji: &Emoji,
    ) -> Result<()>;

    async fn post(&self, channel: ChannelId, message: &BoardMessage) -> Result<MessageId>;

    async fn edit(&self, channel: ChannelId, message: MessageId, content: &str) -> Result<()>;
}

/// What the observer decided to do with a reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    /// a suggestion vote, the listed opposing reactions get removed
    Vote(Vec<Emoji>),
    Ignore,
    RemoveReaction,
    Promote,
}

/// What the resolver decided to do with a promotable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Create,
    Update(BoardEntry),
    /// another event is creating the post right now
    Pending,
    BelowThreshold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    VotesCleared(usize),
    ReactionRemoved,
    Pending,
    BelowThreshold(u64),
    /// lost the claim race against a concurrent promotion
    AlreadyClaimed,
    Created { board_message: MessageId, count: u64 },
    Updated(u64),
    Unchanged(u64),
}

pub fn screen(config: &Config, bot: UserId, event: &ReactionEvent) -> Screening {
    let message = &event.message;
    let user = event.user;

    if message.channel == config.suggestions.channel && user.id != bot {
        if let Some(opposing) = opposing_reactions(&config.suggestions.groups, message, &event.emoji)
        {
            return Screening::Vote(opposing);
        }
    }

    if message.guild != Some(config.guild)
        || !event.emoji.matches(&config.board.emoji)
        || user.id == bot
    {
        return Screening::Ignore;
    }

    let bot_reacted = user.bot;
    let self_boost = config.board.suppress_self_boost && user.id == message.author.id;
    let board_post = message.channel == config.board.channel && message.author.id == bot;
    let explore_response = message.interaction.as_deref()
        == Some(config.board.explore_command.as_str())
        && message.embed_count > 0;

    if bot_reacted || self_boost || board_post || explore_response {
        Screening::RemoveReaction
    } else {
        Screening::Promote
    }
}

/// An expired claim counts as no claim at all
pub fn resolve(
    state: Option<BoardState>,
    count: u64,
    min_reactions: u64,
    stale_before: DateTime<Utc>,
) -> Resolution {
    match state {
        Some(BoardState::Posted(entry)) => Resolution::Update(entry),
        Some(BoardState::Pending(entry)) if !entry.claim_expired(stale_before) => {
            Resolution::Pending
        }
        _ if count < min_reactions => Resolution::BelowThreshold,
        _ => Resolution::Create,
    }
}

pub struct Board<'a, S, P> {
    config: &'a Config,
    store: &'a S,
    platform: &'a P,
    bot: UserId,
}

impl<'a, S: BoardStore, P: BoardPlatform> Board<'a, S, P> {
    pub const fn new(config: &'a Config, store: &'a S, platform: &'a P, bot: UserId) -> Self {
        Board {
            config,
            store,
            platform,
            bot,
        }
    }

    pub async fn reaction_added(&self, event: &ReactionEvent) -> Result<Outcome> {
        let message = &event.message;
        match screen(self.config, self.bot, event) {
            Screening::Vote(opposing) => {
                for emoji in &opposing {
                    debug!(
                        "removing {emoji} from {} on suggestion {}",
                        event.user.id, message.id
                    );
                    self.platform
                        .remove_reaction(message.channel, message.id, event.user.id, emoji)
                        .await?;
                }
                Ok(Outcome::VotesCleared(opposing.len()))
            }
            Screening::Ignore => Ok(Outcome::Ignored),
            Screening::RemoveReaction => {
                info!(
                    "removing board reaction of {} from message {}",
                    event.user.id, message.id
                );
                self.platform
                    .remove_reaction(message.channel, message.id, event.user.id, &event.emoji)
                    .await?;
                Ok(Outcome::ReactionRemoved)
            }
            Screening::Promote => self.promote(message).await,
        }
    }

    /// Removing a reaction can only ever update an existing post
    pub async fn reaction_removed(&self, message: &SourceMessage, emoji: &Emoji) -> Result<Outcome> {
        if message.guild != Some(self.config.guild) || !emoji.matches(&self.config.board.emoji) {
            return Ok(Outcome::Ignored);
        }

        let count = message.count_excluding_self(&self.config.board.emoji);
        match self.store.lookup(message.id)? {
            Some(BoardState::Posted(entry)) => self.update(count, &entry).await,
            Some(BoardState::Pending(_)) => self.pending(message.id, count).await,
            None => Ok(Outcome::Ignored),
        }
    }

    async fn promote(&self, source: &SourceMessage) -> Result<Outcome> {
        let count = source.count_excluding_self(&self.config.board.emoji);
        let state = self.store.lookup(source.id)?;
        let stale_before = lease_cutoff(Utc::now());

        match resolve(state, count, self.config.board.min_reactions, stale_before) {
            Resolution::Update(entry) => self.update(count, &entry).await,
            Resolution::Create => self.create(source, count).await,
            Resolution::Pending => self.pending(source.id, count).await,
            Resolution::BelowThreshold => Ok(Outcome::BelowThreshold(count)),
        }
    }

    /// Hands the count to the in-flight creation, or updates the post if it
    /// got recorded in the meantime
    async fn pending(&self, source: MessageId, count: u64) -> Result<Outcome> {
        if self.store.set_pending_count(source, count)? {
            return Ok(Outcome::Pending);
        }
        match self.store.lookup(source)? {
            Some(BoardState::Posted(entry)) => self.update(count, &entry).await,
            _ => Ok(Outcome::Pending),
        }
    }

    pub async fn create(&self, source: &SourceMessage, count: u64) -> Result<Outcome> {
        let ping = self.store.board_pings(source.author.id)?;
        let now = Utc::now();
        if !self.store.claim(source, count, ping, now, lease_cutoff(now))? {
            debug!("board post for {} already claimed", source.id);
            return Ok(Outcome::AlreadyClaimed);
        }

        let content = board_content(
            &self.config.board.emoji_display(),
            count,
            source.channel,
            source.author.id,
            ping,
        );
        let board_message = BoardMessage::new(source, content);

        let posted = match self.platform.post(self.config.board.channel, &board_message).await {
            Ok(id) => id,
            Err(why) => {
                self.store.release(source.id)?;
                return Err(why);
            }
        };
        self.record(source.id, posted).await?;
        info!("posted {} to the board with {count} reactions", source.id);

        // reactions that came in while posting left their count on the row
        if let Some(BoardState::Posted(entry)) = self.store.lookup(source.id)? {
            if entry.count != count {
                self.rewrite(posted, entry.count, &entry).await?;
                return Ok(Outcome::Created {
                    board_message: posted,
                    count: entry.count,
                });
            }
        }
        Ok(Outcome::Created {
            board_message: posted,
            count,
        })
    }

    /// The post exists from here on, losing its id would stop all updates
    async fn record(&self, source: MessageId, posted: MessageId) -> Result<()> {
        let mut attempt = 1;
        loop {
            match self.store.record(source, posted) {
                Ok(()) => return Ok(()),
                Err(why) if attempt < RECORD_ATTEMPTS => {
                    warn!("recording board post {posted} for {source} failed, attempt {attempt}: {why}");
                    tokio::time::sleep(std::time::Duration::from_millis(
                        RECORD_BACKOFF_MS * attempt,
                    ))
                    .await;
                    attempt += 1;
                }
                Err(why) => {
                    error!(
                        "board post {posted} for {source} is orphaned, claim expires in {CLAIM_LEASE_SECS}s: {why}"
                    );
                    return Err(why);
                }
            }
        }
    }

    /// Rewrites the count of an existing post. Calling this again with the
    /// same count changes nothing.
    pub async fn update(&self, count: u64, entry: &BoardEntry) -> Result<Outcome> {
        let board_message = match entry.board_message {
            Some(id) => id,
            None => return Ok(Outcome::Pending),
        };
        if entry.count == count {
            return Ok(Outcome::Unchanged(count));
        }

        self.rewrite(board_message, count, entry).await?;
        self.store.set_count(entry.source, count)?;
        Ok(Outcome::Updated(count))
    }

    async fn rewrite(&self, board_message: MessageId, count: u64, entry: &BoardEntry) -> Result<()> {
        let content = board_content(
            &self.config.board.emoji_display(),
            count,
            entry.source_channel,
            entry.author,
            entry.pinged,
        );
        self.platform
            .edit(self.config.board.channel, board_message, &content)
            .await?;

        debug!("board post {board_message} now shows {count}");
        Ok(())
    }
}
