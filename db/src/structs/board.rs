use chrono::{DateTime, Utc};
use serenity::model::id::{ChannelId, MessageId, UserId};

/// A row of the board index. One exists per source message that has ever
/// been promoted, `board_message` is `None` while the post is still being
/// created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub source: MessageId,
    pub source_channel: ChannelId,
    pub author: UserId,
    pub board_message: Option<MessageId>,
    pub count: u64,
    pub pinged: bool,
    /// when the current claim was taken, `None` for rows older than claims
    pub claimed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardState {
    /// Claimed by an in-flight promotion, no board message yet
    Pending(BoardEntry),
    Posted(BoardEntry),
}

impl BoardEntry {
    #[inline]
    pub fn state(self) -> BoardState {
        if self.board_message.is_some() {
            BoardState::Posted(self)
        } else {
            BoardState::Pending(self)
        }
    }

    /// A claim taken before `stale_before` that never got its board message
    /// may be taken over
    #[inline]
    pub fn claim_expired(&self, stale_before: DateTime<Utc>) -> bool {
        self.board_message.is_none() && self.claimed_at.map_or(true, |at| at < stale_before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(board_message: Option<MessageId>, claimed_at: Option<DateTime<Utc>>) -> BoardEntry {
        BoardEntry {
            source: MessageId(1),
            source_channel: ChannelId(2),
            author: UserId(3),
            board_message,
            count: 5,
            pinged: false,
            claimed_at,
        }
    }

    #[test]
    fn test_claim_expired() {
        let now = Utc::now();
        let cutoff = now - Duration::minutes(5);

        assert!(!entry(None, Some(now)).claim_expired(cutoff));
        assert!(entry(None, Some(now - Duration::minutes(6))).claim_expired(cutoff));
        assert!(entry(None, None).claim_expired(cutoff));
        // posted rows are never reclaimed, however old
        assert!(!entry(Some(MessageId(4)), None).claim_expired(cutoff));
    }
}
