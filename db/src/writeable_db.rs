use crate::connections::GetConnectionMutable;
use crate::queries;
use crate::structs::{Answer, UserSettings, XpChange};
use crate::ReadOnlyDb;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rusqlite::{Error, Result};
use serenity::model::id::{ChannelId, MessageId, UserId};

pub trait WriteableDb: GetConnectionMutable + ReadOnlyDb {
    /// Reserves the board index row for `source`. Returns false if a row
    /// already exists, meaning the source is posted or being posted by someone
    /// else. A claim taken before `stale_before` that never got its board
    /// message is taken over.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    fn claim_board_entry(
        &self,
        source: MessageId,
        source_channel: ChannelId,
        author: UserId,
        count: u64,
        pinged: bool,
        claimed_at: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool> {
        let claimed = self.execute(
            "INSERT INTO board (source, source_channel, author, count, pinged, claimed_at)
            VALUES ( ?1, ?2, ?3, ?4, ?5, ?6 )
            ON CONFLICT(source) DO UPDATE SET
                count=excluded.count,
                pinged=excluded.pinged,
                claimed_at=excluded.claimed_at
            WHERE board.board_message IS NULL
                AND (board.claimed_at IS NULL OR board.claimed_at < (?7))",
            (
                *source.as_u64(),
                *source_channel.as_u64(),
                *author.as_u64(),
                count,
                pinged,
                claimed_at,
                stale_before,
            ),
        )?;

        if claimed > 0 {
            debug!("claimed board entry for source {source}");
        }
        Ok(claimed > 0)
    }

    #[inline]
    fn record_board_message(&self, source: MessageId, board_message: MessageId) -> Result<()> {
        let updated = self.execute(
            "UPDATE board SET board_message=(?2) WHERE source=(?1)",
            (*source.as_u64(), *board_message.as_u64()),
        )?;

        if updated == 0 {
            warn!("no claimed board entry for source {source}");
            return Err(Error::QueryReturnedNoRows);
        }
        info!("source {source} posted to board as {board_message}");
        Ok(())
    }

    /// Drops a claim whose board post never got created
    #[inline]
    fn release_board_entry(&self, source: MessageId) -> Result<()> {
        self.execute(
            "DELETE FROM board WHERE source=(?1) AND board_message IS NULL",
            [*source.as_u64()],
        )?;
        Ok(())
    }

    /// Stores the count seen while the board post is in flight. False once
    /// the post is recorded, the caller has to edit it instead.
    #[inline]
    fn set_pending_board_count(&self, source: MessageId, count: u64) -> Result<bool> {
        let updated = self.execute(
            "UPDATE board SET count=(?2) WHERE source=(?1) AND board_message IS NULL",
            (*source.as_u64(), count),
        )?;
        Ok(updated > 0)
    }

    #[inline]
    fn set_board_count(&self, source: MessageId, count: u64) -> Result<()> {
        self.execute(
            "UPDATE board SET count=(?2) WHERE source=(?1)",
            (*source.as_u64(), count),
        )?;
        Ok(())
    }

    #[inline]
    fn insert_suggestion(
        &self,
        id: MessageId,
        thread: Option<ChannelId>,
        author: UserId,
        title: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self.execute(
            "INSERT INTO suggestion (id, thread, author, title, created_at)
            VALUES ( ?1, ?2, ?3, ?4, ?5 )
            ON CONFLICT(id) DO NOTHING",
            (
                *id.as_u64(),
                thread.map(|t| *t.as_u64()),
                *author.as_u64(),
                title,
                created_at,
            ),
        )?;
        Ok(())
    }

    #[inline]
    fn set_suggestion_answer(&self, id: MessageId, answer: Answer) -> Result<()> {
        self.execute(
            "UPDATE suggestion SET answer=(?2) WHERE id=(?1)",
            (*id.as_u64(), answer),
        )?;
        Ok(())
    }

    #[inline]
    fn set_suggestion_count(&self, id: MessageId, count: i64) -> Result<()> {
        self.execute(
            "UPDATE suggestion SET count=(?2) WHERE id=(?1)",
            (*id.as_u64(), count),
        )?;
        Ok(())
    }

    /// Adds `amount` XP to `user` and stamps the gain time
    #[inline]
    fn add_xp(&mut self, user: UserId, amount: u64, at: DateTime<Utc>) -> Result<XpChange> {
        let tx = self.get_mutable_connection().transaction()?;
        let before = queries::get_xp(&tx, *user.as_u64())?.map_or(0, |entry| entry.xp);
        tx.execute(
            "INSERT INTO xp (user, xp, last_gain) VALUES ( ?1, ?2, ?3 )
            ON CONFLICT(user) DO UPDATE SET
                xp=xp + excluded.xp,
                last_gain=excluded.last_gain",
            (*user.as_u64(), amount, at),
        )?;
        let after = queries::get_xp(&tx, *user.as_u64())?.map_or(0, |entry| entry.xp);
        tx.commit()?;

        Ok(XpChange { before, after })
    }

    #[inline]
    fn update_settings(&self, settings: &UserSettings) -> Result<()> {
        self.execute(
            "INSERT INTO user_settings
                (user, board_pings, level_up_pings, weekly_pings, autoreactions)
            VALUES ( ?1, ?2, ?3, ?4, ?5 )
            ON CONFLICT(user) DO UPDATE SET
                board_pings=excluded.board_pings,
                level_up_pings=excluded.level_up_pings,
                weekly_pings=excluded.weekly_pings,
                autoreactions=excluded.autoreactions",
            (
                *settings.user.as_u64(),
                settings.board_pings,
                settings.level_up_pings,
                settings.weekly_pings,
                settings.autoreactions,
            ),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::BoardState;
    use crate::WriteableConn;
    use chrono::Duration;

    fn claim(db: &WriteableConn, source: u64, count: u64, at: DateTime<Utc>) -> Result<bool> {
        db.claim_board_entry(
            MessageId(source),
            ChannelId(2),
            UserId(3),
            count,
            false,
            at,
            at - Duration::minutes(5),
        )
    }

    #[test]
    fn test_claim_board_entry_only_once() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        let now = Utc::now();
        assert!(claim(&db, 1, 5, now)?);
        assert!(!claim(&db, 1, 6, now)?);

        let entry = db.get_board_entry(MessageId(1))?.unwrap();
        assert_eq!(entry.count, 5);
        assert!(matches!(entry.state(), BoardState::Pending(_)));
        Ok(())
    }

    #[test]
    fn test_expired_claim_is_taken_over() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        let then = Utc::now() - Duration::minutes(10);
        assert!(claim(&db, 1, 5, then)?);

        let now = Utc::now();
        assert!(claim(&db, 1, 8, now)?);
        let entry = db.get_board_entry(MessageId(1))?.unwrap();
        assert_eq!(entry.count, 8);
        assert!(!entry.claim_expired(now - Duration::minutes(5)));

        // the fresh claim holds against a second taker
        assert!(!claim(&db, 1, 9, now)?);
        Ok(())
    }

    #[test]
    fn test_posted_entry_is_never_reclaimed() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        let then = Utc::now() - Duration::hours(1);
        claim(&db, 1, 5, then)?;
        db.record_board_message(MessageId(1), MessageId(10))?;

        assert!(!claim(&db, 1, 8, Utc::now())?);
        let entry = db.get_board_entry(MessageId(1))?.unwrap();
        assert_eq!(entry.board_message, Some(MessageId(10)));
        assert_eq!(entry.count, 5);
        Ok(())
    }

    #[test]
    fn test_record_board_message_marks_posted() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        db.claim_board_entry(
            MessageId(1),
            ChannelId(2),
            UserId(3),
            5,
            true,
            Utc::now(),
            Utc::now(),
        )?;
        db.record_board_message(MessageId(1), MessageId(10))?;

        let entry = db.get_board_entry(MessageId(1))?.unwrap();
        assert_eq!(entry.board_message, Some(MessageId(10)));
        assert!(entry.pinged);
        assert!(matches!(entry.state(), BoardState::Posted(_)));
        Ok(())
    }

    #[test]
    fn test_record_without_claim_fails() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        assert!(db.record_board_message(MessageId(1), MessageId(10)).is_err());
        Ok(())
    }

    #[test]
    fn test_pending_count_stops_at_post() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        claim(&db, 1, 5, Utc::now())?;

        assert!(db.set_pending_board_count(MessageId(1), 7)?);
        assert_eq!(db.get_board_entry(MessageId(1))?.unwrap().count, 7);

        db.record_board_message(MessageId(1), MessageId(10))?;
        assert!(!db.set_pending_board_count(MessageId(1), 9)?);
        assert_eq!(db.get_board_entry(MessageId(1))?.unwrap().count, 7);

        assert!(!db.set_pending_board_count(MessageId(2), 9)?);
        Ok(())
    }

    #[test]
    fn test_release_keeps_posted_entries() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        let now = Utc::now();
        claim(&db, 1, 5, now)?;
        claim(&db, 4, 5, now)?;
        db.record_board_message(MessageId(4), MessageId(40))?;

        db.release_board_entry(MessageId(1))?;
        db.release_board_entry(MessageId(4))?;

        assert_eq!(db.get_board_entry(MessageId(1))?, None);
        assert!(db.get_board_entry(MessageId(4))?.is_some());
        Ok(())
    }

    #[test]
    fn test_add_xp_accumulates() -> Result<()> {
        let mut db = WriteableConn::in_memory()?;
        let now = Utc::now();
        assert_eq!(
            db.add_xp(UserId(7), 20, now)?,
            XpChange {
                before: 0,
                after: 20
            }
        );
        assert_eq!(
            db.add_xp(UserId(7), 15, now)?,
            XpChange {
                before: 20,
                after: 35
            }
        );
        db.add_xp(UserId(8), 100, now)?;

        let leaderboard = db.get_leaderboard()?;
        assert_eq!(leaderboard.len(), 2);
        assert_eq!(leaderboard[0].user, UserId(8));
        assert_eq!(leaderboard[1].xp, 35);
        Ok(())
    }

    #[test]
    fn test_top_suggestions_filters_and_sorts() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        let now = Utc::now();
        db.insert_suggestion(MessageId(1), None, UserId(10), "first", now)?;
        db.insert_suggestion(MessageId(2), Some(ChannelId(2)), UserId(11), "second", now)?;
        db.insert_suggestion(MessageId(3), None, UserId(10), "third", now)?;
        db.set_suggestion_count(MessageId(1), 3)?;
        db.set_suggestion_count(MessageId(2), 9)?;
        db.set_suggestion_count(MessageId(3), -2)?;
        db.set_suggestion_answer(MessageId(3), Answer::Rejected)?;

        let all = db.get_top_suggestions(None, None)?;
        let ids: Vec<_> = all.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![MessageId(2), MessageId(1), MessageId(3)]);

        let by_author = db.get_top_suggestions(None, Some(UserId(10)))?;
        assert_eq!(by_author.len(), 2);

        let rejected = db.get_top_suggestions(Some(Answer::Rejected), Some(UserId(10)))?;
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].title, "third");

        assert_eq!(
            db.get_suggestion_by_thread(ChannelId(2))?.map(|s| s.id),
            Some(MessageId(2))
        );
        Ok(())
    }

    #[test]
    fn test_update_settings_overwrites() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        let mut settings = UserSettings {
            user: UserId(5),
            board_pings: true,
            level_up_pings: false,
            weekly_pings: false,
            autoreactions: true,
        };
        db.update_settings(&settings)?;
        settings.level_up_pings = true;
        db.update_settings(&settings)?;

        assert_eq!(db.get_settings(UserId(5))?, Some(settings));
        assert_eq!(db.get_settings(UserId(6))?, None);
        Ok(())
    }
}
