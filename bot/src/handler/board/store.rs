use super::BoardStore;
use crate::errors::Result;
use crate::structs::SourceMessage;

use chrono::{DateTime, Utc};
use db::structs::BoardState;
use db::{read_only_db_call, writable_db_call, ReadOnlyDb, WriteableDb};
use serenity::model::id::{MessageId, UserId};

/// [`BoardStore`] backed by the sqlite database
#[derive(Debug, Clone, Copy)]
pub struct SqliteBoardStore {
    /// used for authors that never ran /settings
    pub pings_by_default: bool,
}

impl BoardStore for SqliteBoardStore {
    fn lookup(&self, source: MessageId) -> Result<Option<BoardState>> {
        Ok(read_only_db_call(|db| db.get_board_entry(source))?.map(|entry| entry.state()))
    }

    fn claim(
        &self,
        source: &SourceMessage,
        count: u64,
        ping: bool,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(writable_db_call(|db| {
            db.claim_board_entry(
                source.id,
                source.channel,
                source.author.id,
                count,
                ping,
                now,
                stale_before,
            )
        })?)
    }

    fn record(&self, source: MessageId, board_message: MessageId) -> Result<()> {
        Ok(writable_db_call(|db| db.record_board_message(source, board_message))?)
    }

    fn release(&self, source: MessageId) -> Result<()> {
        Ok(writable_db_call(|db| db.release_board_entry(source))?)
    }

    fn set_pending_count(&self, source: MessageId, count: u64) -> Result<bool> {
        Ok(writable_db_call(|db| db.set_pending_board_count(source, count))?)
    }

    fn set_count(&self, source: MessageId, count: u64) -> Result<()> {
        Ok(writable_db_call(|db| db.set_board_count(source, count))?)
    }

    fn board_pings(&self, author: UserId) -> Result<bool> {
        Ok(read_only_db_call(|db| db.get_settings(author))?
            .map_or(self.pings_by_default, |settings| settings.board_pings))
    }
}
