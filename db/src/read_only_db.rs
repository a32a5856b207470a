use crate::connections::GetConnectionImmutable;
use crate::queries;
use crate::structs::{Answer, BoardEntry, Suggestion, UserSettings, XpEntry};

use rusqlite::{Result, Row};
use serenity::model::id::{ChannelId, MessageId, UserId};

#[inline(always)]
fn suggestion_from_row(row: &Row<'_>) -> Result<Suggestion> {
    Ok(Suggestion {
        id: MessageId(row.get(0)?),
        thread: row.get::<_, Option<u64>>(1)?.map(ChannelId),
        author: UserId(row.get(2)?),
        title: row.get(3)?,
        answer: row.get(4)?,
        count: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub trait ReadOnlyDb: GetConnectionImmutable {
    #[inline]
    fn get_board_entry(&self, source: MessageId) -> Result<Option<BoardEntry>> {
        queries::get_board_entry(self.get_connection(), *source.as_u64())
    }

    #[inline]
    fn get_suggestion(&self, id: MessageId) -> Result<Option<Suggestion>> {
        let mut stmt = self.get_connection().prepare(
            "SELECT id, thread, author, title, answer, count, created_at
            FROM suggestion WHERE id=(?1)",
        )?;
        let mut rows = stmt.query_map([*id.as_u64()], suggestion_from_row)?;
        rows.next().transpose()
    }

    #[inline]
    fn get_suggestion_by_thread(&self, thread: ChannelId) -> Result<Option<Suggestion>> {
        let mut stmt = self.get_connection().prepare(
            "SELECT id, thread, author, title, answer, count, created_at
            FROM suggestion WHERE thread=(?1)",
        )?;
        let mut rows = stmt.query_map([*thread.as_u64()], suggestion_from_row)?;
        rows.next().transpose()
    }

    /// All suggestions, highest count first, optionally narrowed to one answer
    /// and/or one author
    #[inline]
    fn get_top_suggestions(
        &self,
        answer: Option<Answer>,
        author: Option<UserId>,
    ) -> Result<Vec<Suggestion>> {
        let mut stmt = self.get_connection().prepare(
            "SELECT id, thread, author, title, answer, count, created_at
            FROM suggestion
            WHERE
                ((?1) IS NULL OR answer = (?1)) AND
                ((?2) IS NULL OR author = (?2))
            ORDER BY count desc, created_at asc",
        )?;
        let rows = stmt.query_map(
            (answer, author.map(|a| *a.as_u64())),
            suggestion_from_row,
        )?;

        let mut suggestions = Vec::new();
        for row in rows {
            suggestions.push(row?)
        }
        Ok(suggestions)
    }

    #[inline]
    fn get_xp(&self, user: UserId) -> Result<Option<XpEntry>> {
        queries::get_xp(self.get_connection(), *user.as_u64())
    }

    /// Every user with XP, most XP first
    #[inline]
    fn get_leaderboard(&self) -> Result<Vec<XpEntry>> {
        let mut stmt = self
            .get_connection()
            .prepare("SELECT user, xp, last_gain FROM xp ORDER BY xp desc, user asc")?;
        let rows = stmt.query_map([], |row| {
            Ok(XpEntry {
                user: UserId(row.get(0)?),
                xp: row.get(1)?,
                last_gain: row.get(2)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?)
        }
        Ok(entries)
    }

    #[inline]
    fn get_settings(&self, user: UserId) -> Result<Option<UserSettings>> {
        queries::get_settings(self.get_connection(), *user.as_u64())
    }
}
