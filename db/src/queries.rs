use crate::structs::{BoardEntry, UserSettings, XpEntry};
use rusqlite::{Connection, OptionalExtension, Result, Row};
use serenity::model::id::{ChannelId, MessageId, UserId};

#[inline(always)]
pub fn get_version(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT user_version FROM pragma_user_version;", [], |row| {
        row.get(0)
    })
}

#[inline(always)]
pub fn set_version(conn: &Connection, version: u32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)
}

#[inline(always)]
fn board_entry_from_row(row: &Row<'_>) -> Result<BoardEntry> {
    Ok(BoardEntry {
        source: MessageId(row.get(0)?),
        source_channel: ChannelId(row.get(1)?),
        author: UserId(row.get(2)?),
        board_message: row.get::<_, Option<u64>>(3)?.map(MessageId),
        count: row.get(4)?,
        pinged: row.get(5)?,
        claimed_at: row.get(6)?,
    })
}

#[inline(always)]
pub fn get_board_entry(conn: &Connection, source: u64) -> Result<Option<BoardEntry>> {
    conn.query_row(
        "SELECT source, source_channel, author, board_message, count, pinged, claimed_at
        FROM board WHERE source=(?1)",
        [source],
        board_entry_from_row,
    )
    .optional()
}

#[inline(always)]
pub fn get_xp(conn: &Connection, user: u64) -> Result<Option<XpEntry>> {
    conn.query_row(
        "SELECT user, xp, last_gain FROM xp WHERE user=(?1)",
        [user],
        |row| {
            Ok(XpEntry {
                user: UserId(row.get(0)?),
                xp: row.get(1)?,
                last_gain: row.get(2)?,
            })
        },
    )
    .optional()
}

#[inline(always)]
pub fn get_settings(conn: &Connection, user: u64) -> Result<Option<UserSettings>> {
    conn.query_row(
        "SELECT user, board_pings, level_up_pings, weekly_pings, autoreactions
        FROM user_settings WHERE user=(?1)",
        [user],
        |row| {
            Ok(UserSettings {
                user: UserId(row.get(0)?),
                board_pings: row.get(1)?,
                level_up_pings: row.get(2)?,
                weekly_pings: row.get(3)?,
                autoreactions: row.get(4)?,
            })
        },
    )
    .optional()
}
