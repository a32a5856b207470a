use chrono::{DateTime, Utc};
use serenity::model::id::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpEntry {
    pub user: UserId,
    pub xp: u64,
    pub last_gain: Option<DateTime<Utc>>,
}

/// XP totals of a user before and after a gain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpChange {
    pub before: u64,
    pub after: u64,
}
