use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Result;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Answer {
    #[default]
    Unanswered,
    GoodIdea,
    Implemented,
    InDevelopment,
    Incompatible,
    Impractical,
    Rejected,
    Impossible,
}

impl Answer {
    pub const ALL: [Answer; 8] = [
        Answer::Unanswered,
        Answer::GoodIdea,
        Answer::Implemented,
        Answer::InDevelopment,
        Answer::Incompatible,
        Answer::Impractical,
        Answer::Rejected,
        Answer::Impossible,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Answer::Unanswered => "Unanswered",
            Answer::GoodIdea => "Good Idea",
            Answer::Implemented => "Implemented",
            Answer::InDevelopment => "In Development",
            Answer::Incompatible => "Incompatible",
            Answer::Impractical => "Impractical",
            Answer::Rejected => "Rejected",
            Answer::Impossible => "Impossible",
        }
    }

    /// Case insensitive lookup of an answer by its display name
    pub fn parse(text: &str) -> Option<Answer> {
        Answer::ALL
            .into_iter()
            .find(|answer| answer.as_str().eq_ignore_ascii_case(text.trim()))
    }
}

impl ToSql for Answer {
    #[inline]
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Answer {
    #[inline]
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Answer::parse(text).ok_or_else(|| FromSqlError::Other(format!("unknown answer {text}").into()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// id of the suggestion's message in the suggestion channel
    pub id: MessageId,
    pub thread: Option<ChannelId>,
    pub author: UserId,
    pub title: String,
    pub answer: Answer,
    pub count: i64,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    /// Jump link to the suggestion message
    #[inline]
    pub fn uri(&self, channel: ChannelId, guild: GuildId) -> String {
        self.id.link(channel, Some(guild))
    }
}
