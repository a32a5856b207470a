//! Startup configuration.
//!
//! Everything is read from the environment once, in `main`, and shared
//! read-only afterwards.

use crate::errors::{Error, Result};
use crate::structs::Emoji;

use serenity::model::id::{ChannelId, GuildId};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub channel: ChannelId,
    /// name, id or `name:id` of the emoji that counts towards the board
    pub emoji: String,
    pub min_reactions: u64,
    /// remove reactions authors put on their own messages
    pub suppress_self_boost: bool,
    /// responses to this slash command can't be boarded
    pub explore_command: String,
}

impl BoardConfig {
    /// How the board emoji is written inside a message
    pub fn emoji_display(&self) -> String {
        if self.emoji.parse::<u64>().is_ok() {
            format!("<:board:{}>", self.emoji)
        } else {
            Emoji::from_key(&self.emoji).to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionConfig {
    pub channel: ChannelId,
    /// Mutually exclusive emoji groups, the first is counted as upvotes and
    /// the second as downvotes
    pub groups: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub guild: GuildId,
    pub board: BoardConfig,
    pub suggestions: SuggestionConfig,
    pub xp_cooldown: Duration,
    /// default for all of the ping settings of users that never set them
    pub pings_by_default: bool,
    pub database_path: PathBuf,
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::Config(key, "missing".to_string()))
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|why| Error::Config(key, format!("{why}"))),
        None => Ok(default),
    }
}

fn snowflake<F>(lookup: &F, key: &'static str) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    required(lookup, key)?
        .trim()
        .parse()
        .map_err(|why| Error::Config(key, format!("not a snowflake: {why}")))
}

/// Parses `👍,⬆️|👎,⬇️` into `[["👍", "⬆️"], ["👎", "⬇️"]]`
pub fn parse_emoji_groups(text: &str) -> Vec<Vec<String>> {
    text.split('|')
        .map(|group| {
            group
                .split(',')
                .map(str::trim)
                .filter(|emoji| !emoji.is_empty())
                .map(String::from)
                .collect::<Vec<String>>()
        })
        .filter(|group| !group.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let groups = parse_emoji_groups(
            &lookup("SUGGESTION_EMOJIS").unwrap_or_else(|| "👍|👎".to_string()),
        );
        if groups.len() < 2 {
            return Err(Error::Config(
                "SUGGESTION_EMOJIS",
                "needs at least two groups".to_string(),
            ));
        }

        let xp_cooldown = match lookup("XP_COOLDOWN") {
            Some(text) => humantime::parse_duration(text.trim())
                .map_err(|why| Error::Config("XP_COOLDOWN", format!("{why}")))?,
            None => Duration::from_secs(60),
        };

        Ok(Config {
            token: required(&lookup, "DISCORD_TOKEN")?,
            guild: GuildId(snowflake(&lookup, "GUILD_ID")?),
            board: BoardConfig {
                channel: ChannelId(snowflake(&lookup, "BOARD_CHANNEL")?),
                emoji: lookup("BOARD_EMOJI").unwrap_or_else(|| "🥔".to_string()),
                min_reactions: parsed(&lookup, "MIN_REACTIONS", 8)?,
                suppress_self_boost: parsed(&lookup, "SUPPRESS_SELF_BOOST", true)?,
                explore_command: lookup("EXPLORE_COMMAND")
                    .unwrap_or_else(|| "explorepotatoes".to_string()),
            },
            suggestions: SuggestionConfig {
                channel: ChannelId(snowflake(&lookup, "SUGGESTION_CHANNEL")?),
                groups,
            },
            xp_cooldown,
            pings_by_default: parsed(&lookup, "PINGS_BY_DEFAULT", false)?,
            database_path: lookup("DATABASE_PATH")
                .map_or_else(|| PathBuf::from("./board.db3"), PathBuf::from),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    pub(crate) fn test_config() -> Config {
        Config {
            token: "token".to_string(),
            guild: GuildId(1),
            board: BoardConfig {
                channel: ChannelId(2),
                emoji: "🥔".to_string(),
                min_reactions: 5,
                suppress_self_boost: true,
                explore_command: "explorepotatoes".to_string(),
            },
            suggestions: SuggestionConfig {
                channel: ChannelId(3),
                groups: vec![vec!["👍".to_string()], vec!["👎".to_string()]],
            },
            xp_cooldown: Duration::from_secs(60),
            pings_by_default: false,
            database_path: PathBuf::from(":memory:"),
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("DISCORD_TOKEN", "abc"),
        ("GUILD_ID", "1"),
        ("BOARD_CHANNEL", "2"),
        ("SUGGESTION_CHANNEL", "3"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.guild, GuildId(1));
        assert_eq!(config.board.emoji, "🥔");
        assert_eq!(config.board.min_reactions, 8);
        assert!(config.board.suppress_self_boost);
        assert_eq!(config.suggestions.groups.len(), 2);
        assert_eq!(config.xp_cooldown, Duration::from_secs(60));
        assert!(!config.pings_by_default);
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("MIN_REACTIONS", "3"));
        vars.push(("SUPPRESS_SELF_BOOST", "false"));
        vars.push(("XP_COOLDOWN", "2m"));
        vars.push(("SUGGESTION_EMOJIS", "👍, ⬆️ | 👎,⬇️"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.board.min_reactions, 3);
        assert!(!config.board.suppress_self_boost);
        assert_eq!(config.xp_cooldown, Duration::from_secs(120));
        assert_eq!(
            config.suggestions.groups,
            vec![vec!["👍", "⬆️"], vec!["👎", "⬇️"]]
        );
    }

    #[test]
    fn test_missing_required() {
        let err = Config::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert!(matches!(err, Error::Config("DISCORD_TOKEN", _)));
    }

    #[test]
    fn test_bad_snowflake() {
        let mut vars = REQUIRED.to_vec();
        vars[1] = ("GUILD_ID", "guild");
        assert!(matches!(
            Config::from_lookup(lookup(&vars)),
            Err(Error::Config("GUILD_ID", _))
        ));
    }

    #[test]
    fn test_single_group_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SUGGESTION_EMOJIS", "👍"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_custom_emoji_display() {
        let mut config = test_config();
        assert_eq!(config.board.emoji_display(), "🥔");
        config.board.emoji = "81234".to_string();
        assert_eq!(config.board.emoji_display(), "<:board:81234>");
        config.board.emoji = "spud:81234".to_string();
        assert_eq!(config.board.emoji_display(), "<:spud:81234>");
    }
}
