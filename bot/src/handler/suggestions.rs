use crate::config::SuggestionConfig;
use crate::errors::Result;
use crate::structs::{Emoji, SourceMessage};

use db::{writable_db_call, ReadOnlyDb, WriteableDb};
use log::debug;

/// Index of the polarity group `emoji` belongs to
pub fn polarity_group(groups: &[Vec<String>], emoji: &Emoji) -> Option<usize> {
    groups
        .iter()
        .position(|group| group.iter().any(|key| emoji.matches(key)))
}

/// The reactions on `message` that conflict with voting `emoji`, i.e. every
/// reaction from a different polarity group. `None` if `emoji` isn't a vote.
pub fn opposing_reactions(
    groups: &[Vec<String>],
    message: &SourceMessage,
    emoji: &Emoji,
) -> Option<Vec<Emoji>> {
    let own = polarity_group(groups, emoji)?;
    Some(
        message
            .reactions
            .iter()
            .filter(|tally| {
                polarity_group(groups, &tally.emoji).map_or(false, |group| group != own)
            })
            .map(|tally| tally.emoji.clone())
            .collect(),
    )
}

/// Upvotes minus downvotes, ignoring the bot's own seed reactions
pub fn tally_votes(groups: &[Vec<String>], message: &SourceMessage) -> i64 {
    message
        .reactions
        .iter()
        .map(|tally| match polarity_group(groups, &tally.emoji) {
            Some(0) => tally.count_excluding_self() as i64,
            Some(1) => -(tally.count_excluding_self() as i64),
            _ => 0,
        })
        .sum()
}

/// Stores the current vote count of `message` if it is a known suggestion
pub fn refresh_tally(config: &SuggestionConfig, message: &SourceMessage) -> Result<()> {
    if message.channel != config.channel {
        return Ok(());
    }

    let count = tally_votes(&config.groups, message);
    writable_db_call(|db| {
        if db.get_suggestion(message.id)?.is_some() {
            debug!("suggestion {} now has {count} votes", message.id);
            db.set_suggestion_count(message.id, count)?;
        }
        Ok(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::source::tests::{source, tally};

    fn groups() -> Vec<Vec<String>> {
        vec![
            vec!["👍".to_string(), "⬆️".to_string()],
            vec!["👎".to_string(), "⬇️".to_string()],
        ]
    }

    #[test]
    fn test_polarity_group() {
        assert_eq!(polarity_group(&groups(), &Emoji::unicode("⬆️")), Some(0));
        assert_eq!(polarity_group(&groups(), &Emoji::unicode("👎")), Some(1));
        assert_eq!(polarity_group(&groups(), &Emoji::unicode("🥔")), None);
    }

    #[test]
    fn test_upvote_conflicts_with_downvotes() {
        let msg = source(vec![
            tally("👍", 3, true),
            tally("👎", 2, true),
            tally("⬇️", 1, false),
            tally("🥔", 1, false),
        ]);
        let opposing = opposing_reactions(&groups(), &msg, &Emoji::unicode("👍")).unwrap();
        assert_eq!(opposing, vec![Emoji::unicode("👎"), Emoji::unicode("⬇️")]);
    }

    #[test]
    fn test_downvote_conflicts_with_upvotes() {
        let msg = source(vec![tally("👍", 3, true), tally("👎", 2, true)]);
        let opposing = opposing_reactions(&groups(), &msg, &Emoji::unicode("👎")).unwrap();
        assert_eq!(opposing, vec![Emoji::unicode("👍")]);
    }

    #[test]
    fn test_same_group_does_not_conflict() {
        let msg = source(vec![tally("👍", 3, true), tally("⬆️", 1, false)]);
        let opposing = opposing_reactions(&groups(), &msg, &Emoji::unicode("👍")).unwrap();
        assert!(opposing.is_empty());
    }

    #[test]
    fn test_non_vote_emoji() {
        let msg = source(vec![tally("👍", 3, true)]);
        assert_eq!(opposing_reactions(&groups(), &msg, &Emoji::unicode("🥔")), None);
    }

    #[test]
    fn test_tally_votes() {
        let msg = source(vec![
            tally("👍", 6, true),
            tally("⬆️", 1, false),
            tally("👎", 3, true),
            tally("🥔", 10, false),
        ]);
        assert_eq!(tally_votes(&groups(), &msg), 6 - 2);
    }
}
