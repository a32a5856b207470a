use crate::errors::Result;
use crate::structs::level::{level_for_xp, progress_bar, Progress};
use crate::structs::{Options, Page, Reply};

use db::structs::XpEntry;
use db::{read_only_db_call, ReadOnlyDb};
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::id::UserId;

const BAR_WIDTH: usize = 15;
const BLANK: &str = "\u{200b}";

pub fn leaderboard_line(entry: &XpEntry) -> String {
    format!(
        "**Level {}** - <@{}> ({} XP)",
        level_for_xp(entry.xp),
        entry.user,
        entry.xp
    )
}

pub fn rank_footer(rank: Option<usize>, total: usize) -> String {
    match rank {
        Some(rank) => format!("Ranked {rank}/{total} • View the leaderboard with /xp top"),
        None => "View the leaderboard with /xp top".to_string(),
    }
}

fn rank_embed(name: &str, avatar: String, progress: &Progress, footer: String) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .author(|author| author.name(name).icon_url(avatar))
        .title("XP Rank")
        .field("📊 Level", progress.level, true)
        .field("✨ XP", progress.xp, true)
        .field(BLANK, BLANK, true)
        .field("⬆ Next Level XP", progress.next_level_xp, true)
        .field(
            "Progress",
            format!(
                "{} ({}/{})",
                progress.percent(),
                progress.gained,
                progress.increment
            ),
            true,
        )
        .field(BLANK, BLANK, true)
        .field(progress_bar(progress.ratio(), BAR_WIDTH), BLANK, false)
        .footer(|f| f.text(footer));
    embed
}

fn rank_of(leaderboard: &[XpEntry], user: UserId) -> Option<(usize, &XpEntry)> {
    leaderboard
        .iter()
        .enumerate()
        .find(|(_, entry)| entry.user == user)
        .map(|(index, entry)| (index + 1, entry))
}

pub fn rank(command: &ApplicationCommandInteraction, options: &Options) -> Result<Reply> {
    let (user, name) = match options.user("user") {
        Some((id, name)) => (id, name.to_string()),
        None => (command.user.id, command.user.name.clone()),
    };
    let avatar = match command.data.resolved.users.get(&user) {
        Some(resolved) => resolved.face(),
        None => command.user.face(),
    };

    let leaderboard = read_only_db_call(|db| db.get_leaderboard())?;
    // users that never earned anything show up at level 0 without a rank
    let ranked = rank_of(&leaderboard, user);
    let xp = ranked.map_or(0, |(_, entry)| entry.xp);
    let footer = rank_footer(ranked.map(|(rank, _)| rank), leaderboard.len());

    Ok(Reply::embed(rank_embed(
        &name,
        avatar,
        &Progress::new(xp),
        footer,
    )))
}

pub fn top(options: &Options) -> Result<Reply> {
    let leaderboard = read_only_db_call(|db| db.get_leaderboard())?;
    let lines: Vec<String> = leaderboard.iter().map(leaderboard_line).collect();
    let page = Page::new(
        "XP leaderboard".to_string(),
        &lines,
        options.page(),
        "user",
        "No users found.",
    );

    let mut embed = CreateEmbed::default();
    page.embed(&mut embed);
    Ok(Reply::embed(embed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: u64, xp: u64) -> XpEntry {
        XpEntry {
            user: UserId(user),
            xp,
            last_gain: None,
        }
    }

    #[test]
    fn test_leaderboard_line() {
        assert_eq!(leaderboard_line(&entry(5, 300)), "**Level 2** - <@5> (300 XP)");
        assert_eq!(leaderboard_line(&entry(6, 0)), "**Level 0** - <@6> (0 XP)");
    }

    #[test]
    fn test_rank_of() {
        let leaderboard = vec![entry(1, 500), entry(2, 300), entry(3, 20)];
        assert_eq!(rank_of(&leaderboard, UserId(2)).map(|(rank, _)| rank), Some(2));
        assert_eq!(rank_of(&leaderboard, UserId(9)), None);
    }

    #[test]
    fn test_rank_footer() {
        assert_eq!(
            rank_footer(Some(2), 3),
            "Ranked 2/3 • View the leaderboard with /xp top"
        );
        assert_eq!(rank_footer(None, 3), "View the leaderboard with /xp top");
    }
}
