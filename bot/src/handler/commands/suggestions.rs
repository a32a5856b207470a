use crate::config::Config;
use crate::errors::{Error, Result};
use crate::structs::board::truncate;
use crate::structs::{Emoji, Options, Page, Reply};

use chrono::Utc;
use db::structs::{Answer, Suggestion};
use db::{read_only_db_call, writable_db_call, ReadOnlyDb, WriteableDb};
use lazy_static::lazy_static;
use log::info;
use phf::phf_map;
use regex::Regex;
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::id::{GuildId, MessageId};
use serenity::prelude::*;

const SUGGESTION_COLOUR: u32 = 0x222222;
/// a week, the longest discord keeps an idle thread open
const MAX_ARCHIVE_DURATION: u16 = 10080;
const MAX_THREAD_NAME: usize = 100;
const MAX_TITLE: usize = 100;

static ANSWER_COLOURS: phf::Map<&'static str, u32> = phf_map! {
    "Unanswered" => 0x222222,
    "Good Idea" => 0x5865F2,
    "Implemented" => 0x57F287,
    "In Development" => 0xFEE75C,
    "Incompatible" => 0x99AAB5,
    "Impractical" => 0xE67E22,
    "Rejected" => 0xED4245,
    "Impossible" => 0x000000,
};

pub fn answer_colour(answer: Answer) -> u32 {
    ANSWER_COLOURS.get(answer.as_str()).copied().unwrap_or(0)
}

pub fn thread_name(answer: Answer, title: &str) -> String {
    truncate(&format!("{} | {title}", answer.as_str()), MAX_THREAD_NAME)
}

/// Swaps the answer in front of the first `|` of a thread name
pub fn answered_thread_name(current: &str, answer: Answer) -> String {
    lazy_static! {
        static ref PREFIX: Regex = Regex::new(r"^[^|]* \|").unwrap();
    }
    let renamed = if PREFIX.is_match(current) {
        PREFIX
            .replace(current, format!("{} |", answer.as_str()))
            .into_owned()
    } else {
        format!("{} | {current}", answer.as_str())
    };
    truncate(&renamed, MAX_THREAD_NAME)
}

pub fn suggestion_line(suggestion: &Suggestion, vote: &str, link: &str, mention: bool) -> String {
    let mut line = format!(
        "**{}** {vote} [{}]({link} \"{}\")",
        suggestion.count,
        truncate(&suggestion.title, MAX_TITLE),
        suggestion.answer.as_str()
    );
    if mention {
        line.push_str(&format!(" by <@{}>", suggestion.author));
    }
    line
}

pub fn top_title(author: Option<&str>, answer: Option<Answer>) -> String {
    let mut title = "Top suggestions".to_string();
    if let Some(author) = author {
        title.push_str(&format!(" by {author}"));
    }
    if let Some(answer) = answer {
        let joiner = if author.is_some() { " &" } else { "" };
        title.push_str(&format!("{joiner} answered with {}", answer.as_str()));
    }
    title
}

fn not_in_thread(config: &Config) -> Reply {
    Reply::new(format!(
        "This command can only be used in threads in <#{}>.",
        config.suggestions.channel
    ))
    .ephemeral()
}

fn required<'a>(options: &'a Options, name: &'static str) -> Result<&'a str> {
    options
        .string(name)
        .ok_or_else(|| Error::Internal(format!("missing required option {name}")))
}

fn suggestion_in(command: &ApplicationCommandInteraction) -> Result<Option<Suggestion>> {
    Ok(read_only_db_call(|db| {
        db.get_suggestion_by_thread(command.channel_id)
    })?)
}

/// Applies `change` to the embed of a suggestion message
async fn rewrite_embed<F>(ctx: &Context, config: &Config, id: MessageId, change: F) -> Result<()>
where
    F: FnOnce(&mut CreateEmbed),
{
    let channel = config.suggestions.channel;
    let message = channel.message(ctx, id).await?;
    let mut embed = match message.embeds.into_iter().next() {
        Some(embed) => CreateEmbed::from(embed),
        None => return Err(Error::ConstStr("suggestion message has no embed")),
    };
    change(&mut embed);

    channel
        .edit_message(&ctx.http, id, |edit| edit.set_embed(embed))
        .await?;
    Ok(())
}

pub async fn create(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    config: &Config,
    options: &Options,
) -> Result<Reply> {
    let title = required(options, "title")?;
    let description = required(options, "description")?;
    let name = command
        .member
        .as_ref()
        .and_then(|member| member.nick.clone())
        .unwrap_or_else(|| command.user.name.clone());
    let avatar = command.user.face();

    let channel = config.suggestions.channel;
    let message = channel
        .send_message(&ctx.http, |builder| {
            builder.embed(|embed| {
                embed
                    .author(|author| author.name(format!("Suggestion by {name}")).icon_url(avatar))
                    .title(title)
                    .description(description)
                    .colour(SUGGESTION_COLOUR)
            })
        })
        .await?;

    for group in &config.suggestions.groups {
        if let Some(key) = group.first() {
            message.react(ctx, Emoji::from_key(key).reaction_type()).await?;
        }
    }

    let thread = channel
        .create_public_thread(&ctx.http, message.id, |thread| {
            thread
                .name(thread_name(Answer::Unanswered, title))
                .auto_archive_duration(MAX_ARCHIVE_DURATION)
        })
        .await?;
    thread.id.add_thread_member(&ctx.http, command.user.id).await?;

    writable_db_call(|db| {
        db.insert_suggestion(message.id, Some(thread.id), command.user.id, title, Utc::now())
    })?;
    info!("{} suggested {title} in {}", command.user.id, message.id);

    Ok(Reply::new(format!("Your suggestion is up in <#{}>!", thread.id)).ephemeral())
}

pub async fn answer(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    config: &Config,
    options: &Options,
) -> Result<Reply> {
    let answer = match Answer::parse(required(options, "answer")?) {
        Some(answer) => answer,
        None => return Ok(Reply::new_const("That is not a valid answer.").ephemeral()),
    };
    let suggestion = match suggestion_in(command)? {
        Some(suggestion) => suggestion,
        None => return Ok(not_in_thread(config)),
    };

    if let Some(thread) = command.channel_id.to_channel(ctx).await?.guild() {
        let name = answered_thread_name(&thread.name, answer);
        command
            .channel_id
            .edit_thread(&ctx.http, |edit| edit.name(name))
            .await?;
    }
    rewrite_embed(ctx, config, suggestion.id, |embed| {
        embed.colour(answer_colour(answer));
    })
    .await?;
    writable_db_call(|db| db.set_suggestion_answer(suggestion.id, answer))?;

    info!(
        "{} answered suggestion {} with {}",
        command.user.id,
        suggestion.id,
        answer.as_str()
    );
    Ok(Reply::new(format!("Answered with **{}**.", answer.as_str())))
}

pub async fn edit(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    config: &Config,
    options: &Options,
) -> Result<Reply> {
    let description = required(options, "description")?;
    let suggestion = match suggestion_in(command)? {
        Some(suggestion) => suggestion,
        None => return Ok(not_in_thread(config)),
    };
    if suggestion.author != command.user.id {
        return Ok(
            Reply::new_const("You do not have permission to use this command.").ephemeral(),
        );
    }

    rewrite_embed(ctx, config, suggestion.id, |embed| {
        embed.description(description);
    })
    .await?;

    info!("{} edited suggestion {}", command.user.id, suggestion.id);
    Ok(Reply::new_const("Updated your suggestion!").ephemeral())
}

pub fn top(
    command: &ApplicationCommandInteraction,
    config: &Config,
    options: &Options,
) -> Result<Reply> {
    let answer = options.string("answer").and_then(Answer::parse);
    let author = options.user("user");
    let suggestions =
        read_only_db_call(|db| db.get_top_suggestions(answer, author.map(|(id, _)| id)))?;

    let vote = config
        .suggestions
        .groups
        .first()
        .and_then(|group| group.first())
        .map(|key| Emoji::from_key(key).to_string())
        .unwrap_or_default();
    let guild: GuildId = command.guild_id.unwrap_or(config.guild);
    let lines: Vec<String> = suggestions
        .iter()
        .map(|suggestion| {
            let link = suggestion.uri(config.suggestions.channel, guild);
            suggestion_line(suggestion, &vote, &link, author.is_none())
        })
        .collect();

    let page = Page::new(
        top_title(author.map(|(_, name)| name), answer),
        &lines,
        options.page(),
        "suggestion",
        "No suggestions found! Try changing any filters you may have used.",
    );
    let mut embed = CreateEmbed::default();
    page.embed(&mut embed);
    Ok(Reply::embed(embed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serenity::model::id::{ChannelId, UserId};

    fn suggestion(title: &str, count: i64) -> Suggestion {
        Suggestion {
            id: MessageId(30),
            thread: Some(ChannelId(31)),
            author: UserId(100),
            title: title.to_string(),
            answer: Answer::GoodIdea,
            count,
            created_at: Utc.timestamp_opt(1_650_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_thread_name() {
        assert_eq!(thread_name(Answer::Unanswered, "More potatoes"), "Unanswered | More potatoes");
        let long = thread_name(Answer::Unanswered, &"a".repeat(200));
        assert_eq!(long.chars().count(), MAX_THREAD_NAME);
        assert!(long.ends_with('…'));
    }

    #[test]
    fn test_answered_thread_name() {
        assert_eq!(
            answered_thread_name("Unanswered | More potatoes", Answer::Implemented),
            "Implemented | More potatoes"
        );
        assert_eq!(
            answered_thread_name("Good Idea | Fries | or chips", Answer::Rejected),
            "Rejected | Fries | or chips"
        );
        assert_eq!(
            answered_thread_name("renamed by hand", Answer::Impossible),
            "Impossible | renamed by hand"
        );
    }

    #[test]
    fn test_every_answer_has_a_colour() {
        for answer in Answer::ALL {
            assert!(ANSWER_COLOURS.contains_key(answer.as_str()), "{answer:?}");
        }
        assert_eq!(answer_colour(Answer::Unanswered), SUGGESTION_COLOUR);
    }

    #[test]
    fn test_suggestion_line() {
        let line = suggestion_line(&suggestion("Mashed", 12), "👍", "https://x/1", true);
        assert_eq!(line, "**12** 👍 [Mashed](https://x/1 \"Good Idea\") by <@100>");

        let line = suggestion_line(&suggestion("Mashed", -3), "👍", "https://x/1", false);
        assert_eq!(line, "**-3** 👍 [Mashed](https://x/1 \"Good Idea\")");
    }

    #[test]
    fn test_top_title() {
        assert_eq!(top_title(None, None), "Top suggestions");
        assert_eq!(top_title(Some("spud"), None), "Top suggestions by spud");
        assert_eq!(
            top_title(None, Some(Answer::Rejected)),
            "Top suggestions answered with Rejected"
        );
        assert_eq!(
            top_title(Some("spud"), Some(Answer::Rejected)),
            "Top suggestions by spud & answered with Rejected"
        );
    }
}
