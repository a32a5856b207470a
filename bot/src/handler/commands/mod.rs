mod settings;
mod suggestions;
mod xp;

use crate::config::Config;
use crate::errors::Result;
use crate::structs::options::subcommand;
use crate::structs::{Options, Reply};

use db::structs::Answer;
use log::{info, warn};
use serenity::builder::CreateApplicationCommandOption;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::id::GuildId;
use serenity::prelude::*;

const FAILURE: &str = "Something went wrong";

fn answer_option(option: &mut CreateApplicationCommandOption) -> &mut CreateApplicationCommandOption {
    for answer in Answer::ALL {
        option.add_string_choice(answer.as_str(), answer.as_str());
    }
    option
}

fn page_option(option: &mut CreateApplicationCommandOption) -> &mut CreateApplicationCommandOption {
    option
        .name("page")
        .description("Page to show")
        .kind(CommandOptionType::Integer)
}

/// Registers every slash command in `guild`, replacing what was there
pub async fn register(ctx: &Context, guild: GuildId) -> Result<()> {
    let commands = guild
        .set_application_commands(&ctx.http, |commands| {
            commands
                .create_application_command(|command| {
                    command
                        .name("xp")
                        .description("Commands to view users' XP amounts")
                        .create_option(|rank| {
                            rank.name("rank")
                                .description("View a user's XP rank")
                                .kind(CommandOptionType::SubCommand)
                                .create_sub_option(|user| {
                                    user.name("user")
                                        .description("User to view (defaults to you)")
                                        .kind(CommandOptionType::User)
                                })
                        })
                        .create_option(|top| {
                            top.name("top")
                                .description("View the users with the most XP in the server")
                                .kind(CommandOptionType::SubCommand)
                                .create_sub_option(page_option)
                        })
                })
                .create_application_command(|command| {
                    command
                        .name("get-top-suggestions")
                        .description("Get the top suggestions")
                        .create_option(|answer| {
                            answer_option(
                                answer
                                    .name("answer")
                                    .description("Only get suggestions with a certain answer")
                                    .kind(CommandOptionType::String),
                            )
                        })
                        .create_option(|user| {
                            user.name("user")
                                .description("Only get suggestions by a certain user")
                                .kind(CommandOptionType::User)
                        })
                        .create_option(page_option)
                })
                .create_application_command(|command| {
                    command
                        .name("suggest")
                        .description("Commands to make and manage suggestions")
                        .create_option(|create| {
                            create
                                .name("create")
                                .description("Make a suggestion")
                                .kind(CommandOptionType::SubCommand)
                                .create_sub_option(|title| {
                                    title
                                        .name("title")
                                        .description("A short summary of the suggestion")
                                        .kind(CommandOptionType::String)
                                        .required(true)
                                })
                                .create_sub_option(|description| {
                                    description
                                        .name("description")
                                        .description("A detailed description of the suggestion")
                                        .kind(CommandOptionType::String)
                                        .required(true)
                                })
                        })
                        .create_option(|answer| {
                            answer
                                .name("answer")
                                .description("Answer a suggestion")
                                .kind(CommandOptionType::SubCommand)
                                .create_sub_option(|option| {
                                    answer_option(
                                        option
                                            .name("answer")
                                            .description("The answer to the suggestion")
                                            .kind(CommandOptionType::String)
                                            .required(true),
                                    )
                                })
                        })
                        .create_option(|edit| {
                            edit.name("edit")
                                .description("Edit your suggestion")
                                .kind(CommandOptionType::SubCommand)
                                .create_sub_option(|description| {
                                    description
                                        .name("description")
                                        .description("The new description of the suggestion")
                                        .kind(CommandOptionType::String)
                                        .required(true)
                                })
                        })
                })
                .create_application_command(|command| {
                    command
                        .name("settings")
                        .description("Customize personal settings")
                        .create_option(|option| {
                            option
                                .name("board-pings")
                                .description("Whether to ping you when your messages get on the board")
                                .kind(CommandOptionType::Boolean)
                        })
                        .create_option(|option| {
                            option
                                .name("level-up-pings")
                                .description("Whether to ping you when you level up")
                                .kind(CommandOptionType::Boolean)
                        })
                        .create_option(|option| {
                            option
                                .name("weekly-pings")
                                .description("Whether to ping you if you are one of the most active people each week")
                                .kind(CommandOptionType::Boolean)
                        })
                        .create_option(|option| {
                            option
                                .name("autoreactions")
                                .description("Whether to automatically react to your messages")
                                .kind(CommandOptionType::Boolean)
                        })
                })
        })
        .await?;

    info!("registered {} commands in {guild}", commands.len());
    Ok(())
}

async fn run(ctx: &Context, command: &ApplicationCommandInteraction, config: &Config) -> Result<Reply> {
    let options = command.data.options.as_slice();
    match command.data.name.as_str() {
        "xp" => match subcommand(options) {
            Some(("rank", args)) => xp::rank(command, &args),
            Some(("top", args)) => xp::top(&args),
            _ => Ok(Reply::new_const("Unrecognized command").ephemeral()),
        },
        "suggest" => match subcommand(options) {
            Some(("create", args)) => suggestions::create(ctx, command, config, &args).await,
            Some(("answer", args)) => suggestions::answer(ctx, command, config, &args).await,
            Some(("edit", args)) => suggestions::edit(ctx, command, config, &args).await,
            _ => Ok(Reply::new_const("Unrecognized command").ephemeral()),
        },
        "get-top-suggestions" => suggestions::top(command, config, &Options::from(options)),
        "settings" => settings::settings(command, config, &Options::from(options)),
        _ => Ok(Reply::new_const("Unrecognized command").ephemeral()),
    }
}

/// Runs a slash command and answers it. Failed commands still get an
/// ephemeral reply before the error is passed on.
pub async fn handle(ctx: &Context, command: &ApplicationCommandInteraction, config: &Config) -> Result<()> {
    match run(ctx, command, config).await {
        Ok(reply) => reply.send(ctx, command).await,
        Err(why) => {
            warn!("Failed to process command {} with err: {why}", command.data.name);
            if let Err(reply_err) = Reply::new_const(FAILURE).ephemeral().send(ctx, command).await {
                warn!("Failed to report failure of {}: {reply_err}", command.data.name);
            }
            Err(why)
        }
    }
}
