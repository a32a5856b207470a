use crate::config::Config;
use crate::errors::Result;
use crate::structs::{Options, Reply};

use db::structs::UserSettings;
use db::{read_only_db_call, writable_db_call, ReadOnlyDb, WriteableDb};
use log::debug;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::id::UserId;

const fn status(on: bool) -> &'static str {
    if on {
        "✅"
    } else {
        "❌"
    }
}

/// Each setting is taken from the command if given, then from what the user
/// stored before, then from the defaults
pub fn resolve_settings(
    user: UserId,
    options: &Options,
    stored: Option<UserSettings>,
    pings_by_default: bool,
) -> UserSettings {
    let pick = |name: &str, previous: Option<bool>, default: bool| {
        options.boolean(name).or(previous).unwrap_or(default)
    };

    UserSettings {
        user,
        board_pings: pick(
            "board-pings",
            stored.map(|s| s.board_pings),
            pings_by_default,
        ),
        level_up_pings: pick(
            "level-up-pings",
            stored.map(|s| s.level_up_pings),
            pings_by_default,
        ),
        weekly_pings: pick(
            "weekly-pings",
            stored.map(|s| s.weekly_pings),
            pings_by_default,
        ),
        autoreactions: pick("autoreactions", stored.map(|s| s.autoreactions), true),
    }
}

pub fn settings_summary(settings: &UserSettings) -> String {
    format!(
        "✅ Updated your settings!\n\n\
        Board Pings: {}\n\
        Level Up Pings: {}\n\
        Weekly Winner Pings: {}\n\
        Autoreactions: {}",
        status(settings.board_pings),
        status(settings.level_up_pings),
        status(settings.weekly_pings),
        status(settings.autoreactions),
    )
}

pub fn settings(
    command: &ApplicationCommandInteraction,
    config: &Config,
    options: &Options,
) -> Result<Reply> {
    let user = command.user.id;
    let stored = read_only_db_call(|db| db.get_settings(user))?;
    let settings = resolve_settings(user, options, stored, config.pings_by_default);

    writable_db_call(|db| db.update_settings(&settings))?;
    debug!("{user} updated their settings to {settings:?}");

    Ok(Reply::new(settings_summary(&settings)).ephemeral())
}
