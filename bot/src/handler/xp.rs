use crate::config::Config;
use crate::errors::{Error, Result};
use crate::structs::level::level_for_xp;

use chrono::{DateTime, Duration, Utc};
use db::structs::XpChange;
use db::{read_only_db_call, writable_db_call, ReadOnlyDb, WriteableDb};
use log::{debug, info};
use rand::Rng;
use serenity::model::channel::Message;
use serenity::model::id::UserId;
use serenity::prelude::Context;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::RwLock;

static GAIN_CACHE: RwLock<BTreeMap<u64, DateTime<Utc>>> = RwLock::new(BTreeMap::new());

const XP_PER_MESSAGE: RangeInclusive<u64> = 15..=25;

/// True if `id` gained XP less than `cooldown` before `now`
fn check_cache(
    cache: &RwLock<BTreeMap<u64, DateTime<Utc>>>,
    id: u64,
    cooldown: Duration,
    now: DateTime<Utc>,
) -> Result<bool> {
    match cache.read() {
        Ok(cache) => Ok(cache
            .get(&id)
            .map_or(false, |last_gain| now.signed_duration_since(*last_gain) < cooldown)),
        Err(_why) => Err(Error::ConstStr("Failed to acquire read on cache")),
    }
}

fn update_cache(
    cache: &RwLock<BTreeMap<u64, DateTime<Utc>>>,
    id: u64,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    match cache.write() {
        Ok(mut writable_cache) => Ok(writable_cache.insert(id, now)),
        Err(_why) => Err(Error::ConstStr("Failed to acquire write lock on cache")),
    }
}

/// The level reached by an XP change, if it crossed into a new one
pub const fn level_up(change: XpChange) -> Option<u64> {
    let before = level_for_xp(change.before);
    let after = level_for_xp(change.after);
    if after > before {
        Some(after)
    } else {
        None
    }
}

pub fn level_up_message(user: &str, level: u64) -> String {
    format!("🎉 {user} leveled up to level **{level}**!")
}

/// Grants XP to `user` unless they are still on cooldown. Returns the new
/// level on a level up.
pub fn grant(config: &Config, user: u64, now: DateTime<Utc>) -> Result<Option<u64>> {
    let cooldown = Duration::from_std(config.xp_cooldown)
        .map_err(|why| Error::Internal(format!("xp cooldown out of range: {why}")))?;
    if check_cache(&GAIN_CACHE, user, cooldown, now)? {
        return Ok(None);
    }

    let amount = rand::thread_rng().gen_range(XP_PER_MESSAGE);
    let change = writable_db_call(|mut db| db.add_xp(UserId(user), amount, now))?;
    update_cache(&GAIN_CACHE, user, now)?;
    debug!("{user} gained {amount} xp, now at {}", change.after);

    Ok(level_up(change))
}

pub async fn award(ctx: &Context, config: &Config, msg: &Message) -> Result<()> {
    let level = match grant(config, *msg.author.id.as_u64(), Utc::now())? {
        Some(level) => level,
        None => return Ok(()),
    };

    let pings = read_only_db_call(|db| db.get_settings(msg.author.id))?
        .map_or(config.pings_by_default, |settings| settings.level_up_pings);
    let user = if pings {
        format!("<@{}>", msg.author.id)
    } else {
        msg.author.name.clone()
    };

    info!("{} reached level {level}", msg.author.id);
    msg.channel_id
        .say(&ctx.http, level_up_message(&user, level))
        .await?;
    Ok(())
}
