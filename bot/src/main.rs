#![warn(
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::option_if_let_else
)]

mod config;
mod errors;
mod handler;
mod structs;

use log::LevelFilter;
use log::{error, info};
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use simple_logger::SimpleLogger;

use std::process;
use std::sync::Arc;

use config::Config;
use handler::Handler;

fn migrate_db() {
    match db::migrate() {
        Ok(_) => info!("sucessfully loaded and migrated db"),
        Err(why) => {
            error!("Failed to migrate, exiting {why:?}");
            process::exit(-1);
        }
    };
}

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(why) => {
            error!("Failed to load config, exiting: {why}");
            process::exit(-1);
        }
    }
}

#[tokio::main]
async fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("bot", LevelFilter::Debug)
        .with_module_level("db", LevelFilter::Debug)
        .with_utc_timestamps()
        .init()
        .unwrap();

    let config = Arc::new(load_config());
    db::set_path(&config.database_path);
    migrate_db();

    let intents = GatewayIntents::GUILDS
        .union(GatewayIntents::GUILD_MEMBERS)
        .union(GatewayIntents::GUILD_MESSAGES)
        .union(GatewayIntents::GUILD_MESSAGE_REACTIONS)
        .union(GatewayIntents::MESSAGE_CONTENT);

    let mut client = Client::builder(&config.token, intents)
        .event_handler(Handler::new(Arc::clone(&config)))
        .await
        .expect("Err creating client");

    // Shards will automatically attempt to reconnect, and will perform
    // exponential backoff until it reconnects.
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
