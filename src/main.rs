mod command;
mod config;
mod context;
mod event;
mod handler;
mod helper;
mod llm;
mod logging;
mod persistent_state;
mod plugin;
mod snark;

use serenity::{all::GatewayIntents, Client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = crate::config::Config::load().await?;
    let token = cfg.general.discord_token.clone();
    let pstate = crate::persistent_state::PersistentState::load().await?;
    log_internal!("Settings stored at `{}`", pstate.path().to_string_lossy());
    let handler = handler::Handler::new(cfg, pstate);

    // Things we want discord to tell us about.
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    Client::builder(&token, intents)
        .event_handler(handler)
        .await?
        .start()
        .await
        .map_err(Into::into)
}
