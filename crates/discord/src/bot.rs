//! Gateway client construction and run loop.

use std::sync::Arc;

use {
    anyhow::{Context as _, Result},
    secrecy::ExposeSecret,
    serenity::{Client, all::GuildId},
    tracing::info,
};

use {helpdesk_config::HelpdeskConfig, helpdesk_tickets::TicketEngine};

use crate::handler::TicketHandler;

/// Connect to the gateway and run until the connection ends.
pub async fn run(config: &HelpdeskConfig, engine: Arc<TicketEngine>) -> Result<()> {
    let guild_id: u64 = config
        .discord
        .guild_id
        .parse()
        .context("guild id must be numeric")?;
    anyhow::ensure!(guild_id != 0, "guild id must be non-zero");
    let handler = TicketHandler {
        guild_id: GuildId::new(guild_id),
        engine,
    };

    let mut client = Client::builder(config.discord.token.expose_secret(), TicketHandler::intents())
        .event_handler(handler)
        .await
        .context("failed to build gateway client")?;

    info!("starting discord gateway client");
    client.start().await.context("gateway client stopped")?;
    Ok(())
}
