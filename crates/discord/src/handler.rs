//! Discord event handler: translates gateway interactions into ticket
//! events and maps engine outcomes back to ephemeral replies.

use std::sync::Arc;

use {
    serenity::{
        all::{
            CommandInteraction, ComponentInteraction, ComponentInteractionDataKind, Context,
            CreateCommand, CreateInteractionResponse, CreateInteractionResponseFollowup,
            CreateInteractionResponseMessage, EventHandler, GatewayIntents, GuildId, Interaction,
            Ready,
        },
        async_trait,
    },
    tracing::{error, info, warn},
};

use helpdesk_tickets::{
    Error, EventOutcome, TicketEngine, TicketEvent,
    directory::ChannelHandle,
    lifecycle::{CloseRequest, OpenRequest, Requester},
    panel::PANEL_CUSTOM_ID,
};

/// Name of the guild-scoped close command.
pub const CLOSE_COMMAND: &str = "close";

const CREATE_FAILED_REPLY: &str =
    "\u{274C} Failed to create your ticket. Please try again later or contact an administrator.";
const CLOSE_FAILED_REPLY: &str = "\u{274C} Unable to close this channel. Please try again later.";
const CLOSE_DENIED_REPLY: &str = "Only staff members can close tickets.";
const CLOSE_ACK_REPLY: &str = "Ticket closed.";

/// Handler for Discord gateway events.
pub struct TicketHandler {
    pub guild_id: GuildId,
    pub engine: Arc<TicketEngine>,
}

impl TicketHandler {
    /// Required gateway intents for the bot.
    #[must_use]
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS
    }

    async fn handle_panel_selection(&self, ctx: &Context, component: ComponentInteraction) {
        let ComponentInteractionDataKind::StringSelect { values } = &component.data.kind else {
            return;
        };
        let Some(selection) = values.first() else {
            return;
        };

        let requester = Requester {
            id: component.user.id.to_string(),
            username: component.user.name.clone(),
            tag: component.user.tag(),
        };
        info!(user = %requester.id, selection = %selection, "ticket requested");

        let event = TicketEvent::OpenRequested(OpenRequest {
            requester,
            selection: selection.clone(),
        });
        match self.engine.handle(event).await {
            Ok(EventOutcome::Opened(receipt)) => {
                let ack = format!(
                    "\u{2705} Your ticket has been created: {}",
                    receipt.channel.mention()
                );
                respond_component(ctx, &component, &ack).await;
            },
            Ok(_) => {},
            Err(e) => {
                error!(error = %e, user = %component.user.id, "failed to create ticket");
                respond_component(ctx, &component, CREATE_FAILED_REPLY).await;
            },
        }
    }

    async fn handle_close_command(&self, ctx: &Context, command: CommandInteraction) {
        let channel_name = match command.channel_id.to_channel(&ctx.http).await {
            Ok(channel) => channel.guild().map(|c| c.name),
            Err(e) => {
                warn!(error = %e, channel = %command.channel_id, "unable to resolve channel");
                None
            },
        };
        let Some(channel_name) = channel_name else {
            respond_command(ctx, &command, CLOSE_FAILED_REPLY).await;
            return;
        };

        let event = TicketEvent::CloseRequested(CloseRequest {
            actor_id: command.user.id.to_string(),
            channel: ChannelHandle::new(command.channel_id.to_string()),
            channel_name,
            // Per-route audiences cannot be recovered from a bare channel;
            // the engine falls back to the configured staff role.
            audience_role_id: None,
        });
        match self.engine.handle(event).await {
            Ok(_) => respond_command(ctx, &command, CLOSE_ACK_REPLY).await,
            Err(Error::Unauthorized) => {
                respond_command(ctx, &command, CLOSE_DENIED_REPLY).await;
            },
            Err(e) => {
                error!(error = %e, channel = %command.channel_id, "failed to close ticket");
                respond_command(ctx, &command, CLOSE_FAILED_REPLY).await;
            },
        }
    }
}

#[async_trait]
impl EventHandler for TicketHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord gateway ready"
        );

        let commands = vec![
            CreateCommand::new(CLOSE_COMMAND).description("Close the current ticket channel."),
        ];
        if let Err(e) = self.guild_id.set_commands(&ctx.http, commands).await {
            error!(error = %e, "failed to register guild commands");
        }

        if let Err(e) = self.engine.handle(TicketEvent::PanelRefreshRequested).await {
            error!(error = %e, "failed to publish ticket panel");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Component(component) if component.data.custom_id == PANEL_CUSTOM_ID => {
                self.handle_panel_selection(&ctx, component).await;
            },
            Interaction::Command(command) if command.data.name == CLOSE_COMMAND => {
                self.handle_close_command(&ctx, command).await;
            },
            _ => {},
        }
    }
}

/// Reply ephemerally, falling back to the follow-up path when the initial
/// response slot was already consumed.
async fn respond_component(ctx: &Context, interaction: &ComponentInteraction, content: &str) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    if let Err(e) = interaction.create_response(&ctx.http, response).await {
        warn!(error = %e, "initial reply slot unavailable, sending follow-up");
        let followup = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        if let Err(e) = interaction.create_followup(&ctx.http, followup).await {
            error!(error = %e, "failed to deliver interaction reply");
        }
    }
}

async fn respond_command(ctx: &Context, interaction: &CommandInteraction, content: &str) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    if let Err(e) = interaction.create_response(&ctx.http, response).await {
        warn!(error = %e, "initial reply slot unavailable, sending follow-up");
        let followup = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        if let Err(e) = interaction.create_followup(&ctx.http, followup).await {
            error!(error = %e, "failed to deliver interaction reply");
        }
    }
}
