//! Ticket lifecycle engine: open and close transitions plus panel refresh,
//! dispatched over a tagged inbound event.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::{
    directory::{ChannelDirectory, ChannelHandle, CreateChannelSpec, MessageRef, OutgoingMessage},
    error::{Error, Result},
    id::TicketId,
    naming,
    overwrites::{staff_channel_overwrites, ticket_channel_overwrites},
    panel,
    routing::{Route, RoutingTable},
};

/// Announcement posted in a channel when its ticket is closed.
pub const CLOSE_ANNOUNCEMENT: &str = "\u{1F512} This ticket has been closed by staff.";

/// The identity that asked for a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: String,
    /// Display name, used to derive the channel slug.
    pub username: String,
    /// Full platform tag, used in topics and staff briefings.
    pub tag: String,
}

impl Requester {
    /// Inline mention of this requester.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// An inbound "open ticket" event.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub requester: Requester,
    /// The panel selection key the requester picked.
    pub selection: String,
}

/// An inbound "close ticket" event.
#[derive(Debug, Clone)]
pub struct CloseRequest {
    pub actor_id: String,
    pub channel: ChannelHandle,
    pub channel_name: String,
    /// The route audience for this channel when the caller can recover it.
    /// `None` falls back to the globally configured staff role.
    pub audience_role_id: Option<String>,
}

/// Inbound events, independent of the underlying transport.
#[derive(Debug, Clone)]
pub enum TicketEvent {
    OpenRequested(OpenRequest),
    CloseRequested(CloseRequest),
    PanelRefreshRequested,
}

/// What handling an event produced.
#[derive(Debug, Clone)]
pub enum EventOutcome {
    Opened(TicketReceipt),
    Closed,
    PanelPublished(MessageRef),
}

/// Handed back to the transport so it can acknowledge the requester.
#[derive(Debug, Clone)]
pub struct TicketReceipt {
    pub ticket_id: TicketId,
    pub channel: ChannelHandle,
}

/// Engine construction parameters, resolved once from configuration.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Default staff audience when a route carries none or no route matches.
    pub staff_role_id: String,
    /// Parent category for ticket channels.
    pub ticket_category_id: Option<String>,
    /// Parent category for staff channels; ticket category when unset.
    pub staff_category_id: Option<String>,
    /// Channel the standing panel lives in.
    pub panel_channel_id: String,
    /// Reference to a previously published panel message, if any.
    pub panel_message_id: Option<String>,
}

/// Orchestrates the two-state ticket lifecycle over the channel directory.
///
/// The engine keeps no cross-event ticket registry: each open event is
/// handled independently and to completion.
pub struct TicketEngine {
    directory: Arc<dyn ChannelDirectory>,
    routes: RoutingTable,
    options: EngineOptions,
    /// Canonical panel message reference (std::sync::Mutex because access is
    /// a synchronous clone/store, never held across `.await` points).
    panel_ref: Mutex<Option<MessageRef>>,
}

impl TicketEngine {
    #[must_use]
    pub fn new(
        directory: Arc<dyn ChannelDirectory>,
        routes: RoutingTable,
        options: EngineOptions,
    ) -> Self {
        let panel_ref = options.panel_message_id.as_ref().map(|id| MessageRef {
            channel_id: options.panel_channel_id.clone(),
            message_id: id.clone(),
        });
        Self {
            directory,
            routes,
            options,
            panel_ref: Mutex::new(panel_ref),
        }
    }

    /// Dispatch one inbound event.
    pub async fn handle(&self, event: TicketEvent) -> Result<EventOutcome> {
        match event {
            TicketEvent::OpenRequested(req) => self.open(req).await.map(EventOutcome::Opened),
            TicketEvent::CloseRequested(req) => self.close(req).await.map(|()| EventOutcome::Closed),
            TicketEvent::PanelRefreshRequested => {
                self.refresh_panel().await.map(EventOutcome::PanelPublished)
            },
        }
    }

    /// Open a ticket: provision the channel pair, then send the framing
    /// messages, in that order. A failure aborts the remaining steps; an
    /// already-created channel is not rolled back.
    pub async fn open(&self, req: OpenRequest) -> Result<TicketReceipt> {
        let route = self.routes.resolve(&req.selection).cloned();
        if route.is_none() {
            warn!(
                selection = %req.selection,
                "no route matches selection, using default audience"
            );
        }
        let audience = route
            .as_ref()
            .map_or(self.options.staff_role_id.as_str(), |r| {
                r.staff_role_id.as_str()
            });

        let ticket_id = TicketId::generate();
        let slug = naming::requester_slug(&req.requester.username);

        let ticket_channel = self
            .directory
            .create_channel(CreateChannelSpec {
                name: naming::ticket_channel_name(&slug, &ticket_id),
                parent_id: self.options.ticket_category_id.clone(),
                topic: format!("Help desk ticket for {} ({ticket_id})", req.requester.tag),
                overwrites: ticket_channel_overwrites(&req.requester.id, audience),
            })
            .await
            .map_err(|e| Error::provisioning("ticket channel creation", e))?;

        let staff_parent = self
            .options
            .staff_category_id
            .clone()
            .or_else(|| self.options.ticket_category_id.clone());
        let staff_channel = self
            .directory
            .create_channel(CreateChannelSpec {
                name: naming::staff_channel_name(&ticket_id),
                parent_id: staff_parent,
                topic: format!("Private staff discussion for ticket {ticket_id}"),
                overwrites: staff_channel_overwrites(audience),
            })
            .await
            .map_err(|e| Error::provisioning("staff channel creation", e))?;

        // Both channels exist; only now do the framing messages go out.
        self.directory
            .send_message(&ticket_channel, &welcome_message(&req.requester, route.as_ref()))
            .await
            .map_err(|e| Error::provisioning("welcome message", e))?;
        self.directory
            .send_message(
                &staff_channel,
                &staff_briefing(&ticket_id, &ticket_channel, &req.requester, route.as_ref()),
            )
            .await
            .map_err(|e| Error::provisioning("staff briefing", e))?;

        info!(
            ticket_id = %ticket_id,
            requester = %req.requester.id,
            channel = %ticket_channel.id,
            "ticket opened"
        );
        Ok(TicketReceipt {
            ticket_id,
            channel: ticket_channel,
        })
    }

    /// Close a ticket channel: authorization first, then rename, then the
    /// closure announcement. Denial leaves the channel untouched.
    pub async fn close(&self, req: CloseRequest) -> Result<()> {
        let audience = req
            .audience_role_id
            .as_deref()
            .unwrap_or(&self.options.staff_role_id);
        let authorized = self
            .directory
            .has_role(&req.actor_id, audience)
            .await
            .map_err(|e| Error::provisioning("staff role check", e))?;
        if !authorized {
            info!(
                actor = %req.actor_id,
                channel = %req.channel.id,
                "close denied, actor lacks staff role"
            );
            return Err(Error::Unauthorized);
        }

        self.directory
            .rename_channel(&req.channel, &naming::closed_channel_name(&req.channel_name))
            .await
            .map_err(|e| Error::provisioning("channel rename", e))?;
        self.directory
            .send_message(&req.channel, &OutgoingMessage::text(CLOSE_ANNOUNCEMENT))
            .await
            .map_err(|e| Error::provisioning("closure announcement", e))?;

        info!(actor = %req.actor_id, channel = %req.channel.id, "ticket closed");
        Ok(())
    }

    /// Publish or refresh the standing panel and remember the canonical
    /// message reference.
    pub async fn refresh_panel(&self) -> Result<MessageRef> {
        let existing = self
            .panel_ref
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let channel = ChannelHandle::new(self.options.panel_channel_id.clone());
        let published = panel::publish_or_refresh(
            self.directory.as_ref(),
            &channel,
            &self.routes,
            existing.as_ref(),
        )
        .await?;
        *self.panel_ref.lock().unwrap_or_else(|e| e.into_inner()) = Some(published.clone());
        Ok(published)
    }
}

fn welcome_message(requester: &Requester, route: Option<&Route>) -> OutgoingMessage {
    let mut lines = vec![
        format!("\u{1F44B} Welcome, {}!", requester.mention()),
        "A staff member will be with you shortly.".to_string(),
    ];
    if let Some(route) = route {
        lines.push(format!("**Type:** {}", route.label));
    }
    OutgoingMessage::text(lines.join("\n"))
}

fn staff_briefing(
    ticket_id: &TicketId,
    ticket_channel: &ChannelHandle,
    requester: &Requester,
    route: Option<&Route>,
) -> OutgoingMessage {
    let mut lines = vec![
        format!("\u{1F5C2}\u{FE0F} Staff discussion channel for ticket **{ticket_id}**."),
        format!("Ticket channel: {}", ticket_channel.mention()),
        format!("Opened by: {}", requester.tag),
    ];
    if let Some(route) = route {
        lines.push(format!("**Type:** {}", route.label));
    }
    OutgoingMessage::text(lines.join("\n"))
}
