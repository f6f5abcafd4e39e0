//! Ticket routing and lifecycle engine.
//!
//! Resolves a routing rule, provisions the paired ticket/staff channels
//! with a deny-by-default permission model, and drives the open → closed
//! lifecycle through an abstract channel directory. Platform adapters
//! implement [`directory::ChannelDirectory`]; the engine owns ordering,
//! authorization, and error classification.

pub mod directory;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod naming;
pub mod overwrites;
pub mod panel;
pub mod routing;

pub use {
    directory::{
        ChannelDirectory, ChannelHandle, CreateChannelSpec, MessageRef, OutgoingMessage,
        SelectMenuSpec, SelectOptionSpec,
    },
    error::{Error, Result},
    id::TicketId,
    lifecycle::{
        CloseRequest, EngineOptions, EventOutcome, OpenRequest, Requester, TicketEngine,
        TicketEvent, TicketReceipt,
    },
    routing::{Route, RoutingTable},
};
