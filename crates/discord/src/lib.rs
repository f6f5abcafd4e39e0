//! Discord adapter: implements the ticket engine's channel-directory
//! capability with serenity and feeds gateway interactions into the engine.

pub mod bot;
pub mod directory;
pub mod handler;

pub use {directory::SerenityDirectory, handler::TicketHandler};
