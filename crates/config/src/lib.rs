//! Configuration surface: one immutable struct loaded from the environment
//! at startup. Missing required values are fatal before the event loop
//! begins; everything else degrades with a warning.

pub mod loader;
pub mod schema;

pub use {
    loader::ConfigError,
    schema::{
        CategoryConfig, DashboardConfig, DashboardCredentials, DiscordConfig, HelpdeskConfig,
        PanelConfig,
    },
};
