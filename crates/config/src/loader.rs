//! Environment loading and validation.
//!
//! Required values are checked together so an operator sees every missing
//! variable at once. Optional values degrade: a malformed optional
//! identifier is warned about and ignored, never fatal.

use {
    secrecy::Secret,
    thiserror::Error,
    tracing::warn,
};

use crate::schema::{
    CategoryConfig, DashboardConfig, DashboardCredentials, DiscordConfig, HelpdeskConfig,
    PanelConfig,
};

const DEFAULT_DASHBOARD_BIND: &str = "127.0.0.1";
const DEFAULT_DASHBOARD_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", names.join(", "))]
    MissingRequired { names: Vec<String> },

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

impl HelpdeskConfig {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name).and_then(|v| {
                let v = v.trim().to_string();
                if v.is_empty() { None } else { Some(v) }
            })
        };

        let required = ["DISCORD_TOKEN", "GUILD_ID", "STAFF_ROLE_ID", "PANEL_CHANNEL_ID"];
        let missing: Vec<String> = required
            .iter()
            .copied()
            .filter(|&name| get(name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingRequired { names: missing });
        }

        let token = get("DISCORD_TOKEN").unwrap_or_default();
        let guild_id = require_snowflake("GUILD_ID", get("GUILD_ID").unwrap_or_default())?;
        let staff_role_id =
            require_snowflake("STAFF_ROLE_ID", get("STAFF_ROLE_ID").unwrap_or_default())?;
        let panel_channel_id =
            require_snowflake("PANEL_CHANNEL_ID", get("PANEL_CHANNEL_ID").unwrap_or_default())?;

        let port = match get("PORT") {
            None => DEFAULT_DASHBOARD_PORT,
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                reason: format!("{raw:?} is not a port number"),
            })?,
        };

        let username = get("DASHBOARD_USERNAME");
        let password = get("DASHBOARD_PASSWORD");
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(DashboardCredentials {
                username,
                password: Secret::new(password),
            }),
            (None, None) => None,
            _ => {
                warn!(
                    "only one of DASHBOARD_USERNAME / DASHBOARD_PASSWORD is set, \
                     dashboard authentication stays disabled"
                );
                None
            },
        };

        Ok(Self {
            discord: DiscordConfig {
                token: Secret::new(token),
                guild_id,
            },
            staff_role_id,
            panel: PanelConfig {
                channel_id: panel_channel_id,
                message_id: optional_snowflake("PANEL_MESSAGE_ID", get("PANEL_MESSAGE_ID")),
            },
            categories: CategoryConfig {
                ticket: optional_snowflake("TICKET_CATEGORY_ID", get("TICKET_CATEGORY_ID")),
                staff_private: optional_snowflake(
                    "STAFF_PRIVATE_CATEGORY_ID",
                    get("STAFF_PRIVATE_CATEGORY_ID"),
                ),
            },
            routing_json: get("TICKET_ROUTING"),
            dashboard: DashboardConfig {
                bind: get("DASHBOARD_BIND").unwrap_or_else(|| DEFAULT_DASHBOARD_BIND.into()),
                port,
                credentials,
            },
        })
    }
}

fn is_snowflake(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn require_snowflake(name: &'static str, value: String) -> Result<String, ConfigError> {
    if is_snowflake(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: format!("{value:?} is not a numeric identifier"),
        })
    }
}

fn optional_snowflake(name: &str, value: Option<String>) -> Option<String> {
    match value {
        Some(v) if is_snowflake(&v) => Some(v),
        Some(v) => {
            warn!(name, value = %v, "ignoring non-numeric optional identifier");
            None
        },
        None => None,
    }
}
