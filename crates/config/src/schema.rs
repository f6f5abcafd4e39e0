use secrecy::Secret;

/// Root configuration, constructed once at startup and passed by reference
/// into every component. Nothing reads the environment after loading.
#[derive(Clone)]
pub struct HelpdeskConfig {
    pub discord: DiscordConfig,
    /// Default staff audience: used for routes without their own role and
    /// as the close-authorization fallback.
    pub staff_role_id: String,
    pub panel: PanelConfig,
    pub categories: CategoryConfig,
    /// Raw routing-table JSON, decoded by the ticket engine.
    pub routing_json: Option<String>,
    pub dashboard: DashboardConfig,
}

impl std::fmt::Debug for HelpdeskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpdeskConfig")
            .field("discord", &self.discord)
            .field("staff_role_id", &self.staff_role_id)
            .field("panel", &self.panel)
            .field("categories", &self.categories)
            .field("dashboard", &self.dashboard)
            .finish_non_exhaustive()
    }
}

/// Gateway credential and community identity.
#[derive(Clone)]
pub struct DiscordConfig {
    pub token: Secret<String>,
    pub guild_id: String,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[REDACTED]")
            .field("guild_id", &self.guild_id)
            .finish()
    }
}

/// Where the standing panel lives and, when known, its current message.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub channel_id: String,
    pub message_id: Option<String>,
}

/// Parent categories for provisioned channels.
#[derive(Debug, Clone, Default)]
pub struct CategoryConfig {
    pub ticket: Option<String>,
    /// Staff channels land here; falls back to `ticket` when unset.
    pub staff_private: Option<String>,
}

/// Dashboard server settings.
#[derive(Clone)]
pub struct DashboardConfig {
    pub bind: String,
    pub port: u16,
    /// Present only when both a username and a password are configured.
    pub credentials: Option<DashboardCredentials>,
}

impl std::fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("credentials", &self.credentials.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// HTTP Basic credentials for the dashboard.
#[derive(Clone)]
pub struct DashboardCredentials {
    pub username: String,
    pub password: Secret<String>,
}
