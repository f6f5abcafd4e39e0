//! Routing table: maps a panel selection key to a label and staff audience.

use {
    serde::Deserialize,
    tracing::{debug, warn},
};

use crate::error::{Error, Result};

/// Label applied to a route descriptor that omits one.
const DEFAULT_ROUTE_LABEL: &str = "Support";
/// Selection key applied to a route descriptor that omits one.
const DEFAULT_ROUTE_KEY: &str = "support";
/// The single route used when no routing table is configured.
const FALLBACK_ROUTE_LABEL: &str = "General Support";
const FALLBACK_ROUTE_KEY: &str = "general";

/// A named mapping from a user-facing selection key to a display label and
/// the staff role responsible for tickets of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub key: String,
    pub label: String,
    pub staff_role_id: String,
}

/// Raw shape of one configured route entry. Missing fields are defaulted
/// per-field rather than rejecting the entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteDescriptor {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    staff_role_id: Option<String>,
}

/// Ordered, validated route list. Never empty.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    /// Build the table from the raw configuration value.
    ///
    /// Absent, unparsable, or structurally invalid configuration degrades to
    /// the single fallback route — never an error at this point; the decode
    /// failure is logged and ticket creation keeps working.
    #[must_use]
    pub fn from_config(raw: Option<&str>, default_staff_role: &str) -> Self {
        let Some(raw) = raw else {
            debug!("no routing table configured, using fallback route");
            return Self::fallback(default_staff_role);
        };
        match Self::parse(raw, default_staff_role) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "falling back to default routing");
                Self::fallback(default_staff_role)
            },
        }
    }

    /// Strictly decode a routing table from JSON.
    ///
    /// Individual entries missing a label, key, or audience are defaulted;
    /// a value that is not a non-empty list is a configuration error.
    pub fn parse(raw: &str, default_staff_role: &str) -> Result<Self> {
        let descriptors: Vec<RouteDescriptor> = serde_json::from_str(raw)
            .map_err(|e| Error::configuration(format!("not a route list: {e}")))?;
        if descriptors.is_empty() {
            return Err(Error::configuration("route list is empty"));
        }

        let mut routes: Vec<Route> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let route = Route {
                key: non_empty(descriptor.value, DEFAULT_ROUTE_KEY),
                label: non_empty(descriptor.label, DEFAULT_ROUTE_LABEL),
                staff_role_id: non_empty(descriptor.staff_role_id, default_staff_role),
            };
            if routes.iter().any(|r| r.key == route.key) {
                warn!(key = %route.key, "duplicate selection key, keeping first route");
                continue;
            }
            routes.push(route);
        }
        Ok(Self { routes })
    }

    /// The table used when no usable configuration exists.
    #[must_use]
    pub fn fallback(default_staff_role: &str) -> Self {
        Self {
            routes: vec![Route {
                key: FALLBACK_ROUTE_KEY.into(),
                label: FALLBACK_ROUTE_LABEL.into(),
                staff_role_id: default_staff_role.into(),
            }],
        }
    }

    /// Look up the route for a selection key.
    ///
    /// `None` means the key is unknown; callers use the global default
    /// audience with no label rather than failing the operation.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.key == key)
    }

    /// Routes in configured order, for building the selection panel.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

fn non_empty(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}
