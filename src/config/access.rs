//! Access policy configuration

use serde::Deserialize;

use crate::domain::entitlement::FreeContentPolicy;

/// Access resolution settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessConfig {
    /// Whether anonymous callers may see non-premium content
    #[serde(default)]
    pub free_content_policy: FreeContentPolicy,
}
