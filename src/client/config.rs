pub const DEFAULT_RELAY: &str = "ws://127.0.0.1:8000/share";
pub const DEFAULT_SHARE_BASE: &str = "http://127.0.0.1:8000/index.html";

/// Where a client finds its relay and how it builds sharing links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    relay: String,
    share_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            relay: DEFAULT_RELAY.to_string(),
            share_base: DEFAULT_SHARE_BASE.to_string(),
        }
    }

    pub fn relay(self, relay: impl Into<String>) -> Self {
        Self {
            relay: relay.into(),
            ..self
        }
    }

    pub fn share_base(self, share_base: impl Into<String>) -> Self {
        Self {
            share_base: share_base.into(),
            ..self
        }
    }

    pub fn relay_url(&self) -> &str {
        &self.relay
    }

    /// Link observers can use to join session `id`.
    pub fn share_url(&self, id: &str) -> String {
        format!("{}?watching={id}", self.share_base)
    }

    #[cfg(feature = "net")]
    pub fn connector(&self) -> crate::sharing::WsConnector {
        crate::sharing::WsConnector::new(&self.relay)
    }
}

/// Extract the session id from a sharing link.
///
/// Accepts a full link with a `watching` query parameter or a bare id.
pub fn watching_id(locator: &str) -> Option<String> {
    let locator = locator.trim();
    let Some((_, query)) = locator.split_once('?') else {
        if locator.is_empty() || locator.contains('/') {
            return None;
        }
        return Some(locator.to_string());
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, value)| *key == "watching" && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
