//! Connectivity state for a tenant session.

use tracing::{info, warn};

/// Whether writes target the remote store or only the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityMode {
    Online,
    Offline,
}

/// The current tenant and connectivity mode.
///
/// Two states. Online drops to Offline on any unavailable signal from the
/// remote; Offline returns to Online only through an explicit, successful
/// probe or [`reconnect`](crate::sync::SyncCoordinator::reconnect), never
/// implicitly.
#[derive(Debug)]
pub struct Session {
    restaurant_id: String,
    mode: ConnectivityMode,
}

impl Session {
    /// Creates a session for a restaurant, starting Offline until a startup
    /// probe succeeds.
    pub fn new(restaurant_id: impl Into<String>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            mode: ConnectivityMode::Offline,
        }
    }

    pub fn restaurant_id(&self) -> &str {
        &self.restaurant_id
    }

    /// Switches the session to a different restaurant.
    pub fn set_restaurant_id(&mut self, restaurant_id: impl Into<String>) {
        self.restaurant_id = restaurant_id.into();
    }

    pub fn mode(&self) -> ConnectivityMode {
        self.mode
    }

    pub fn is_online(&self) -> bool {
        self.mode == ConnectivityMode::Online
    }

    pub(crate) fn mark_online(&mut self) {
        if self.mode != ConnectivityMode::Online {
            info!(restaurant_id = %self.restaurant_id, "session online");
        }
        self.mode = ConnectivityMode::Online;
    }

    pub(crate) fn mark_offline(&mut self, reason: &str) {
        if self.mode != ConnectivityMode::Offline {
            warn!(
                restaurant_id = %self.restaurant_id,
                reason,
                "remote unavailable; session falling back to offline mode"
            );
        }
        self.mode = ConnectivityMode::Offline;
    }
}
