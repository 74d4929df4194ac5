//! Factories for server-assigned identifiers.

use uuid::Uuid;

use super::value_object::ConnectionId;

/// Generates identities for new connections.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a fresh connection id (UUID v4).
    pub fn generate() -> ConnectionId {
        // a hyphenated UUID is never blank
        ConnectionId(Uuid::new_v4().to_string())
    }
}
