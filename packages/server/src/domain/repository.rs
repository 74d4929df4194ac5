//! Repository trait definitions.
//!
//! The domain declares the data access it needs; the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use super::{
    ConnectionId, Participant, ParticipantState, RepositoryError, Timestamp, TransitionError,
    WatchSessionSummary,
};

/// State mutation handed to [`ParticipantRepository::update`].
pub type StateMutator =
    Box<dyn FnOnce(&mut ParticipantState) -> Result<(), TransitionError> + Send>;

/// Connection registry.
///
/// Each call is atomic with respect to the entry it touches. Broadcasting is
/// the caller's responsibility.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Register a new connection with default playback state.
    async fn register(
        &self,
        id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<ParticipantState, RepositoryError>;

    /// Get the current state of a connection.
    async fn get(&self, id: &ConnectionId) -> Result<ParticipantState, RepositoryError>;

    /// Mutate the state of a connection and return the updated state.
    ///
    /// Unknown ids return `ParticipantNotFound` and never create an entry.
    async fn update(
        &self,
        id: &ConnectionId,
        mutator: StateMutator,
    ) -> Result<ParticipantState, RepositoryError>;

    /// Remove a connection. Removing an unknown id is not an error.
    async fn remove(&self, id: &ConnectionId) -> Result<(), RepositoryError>;

    /// All participants, in registration order.
    async fn list_all(&self) -> Vec<Participant>;

    /// Ids of all registered connections, in registration order.
    async fn connection_ids(&self) -> Vec<ConnectionId>;

    async fn count(&self) -> usize;

    async fn summary(&self) -> WatchSessionSummary;
}
