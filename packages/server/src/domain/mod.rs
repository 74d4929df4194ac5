//! Domain layer: the playback model of a shared watch session.
//!
//! - `value_object`: validated primitives (connection ids, video ids, positions, volume)
//! - `playback`: per-participant state and the transport state machine
//! - `entity`: the participant registry of the session
//! - `repository` / `message_pusher` / `catalog`: ports implemented by the infrastructure layer

pub mod catalog;
pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod playback;
pub mod repository;
pub mod value_object;

pub use catalog::{VideoCatalog, VideoDetails, VideoSummary};
#[cfg(test)]
pub use catalog::MockVideoCatalog;
pub use entity::{Participant, WatchSession, WatchSessionSummary};
pub use error::{
    CatalogError, MessagePushError, RepositoryError, TransitionError, ValidationError,
};
pub use factory::ConnectionIdFactory;
pub use message_pusher::{BroadcastEvent, MessagePusher, OutboundEvent, PusherChannel};
pub use playback::{ParticipantState, PlaybackCommand, TransportState};
pub use repository::{ParticipantRepository, StateMutator};
pub use value_object::{
    ConnectionId, PlaybackPosition, SearchQuery, Timestamp, VideoId, Volume,
};
