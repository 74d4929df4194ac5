//! UseCase layer: application operations over the domain ports.
//!
//! Each use case holds `Arc<dyn Trait>` handles to the ports it needs and is
//! shared by the UI layer through `AppState`.

pub mod apply_command;
pub mod broadcast_state;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod list_participants;
pub mod lookup_video;
pub mod search_videos;

pub use apply_command::ApplyCommandUseCase;
pub use broadcast_state::BroadcastStateUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ApplyCommandError, ConnectError, LookupVideoError, SearchVideosError};
pub use list_participants::ListParticipantsUseCase;
pub use lookup_video::LookupVideoUseCase;
pub use search_videos::SearchVideosUseCase;
