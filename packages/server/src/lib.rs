//! cowatch server library.
//!
//! Keeps one playback state per connected participant, applies the commands
//! each participant sends over its WebSocket, and broadcasts every resulting
//! state change to all participants. Participant lists and video metadata are
//! served over plain HTTP.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
