//! Infrastructure layer: concrete implementations of the domain ports and
//! the data transfer objects spoken on the wire.

pub mod catalog;
pub mod dto;
pub mod message_pusher;
pub mod repository;
