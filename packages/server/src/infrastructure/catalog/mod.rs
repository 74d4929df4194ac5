//! VideoCatalog implementations.

pub mod youtube;

pub use youtube::YouTubeCatalog;
