//! Zone system: ordered card containers and their tags.

pub mod zone;

pub use zone::{Zone, ZoneTag};
