//! Card system: definitions, catalog, and runtime instances.
//!
//! ## Key Types
//!
//! - `CardId` / `CardKind` / `CardDefinition`: static card data
//! - `CardCatalog`: process-wide definition lookup, loaded once
//! - `InstanceId` / `CardInstance`: locally-assigned handles for cards in play

pub mod catalog;
pub mod definition;
pub mod instance;

pub use catalog::CardCatalog;
pub use definition::{CardDefinition, CardId, CardKind};
pub use instance::{CardInstance, InstanceAllocator, InstanceId};
