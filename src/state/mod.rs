//! Project persistence: record schema and the keyed JSON store.

pub mod project;
pub mod store;

pub use project::{ProjectData, ProjectRecord, SCHEMA_VERSION};
pub use store::ProjectStore;
