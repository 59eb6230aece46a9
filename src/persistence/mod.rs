//! The `persistence` module keeps fetched channel profiles on disk so a
//! restarted dashboard does not refetch them.
//!
//! It uses `sled` as an embedded key-value store.

pub mod sled_store;

pub use sled_store::{ProfileStore, StoredProfile};
