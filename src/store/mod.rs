//! The `store` module keeps the latest value of every topic for rendering.
//!
//! - `TopicSlot`: value and observers of one topic.
//! - `ViewModelStore`: the topic map, with `update`/`get`/`clear`/`watch`.
//! - `bind`: connects a feed `Connection` to a shared store.

pub mod slot;
pub mod view_model;

pub use slot::{TopicSlot, TopicValue};
pub use view_model::{SharedStore, ViewModelStore, bind};
