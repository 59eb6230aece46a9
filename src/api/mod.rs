//! The `api` module covers one-shot HTTP lookups.
//!
//! - `http`: typed calls to `/history`, `/live`, `/leaderboards` and the
//!   Twitch channels API.
//! - `profile`: the channel profile cache and service.
//! - `poll`: single-flight polling into the view model store.

pub mod http;
pub mod poll;
pub mod profile;

pub use http::ApiClient;
pub use poll::{SingleFlight, poll_once, spawn_poller};
pub use profile::{ProfileCache, ProfileService, ProfileSource};
