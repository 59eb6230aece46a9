//! # cancerboard
//!
//! `cancerboard` is a client-side dashboard for the twitchcancer backend. It
//! follows the "chat cancer" of Twitch channels through a topic-based
//! WebSocket feed and a handful of HTTP endpoints, and renders leaderboards
//! and history charts from the latest known values.
//!
//! ## Core Modules
//!
//! - `client`: the feed connection, its lifecycle and reconnect policy.
//! - `transport`: wire messages and the WebSocket session loop.
//! - `model`: topics, payloads, channel records, history points and profiles.
//! - `store`: the latest value of every topic, with change observers.
//! - `render`: bar and stacked-area render models, serialized to SVG or text.
//! - `api`: HTTP lookups, the profile cache and single-flight polling.
//! - `persistence`: on-disk profile cache backed by sled.
//! - `dashboard`: wiring of feed, store and renderers for the terminal.
//! - `config`: layered settings.
//! - `utils`: errors and logging.

pub mod api;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod model;
pub mod persistence;
pub mod render;
pub mod store;
pub mod transport;
pub mod utils;
