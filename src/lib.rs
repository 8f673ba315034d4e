//! customitems - custom item identity, durability and block-state engine.
//!
//! The engine crates do the work; this crate ties them into one facade
//! ([`CustomItems`]) and reads the engine config.

pub mod api;
pub mod config;

pub use api::{BreakResult, CustomItems};
pub use config::EngineConfig;
pub use customitems_assets::LoadReport;
pub use customitems_core as core;
pub use customitems_world as world;
