//! Configuration and constants
//!
//! - [`defaults`] - Built-in values for labels, images and timings
//! - [`urls`] - Remote archive locations
//! - [`settings`] - The optional `solfactory.toml` file

pub mod defaults;
pub mod settings;
pub mod urls;

pub use settings::FactoryConfig;
