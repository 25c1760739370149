//! Start page dashboard library
//!
//! A caching proxy for quotes, weather and background images, plus the
//! dashboard model that renders them. The binary wires these together; the
//! modules are public for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod server;
pub mod upstream;
