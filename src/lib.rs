// Crate root library declaration and module exports.
pub mod client;
pub mod color_utils;
pub mod config;
pub mod context;
pub mod controller;
pub mod field_info;
pub mod flash;
pub mod logging;
pub mod model;
pub mod overlay;
pub mod tags;

#[cfg(feature = "tui")]
pub mod tui;
