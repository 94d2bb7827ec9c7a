//! Application module structure for ViewerApp
//!
//! - `core`: ViewerApp struct, initialization and snapshot reloads
//! - `update`: main update loop, panels and global shortcuts

pub mod core;
pub mod update;

pub use core::ViewerApp;
