//! traq-view library.
//!
//! The entity store, height observers and supporting pieces are exposed for
//! testing and reuse; `app` and `ui` hold the egui front end.

pub mod app;
pub mod config;
pub mod embeds;
pub mod entities;
pub mod ids;
pub mod logging;
pub mod observer;
pub mod resize;
pub mod route;
pub mod scroll;
pub mod signal;
pub mod snapshot;
pub mod store;
pub mod ui;
