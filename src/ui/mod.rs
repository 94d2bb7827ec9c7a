//! UI rendering modules for the viewer.
//!
//! - `sidebar`: channel list
//! - `timeline`: message timeline with height observation
//! - `theme`: color schemes and styling utilities

pub mod sidebar;
pub mod theme;
pub mod timeline;
