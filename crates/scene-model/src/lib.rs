//! fgradient Scene Model
//!
//! Defines the value types that make up one render "scene":
//! - **Gradient:** three hex color stops plus a preset or custom direction
//! - **Sizing:** clamped canvas dimensions, aspect lock, and corner radius
//! - **Image:** the uploaded image asset and the upload acceptance policy
//! - **Preferences:** persisted sizing record with silent fallback
//!
//! Every type here is a plain value. A [`Scene`] is cloned into each render
//! so that edits made while an export is running only affect the next one.

pub mod asset;
pub mod color;
pub mod gradient;
pub mod preferences;
pub mod scene;
pub mod sizing;

pub use asset::*;
pub use color::*;
pub use gradient::*;
pub use preferences::*;
pub use scene::*;
pub use sizing::*;
