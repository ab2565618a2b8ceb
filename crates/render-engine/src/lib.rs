//! fgradient Render Engine
//!
//! Rebuilds the live preview by hand at export resolution and turns it
//! into PNG bytes for a file or the clipboard.
//!
//! # Pipeline Architecture
//!
//! ```text
//! GradientConfig ──► geometry (axis + stops)
//!                          │
//! SizingConfig ──► scale ──┤
//!                          ▼
//!                    compositor
//!                    1. rounded-rect clip
//!                    2. linear gradient
//! ImageAsset ──decode──► 3. fitted image
//!                    4. watermark pill
//!                          │
//!                          ▼
//!                   ExportArtifact ──► PNG ──┬──► gradient-image-<ms>.png
//!                                            └──► clipboard
//! ```
//!
//! Every size constant shared with the on-screen preview lives in
//! [`layout`]; [`preview`] derives the preview styling from the same
//! values so the two renderings cannot drift apart.

pub mod compositor;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod preview;
pub mod watermark;

pub use export::*;
