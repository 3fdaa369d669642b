//! Layout Module
//!
//! Flexbox layout computation for the view tree using Taffy.
//!
//! # Architecture
//!
//! The layout module uses [Taffy](https://github.com/DioxusLabs/taffy) for
//! W3C-compliant flexbox computation. The bridge:
//!
//! 1. Converts each view's `LayoutStyle` → Taffy style
//! 2. Builds a Taffy tree from the visible content views
//! 3. Writes computed frames back into the view tree
//!
//! # Example
//!
//! ```ignore
//! use spark_views::layout::compute_layout;
//!
//! compute_layout(&mut tree, 80, 24)?;
//! ```

mod taffy_bridge;

pub use taffy_bridge::compute_layout;
