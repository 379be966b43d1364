//! Core library for packing named rectangles ("gates") into a compact layout.
//!
//! - Engine: a greedy candidate-point packer. Gates are ordered once, then each is
//!   anchored at the frontier point that keeps the bounding box smallest.
//! - Orderings: area+perimeter, perimeter, or longest side; `Strategy::Auto` tries all three.
//! - Data model is serde-serializable; plain-text and JSON helpers live in `text` and `export`.
//!
//! Quick example:
//! ```
//! use gate_packer_core::{Gate, PackerConfig, pack_gates};
//! # fn main() -> gate_packer_core::Result<()> {
//! let gates = vec![Gate::new("g1", 4, 4), Gate::new("g2", 2, 2)];
//! let layout = pack_gates(gates, PackerConfig::default())?;
//! assert_eq!(layout.placements.len(), 2);
//! println!("efficiency: {:.2}", layout.efficiency());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod text;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `gate_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder, SortStrategy, Strategy};
    pub use crate::error::{GatePackError, Result};
    pub use crate::model::{BoundingBox, Gate, Layout, PackStats, Placement, Rect};
    pub use crate::packer::{Packer, frontier::FrontierPacker};
    pub use crate::pipeline::{PackState, PackingEngine, pack_gates, pack_with_strategy};
    pub use crate::text::{parse_gates, parse_layout, write_gates, write_layout};
}
