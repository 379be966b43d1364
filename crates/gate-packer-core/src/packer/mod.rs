use crate::model::Placement;

pub mod frontier;

/// A packer places gates into a layout whose bounding box grows as needed.
///
/// Implementations must ensure no overlaps and keep every placement inside the
/// reported bounding box. `pack` returns `None` when no position admits the gate.
pub trait Packer {
    fn can_pack(&self, width: u32, height: u32) -> bool;
    fn pack(&mut self, name: &str, width: u32, height: u32) -> Option<Placement>;
}
