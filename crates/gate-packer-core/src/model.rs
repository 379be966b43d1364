use crate::config::SortStrategy;
use crate::error::{GatePackError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Axis-aligned rectangle in layout units. `x,y` is the bottom-left corner; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn x2(&self) -> u64 {
        self.x as u64 + self.w as u64
    }
    /// Exclusive top edge (`y + h`).
    pub fn y2(&self) -> u64 {
        self.y as u64 + self.h as u64
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// True when the interiors intersect. Rectangles sharing only an edge or a corner do not.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x2() <= other.x as u64
            || self.x as u64 >= other.x2()
            || self.y2() <= other.y as u64
            || self.y as u64 >= other.y2())
    }
}

/// A named rectangle to be packed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gate {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Gate {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Committed position of one gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// The occupied region of this placement.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True if `r` lies within `[0, width] x [0, height]`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x2() <= self.width as u64 && r.y2() <= self.height as u64
    }
}

/// A finished packing: every input gate placed inside `bounding_box`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    /// Ordering that produced this layout. `None` for layouts read back from text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<SortStrategy>,
    pub bounding_box: BoundingBox,
    /// Placements in the order they were committed.
    pub placements: Vec<Placement>,
}

impl Layout {
    /// Total gate area over bounding-box area; `0.0` for an empty box.
    pub fn efficiency(&self) -> f64 {
        let bounding_area = self.bounding_box.area();
        if bounding_area == 0 {
            return 0.0;
        }
        self.used_area() as f64 / bounding_area as f64
    }

    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect().area()).sum()
    }

    pub fn stats(&self) -> PackStats {
        let bounding_area = self.bounding_box.area();
        let used_area = self.used_area();
        PackStats {
            num_gates: self.placements.len(),
            bounding_width: self.bounding_box.width,
            bounding_height: self.bounding_box.height,
            bounding_area,
            used_area,
            efficiency: self.efficiency(),
        }
    }

    /// Checks this layout against the gates it was built from.
    ///
    /// Fails on overlapping placements, placements outside the bounding box,
    /// missing/extra/duplicate names, or dimensions that differ from the input.
    pub fn verify(&self, gates: &[Gate]) -> Result<()> {
        let mut by_name: HashMap<&str, &Gate> = HashMap::with_capacity(gates.len());
        for g in gates {
            if by_name.insert(g.name.as_str(), g).is_some() {
                return Err(GatePackError::InvalidLayout(format!(
                    "duplicate gate name in input: {}",
                    g.name
                )));
            }
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.placements.len());
        for p in &self.placements {
            let gate = by_name.get(p.name.as_str()).ok_or_else(|| {
                GatePackError::InvalidLayout(format!("placement for unknown gate: {}", p.name))
            })?;
            if !seen.insert(p.name.as_str()) {
                return Err(GatePackError::InvalidLayout(format!(
                    "gate placed more than once: {}",
                    p.name
                )));
            }
            if gate.width != p.width || gate.height != p.height {
                return Err(GatePackError::InvalidLayout(format!(
                    "gate {} is {}x{} but was placed as {}x{}",
                    p.name, gate.width, gate.height, p.width, p.height
                )));
            }
            if !self.bounding_box.contains(&p.rect()) {
                return Err(GatePackError::InvalidLayout(format!(
                    "gate {} at ({}, {}) exceeds bounding box {}x{}",
                    p.name, p.x, p.y, self.bounding_box.width, self.bounding_box.height
                )));
            }
        }
        if let Some(missing) = gates.iter().find(|g| !seen.contains(g.name.as_str())) {
            return Err(GatePackError::InvalidLayout(format!(
                "gate was not placed: {}",
                missing.name
            )));
        }

        for i in 0..self.placements.len() {
            for j in (i + 1)..self.placements.len() {
                let a = &self.placements[i];
                let b = &self.placements[j];
                if a.rect().overlaps(&b.rect()) {
                    return Err(GatePackError::InvalidLayout(format!(
                        "gates {} and {} overlap",
                        a.name, b.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Statistics about packing density.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub num_gates: usize,
    pub bounding_width: u32,
    pub bounding_height: u32,
    /// Bounding-box width * height.
    pub bounding_area: u64,
    /// Sum of gate width * height.
    pub used_area: u64,
    /// used_area / bounding_area (0.0 to 1.0), 0.0 for an empty box.
    pub efficiency: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Gates: {}, Bounding box: {}x{}, Efficiency: {:.2}%, Used Area: {}, Wasted Area: {}",
            self.num_gates,
            self.bounding_width,
            self.bounding_height,
            self.efficiency * 100.0,
            self.used_area,
            self.wasted_area(),
        )
    }

    pub fn wasted_area(&self) -> u64 {
        self.bounding_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.bounding_area > 0 {
            (self.wasted_area() as f64 / self.bounding_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
