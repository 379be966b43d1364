//! Plain-text gate lists and layouts.
//!
//! Gate list: one `name width height` per line. Blank lines and `#` comments are skipped.
//! Layout: a `bounding_box <w> <h>` header followed by one `name x y` line per placement.

use crate::error::{GatePackError, Result};
use crate::model::{BoundingBox, Gate, Layout, Placement};
use std::collections::HashMap;
use std::fmt::Write;

/// Parses a gate list. Fails on the first malformed line.
pub fn parse_gates(input: &str) -> Result<Vec<Gate>> {
    let mut gates = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let Some(fields) = split_fields(raw) else {
            continue;
        };
        let [name, w, h] = fields.as_slice() else {
            return Err(parse_err(
                line,
                format!("expected `name width height`, found {} field(s)", fields.len()),
            ));
        };
        gates.push(Gate {
            name: (*name).to_string(),
            width: parse_dim(line, "width", w)?,
            height: parse_dim(line, "height", h)?,
        });
    }
    Ok(gates)
}

/// Formats gates in the list format accepted by [`parse_gates`].
pub fn write_gates(gates: &[Gate]) -> String {
    let mut out = String::new();
    for g in gates {
        let _ = writeln!(out, "{} {} {}", g.name, g.width, g.height);
    }
    out
}

/// Formats a layout: the bounding box, then placements in commit order.
pub fn write_layout(layout: &Layout) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "bounding_box {} {}",
        layout.bounding_box.width, layout.bounding_box.height
    );
    for p in &layout.placements {
        let _ = writeln!(out, "{} {} {}", p.name, p.x, p.y);
    }
    out
}

/// Reads a layout written by [`write_layout`], recovering sizes from `gates` by name.
pub fn parse_layout(input: &str, gates: &[Gate]) -> Result<Layout> {
    let sizes: HashMap<&str, (u32, u32)> = gates
        .iter()
        .map(|g| (g.name.as_str(), (g.width, g.height)))
        .collect();
    let mut bounding_box: Option<BoundingBox> = None;
    let mut placements = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let Some(fields) = split_fields(raw) else {
            continue;
        };
        let [name, a, b] = fields.as_slice() else {
            return Err(parse_err(
                line,
                format!("expected 3 fields, found {}", fields.len()),
            ));
        };
        match bounding_box {
            None => {
                if *name != "bounding_box" {
                    return Err(parse_err(line, "layout must start with `bounding_box`"));
                }
                bounding_box = Some(BoundingBox::new(
                    parse_coord(line, "width", a)?,
                    parse_coord(line, "height", b)?,
                ));
            }
            Some(_) => {
                let (width, height) = *sizes
                    .get(name)
                    .ok_or_else(|| parse_err(line, format!("unknown gate '{}'", name)))?;
                placements.push(Placement {
                    name: (*name).to_string(),
                    x: parse_coord(line, "x", a)?,
                    y: parse_coord(line, "y", b)?,
                    width,
                    height,
                });
            }
        }
    }

    let bounding_box =
        bounding_box.ok_or_else(|| parse_err(1, "missing `bounding_box` header"))?;
    Ok(Layout {
        strategy: None,
        bounding_box,
        placements,
    })
}

// None for blank lines and comments.
fn split_fields(raw: &str) -> Option<Vec<&str>> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line.split_whitespace().collect())
}

fn parse_dim(line: usize, what: &str, s: &str) -> Result<u32> {
    let v = parse_coord(line, what, s)?;
    if v == 0 {
        return Err(parse_err(line, format!("{} must be positive", what)));
    }
    Ok(v)
}

fn parse_coord(line: usize, what: &str, s: &str) -> Result<u32> {
    s.parse::<u32>()
        .map_err(|e| parse_err(line, format!("invalid {} '{}': {}", what, s, e)))
}

fn parse_err(line: usize, message: impl Into<String>) -> GatePackError {
    GatePackError::Parse {
        line,
        message: message.into(),
    }
}
