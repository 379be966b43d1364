use crate::model::Layout;
use serde_json::{Value, json};

/// Serialize a layout as `{ bounding_box, strategy, efficiency, placements }`.
/// Placements keep commit order and carry their sizes, so no join with the input is needed.
pub fn to_json(layout: &Layout) -> Value {
    let placements: Vec<Value> = layout
        .placements
        .iter()
        .map(|p| json!({"name": p.name, "x": p.x, "y": p.y, "w": p.width, "h": p.height}))
        .collect();
    json!({
        "bounding_box": {"w": layout.bounding_box.width, "h": layout.bounding_box.height},
        "strategy": layout.strategy,
        "efficiency": layout.efficiency(),
        "placements": placements,
    })
}

/// Serialize `layout.stats()` for `--export-stats`.
pub fn stats_to_json(layout: &Layout) -> Value {
    let stats = layout.stats();
    json!({
        "num_gates": stats.num_gates,
        "bounding_box": {"w": stats.bounding_width, "h": stats.bounding_height},
        "bounding_area": stats.bounding_area,
        "used_area": stats.used_area,
        "wasted_area": stats.wasted_area(),
        "efficiency": stats.efficiency,
    })
}
