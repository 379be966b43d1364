use gate_packer_core::error::GatePackError;
use gate_packer_core::prelude::*;

fn gates() -> Vec<Gate> {
    vec![Gate::new("a", 2, 2), Gate::new("b", 3, 1)]
}

fn placed(name: &str, x: u32, y: u32, width: u32, height: u32) -> Placement {
    Placement {
        name: name.into(),
        x,
        y,
        width,
        height,
    }
}

fn layout(w: u32, h: u32, placements: Vec<Placement>) -> Layout {
    Layout {
        strategy: None,
        bounding_box: BoundingBox::new(w, h),
        placements,
    }
}

fn invalid(result: Result<()>) -> String {
    match result {
        Err(GatePackError::InvalidLayout(msg)) => msg,
        other => panic!("Expected InvalidLayout error, got {:?}", other),
    }
}

#[test]
fn accepts_touching_placements() {
    let l = layout(5, 2, vec![placed("a", 0, 0, 2, 2), placed("b", 2, 0, 3, 1)]);
    l.verify(&gates()).unwrap();
}

#[test]
fn reports_overlap() {
    let l = layout(5, 2, vec![placed("a", 0, 0, 2, 2), placed("b", 1, 1, 3, 1)]);
    assert!(invalid(l.verify(&gates())).contains("overlap"));
}

#[test]
fn reports_escape_from_bounding_box() {
    let l = layout(4, 2, vec![placed("a", 0, 0, 2, 2), placed("b", 2, 0, 3, 1)]);
    assert!(invalid(l.verify(&gates())).contains("exceeds bounding box"));
}

#[test]
fn reports_missing_and_duplicate_gates() {
    let missing = layout(5, 2, vec![placed("a", 0, 0, 2, 2)]);
    assert!(invalid(missing.verify(&gates())).contains("not placed: b"));

    let twice = layout(
        9,
        2,
        vec![
            placed("a", 0, 0, 2, 2),
            placed("b", 2, 0, 3, 1),
            placed("a", 5, 0, 2, 2),
        ],
    );
    assert!(invalid(twice.verify(&gates())).contains("more than once"));

    let unknown = layout(5, 2, vec![placed("zz", 0, 0, 1, 1)]);
    assert!(invalid(unknown.verify(&gates())).contains("unknown gate"));
}

#[test]
fn reports_resized_gate() {
    let l = layout(5, 3, vec![placed("a", 0, 0, 2, 3), placed("b", 2, 0, 3, 1)]);
    assert!(invalid(l.verify(&gates())).contains("placed as 2x3"));
}

#[test]
fn reports_duplicate_input_names() {
    let dup = vec![Gate::new("a", 1, 1), Gate::new("a", 1, 1)];
    let l = pack_gates(dup.clone(), PackerConfig::default()).unwrap();
    assert!(invalid(l.verify(&dup)).contains("duplicate gate name"));
}

#[test]
fn stats_summarize_density() {
    let l = layout(5, 2, vec![placed("a", 0, 0, 2, 2), placed("b", 2, 0, 3, 1)]);
    let stats = l.stats();
    assert_eq!(stats.num_gates, 2);
    assert_eq!(stats.bounding_area, 10);
    assert_eq!(stats.used_area, 7);
    assert_eq!(stats.wasted_area(), 3);
    assert!((stats.efficiency - 0.7).abs() < 1e-12);
    assert!((stats.waste_percentage() - 30.0).abs() < 1e-9);
    assert!(stats.summary().contains("Efficiency: 70.00%"));
}
