use gate_packer_core::error::GatePackError;
use gate_packer_core::prelude::*;

/// Test zero-sized gate dimensions
#[test]
fn test_zero_width_rejected() {
    let gates = vec![Gate::new("ok", 2, 2), Gate::new("flat", 0, 3)];
    match pack_gates(gates, PackerConfig::default()) {
        Err(GatePackError::InvalidInput(msg)) => assert!(msg.contains("flat")),
        other => panic!("Expected InvalidInput error, got {:?}", other),
    }
}

#[test]
fn test_zero_height_rejected_by_engine() {
    let result = PackingEngine::new(vec![Gate::new("thin", 3, 0)], SortStrategy::MaxSide);
    assert!(matches!(result, Err(GatePackError::InvalidInput(_))));
}

/// Summed extents beyond u32 would overflow coordinates
#[test]
fn test_extent_overflow_rejected() {
    let gates = vec![Gate::new("huge", u32::MAX, 1), Gate::new("one", 1, 1)];
    assert!(matches!(
        pack_gates(gates, PackerConfig::default()),
        Err(GatePackError::InvalidInput(_))
    ));
}

#[test]
fn test_largest_single_gate() {
    let gates = vec![Gate::new("max", u32::MAX, u32::MAX)];
    let layout = pack_gates(gates.clone(), PackerConfig::default()).unwrap();
    assert_eq!(layout.bounding_box, BoundingBox::new(u32::MAX, u32::MAX));
    assert_eq!(layout.efficiency(), 1.0);
    layout.verify(&gates).unwrap();
}

#[test]
fn test_empty_engine_reaches_success() {
    let mut engine = PackingEngine::new(Vec::new(), SortStrategy::AreaPerimeter).unwrap();
    assert_eq!(engine.state(), PackState::Initialized);
    assert_eq!(engine.bounding_box(), BoundingBox::new(0, 0));
    assert!(engine.place_next().unwrap().is_none());
    assert_eq!(engine.state(), PackState::Success);
    let layout = engine.layout().unwrap();
    assert_eq!(layout.stats().efficiency, 0.0);
}

#[test]
fn test_long_strip_of_unit_gates() {
    let gates: Vec<Gate> = (0..50).map(|i| Gate::new(format!("u{}", i), 1, 1)).collect();
    let layout = pack_gates(gates.clone(), PackerConfig::default()).unwrap();
    layout.verify(&gates).unwrap();
    assert!(layout.efficiency() > 0.0 && layout.efficiency() <= 1.0);
}
