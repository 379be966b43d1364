use gate_packer_core::error::GatePackError;
use gate_packer_core::prelude::*;

fn parse_error_line(input: &str) -> (usize, String) {
    match parse_gates(input) {
        Err(GatePackError::Parse { line, message }) => (line, message),
        other => panic!("Expected Parse error, got {:?}", other),
    }
}

#[test]
fn parses_gate_lines_and_skips_comments() {
    let input = "# footprint list\ng1 4 4\n\n  g2\t2   2  \n";
    let gates = parse_gates(input).unwrap();
    assert_eq!(gates, vec![Gate::new("g1", 4, 4), Gate::new("g2", 2, 2)]);
}

#[test]
fn rejects_missing_field() {
    let (line, msg) = parse_error_line("g1 4 4\ng2 2\n");
    assert_eq!(line, 2);
    assert!(msg.contains("found 2 field"), "{}", msg);
}

#[test]
fn rejects_extra_field() {
    let (line, _) = parse_error_line("g1 4 4 9\n");
    assert_eq!(line, 1);
}

#[test]
fn rejects_non_integer_dimension() {
    let (line, msg) = parse_error_line("g1 4 4\n\ng2 2.5 2\n");
    assert_eq!(line, 3);
    assert!(msg.contains("invalid width '2.5'"), "{}", msg);

    let (_, msg) = parse_error_line("g1 4 -1\n");
    assert!(msg.contains("invalid height"), "{}", msg);
}

#[test]
fn rejects_zero_dimension() {
    let (_, msg) = parse_error_line("g1 0 4\n");
    assert!(msg.contains("width must be positive"), "{}", msg);
}

#[test]
fn writes_layout_in_commit_order() {
    let gates = vec![Gate::new("g1", 4, 4), Gate::new("g2", 2, 2)];
    let layout = pack_gates(gates, PackerConfig::default()).unwrap();
    assert_eq!(write_layout(&layout), "bounding_box 4 6\ng1 0 0\ng2 0 4\n");
}

#[test]
fn layout_text_reads_back_for_verification() {
    let gates = parse_gates("a 3 7\nb 5 2\nc 4 4\nd 1 1\ne 6 3\n").unwrap();
    let layout = pack_gates(gates.clone(), PackerConfig::default()).unwrap();

    let text = write_layout(&layout);
    let back = parse_layout(&text, &gates).unwrap();
    assert_eq!(back.strategy, None);
    assert_eq!(back.bounding_box, layout.bounding_box);
    assert_eq!(back.placements, layout.placements);
    back.verify(&gates).unwrap();
    assert_eq!(write_gates(&gates), "a 3 7\nb 5 2\nc 4 4\nd 1 1\ne 6 3\n");
}

#[test]
fn layout_parse_errors() {
    let gates = vec![Gate::new("g1", 1, 1)];
    match parse_layout("g1 0 0\n", &gates) {
        Err(GatePackError::Parse { line, .. }) => assert_eq!(line, 1),
        other => panic!("Expected Parse error, got {:?}", other),
    }
    match parse_layout("bounding_box 1 1\nzz 0 0\n", &gates) {
        Err(GatePackError::Parse { line, message }) => {
            assert_eq!(line, 2);
            assert!(message.contains("unknown gate 'zz'"));
        }
        other => panic!("Expected Parse error, got {:?}", other),
    }
    assert!(parse_layout("", &gates).is_err());
}

#[test]
fn json_export_carries_sizes_and_efficiency() {
    let gates = vec![Gate::new("g1", 3, 5)];
    let layout = pack_gates(gates, PackerConfig::default()).unwrap();
    let v = gate_packer_core::to_json(&layout);
    assert_eq!(v["bounding_box"]["w"], 3);
    assert_eq!(v["bounding_box"]["h"], 5);
    assert_eq!(v["strategy"], "area-perimeter");
    assert_eq!(v["efficiency"], 1.0);
    assert_eq!(v["placements"][0]["name"], "g1");
    assert_eq!(v["placements"][0]["h"], 5);

    let stats = gate_packer_core::stats_to_json(&layout);
    assert_eq!(stats["wasted_area"], 0);
    assert_eq!(stats["num_gates"], 1);
}
