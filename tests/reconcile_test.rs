//! Parameter reconciliation tests
//!
//! Precedence, conflicts and structural gaps, checked on drafts built in code.

use pretty_assertions::assert_eq;
use road_netgen::generation::{
    reconcile, AttributeSet, Defaults, GenerationError, JunctionControl, JunctionShape, LaneSpec,
    NetworkKind, NetworkSpec, Override, Phrasing, RawDraft,
};

fn reconcile_draft(draft: &RawDraft) -> Result<NetworkSpec, GenerationError> {
    reconcile(draft, &draft.overrides, &Defaults::default())
}

fn lanes_of(spec: &NetworkSpec, label: &str) -> u32 {
    spec.attributes_for(label)
        .unwrap_or_else(|| panic!("no approach {label}"))
        .lanes
}

#[test]
fn test_missing_kind_is_underspecified() {
    let draft = RawDraft::default().with_lanes(LaneSpec::per_direction(2));
    let err = reconcile_draft(&draft).unwrap_err();
    assert!(matches!(err, GenerationError::UnderspecifiedNetwork { .. }));
    assert_eq!(err.field(), "network_kind");
}

#[test]
fn test_missing_structural_fields_are_underspecified() {
    let mut junction = RawDraft::junction(4);
    junction.arity = None;
    assert_eq!(reconcile_draft(&junction).unwrap_err().field(), "arity");

    let mut grid = RawDraft::grid(3, 3);
    grid.columns = None;
    assert_eq!(reconcile_draft(&grid).unwrap_err().field(), "columns");

    let mut radial = RawDraft::radial(2, 6);
    radial.spoke_count = None;
    assert_eq!(reconcile_draft(&radial).unwrap_err().field(), "spoke_count");
}

#[test]
fn test_negative_count_is_invalid_topology() {
    let err = reconcile_draft(&RawDraft::junction(-4)).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidTopology { .. }));
}

#[test]
fn test_defaults_fill_attribute_gaps() {
    let defaults = Defaults {
        lanes: 3,
        length: 75.0,
        speed: 8.0,
        control: JunctionControl::Priority,
    };
    let draft = RawDraft::junction(4).with_length(120.0);
    let spec = reconcile(&draft, &draft.overrides, &defaults).unwrap();

    let NetworkSpec::Junction(junction) = &spec else {
        panic!("expected a junction, got {spec:?}");
    };
    assert_eq!(junction.control, JunctionControl::Priority);
    for approach in &junction.approaches {
        assert_eq!(
            approach.attributes,
            AttributeSet {
                lanes: 3,
                length: 120.0,
                speed: 8.0
            }
        );
    }
}

/// Global lanes 4, west overridden to 6: west=6, everything else 4
#[test]
fn test_override_beats_global_attribute() {
    let draft = RawDraft::junction(4)
        .with_lanes(LaneSpec::per_direction(4))
        .with_override(Override::lanes("west", LaneSpec::per_direction(6)));
    let spec = reconcile_draft(&draft).unwrap();

    assert_eq!(spec.kind(), NetworkKind::Junction);
    assert_eq!(lanes_of(&spec, "west"), 6);
    assert_eq!(lanes_of(&spec, "north"), 4);
    assert_eq!(lanes_of(&spec, "east"), 4);
    assert_eq!(lanes_of(&spec, "south"), 4);
}

#[test]
fn test_bidirectional_override_is_normalized() {
    let draft = RawDraft::junction(4).with_override(Override::lanes("north", LaneSpec::bidirectional(6)));
    let spec = reconcile_draft(&draft).unwrap();
    assert_eq!(lanes_of(&spec, "north"), 3);
    assert_eq!(lanes_of(&spec, "south"), 1);
}

#[test]
fn test_conflicting_overrides_fail() {
    let draft = RawDraft::junction(4)
        .with_override(Override::lanes("west", LaneSpec::per_direction(6)))
        .with_override(Override::lanes("west", LaneSpec::per_direction(2)));
    let err = reconcile_draft(&draft).unwrap_err();
    assert!(matches!(err, GenerationError::ConflictingAttribute { .. }));
    assert_eq!(err.field(), "lanes");
}

/// "west" and "arm2" name the same approach of a cross junction
#[test]
fn test_conflict_through_alias() {
    let draft = RawDraft::junction(4)
        .with_override(Override::length("west", 150.0))
        .with_override(Override::length("arm2", 180.0));
    assert!(matches!(
        reconcile_draft(&draft),
        Err(GenerationError::ConflictingAttribute { .. })
    ));
}

/// The same value phrased two ways is not a conflict
#[test]
fn test_equivalent_duplicates_are_accepted() {
    let draft = RawDraft::junction(4)
        .with_override(Override::lanes("west", LaneSpec::per_direction(3)))
        .with_override(Override::lanes("West", LaneSpec::bidirectional(6)));
    let spec = reconcile_draft(&draft).unwrap();
    assert_eq!(lanes_of(&spec, "west"), 3);
}

#[test]
fn test_unknown_target_is_invalid_topology() {
    let draft = RawDraft::junction(3).with_override(Override::lanes("south", LaneSpec::per_direction(2)));
    let err = reconcile_draft(&draft).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidTopology { .. }));
    assert_eq!(err.field(), "overrides.target");
}

#[test]
fn test_fractional_lane_override_is_malformed() {
    let mut entry = Override::lanes("east", LaneSpec::per_direction(2));
    entry.value = 2.5;
    let draft = RawDraft::junction(4).with_override(entry);
    assert!(matches!(
        reconcile_draft(&draft),
        Err(GenerationError::MalformedQuantity { .. })
    ));
}

#[test]
fn test_odd_bidirectional_global_is_malformed() {
    let draft = RawDraft::grid(2, 2).with_lanes(LaneSpec::bidirectional(5));
    assert!(matches!(
        reconcile_draft(&draft),
        Err(GenerationError::MalformedQuantity { .. })
    ));
}

#[test]
fn test_shape_follows_arity() {
    let cases = [
        (3, JunctionShape::T),
        (4, JunctionShape::Cross),
        (6, JunctionShape::MultiWay),
    ];
    for (arity, shape) in cases {
        let NetworkSpec::Junction(junction) = reconcile_draft(&RawDraft::junction(arity)).unwrap() else {
            panic!("expected a junction");
        };
        assert_eq!(junction.shape, shape);
        assert_eq!(junction.approaches.len(), arity as usize);
    }
}

#[test]
fn test_explicit_shape_must_match_arity() {
    let mut draft = RawDraft::junction(4);
    draft.junction_shape = Some(JunctionShape::T);
    let err = reconcile_draft(&draft).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidTopology { .. }));
    assert_eq!(err.field(), "arity");
}

#[test]
fn test_grid_edge_classes() {
    let draft = RawDraft::grid(3, 4)
        .with_length(50.0)
        .with_override(Override::length("vertical", 80.0))
        .with_override(Override {
            target: "horizontal".into(),
            attribute: road_netgen::generation::AttributeField::Lanes,
            value: 2.0,
            phrasing: Some(Phrasing::PerDirection),
        });
    let NetworkSpec::Grid(grid) = reconcile_draft(&draft).unwrap() else {
        panic!("expected a grid");
    };
    assert_eq!((grid.rows, grid.columns), (3, 4));
    assert_eq!(grid.horizontal.length, 50.0);
    assert_eq!(grid.horizontal.lanes, 2);
    assert_eq!(grid.vertical.length, 80.0);
    assert_eq!(grid.vertical.lanes, 1);
}

#[test]
fn test_radial_one_way_is_carried() {
    let draft = RawDraft::radial(2, 5).one_way();
    let NetworkSpec::Radial(radial) = reconcile_draft(&draft).unwrap() else {
        panic!("expected a radial network");
    };
    assert!(radial.one_way);
    assert_eq!((radial.ring_count, radial.spoke_count), (2, 5));
}

#[test]
fn test_ring_length_override_is_rejected() {
    let draft = RawDraft::radial(1, 4)
        .with_length(100.0)
        .with_override(Override::length("ring", 50.0));
    let err = reconcile_draft(&draft).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidTopology { .. }));
    assert_eq!(err.field(), "overrides.ring.length");

    let draft = RawDraft::radial(1, 4).with_override(Override::length("circle", 50.0));
    assert_eq!(reconcile_draft(&draft).unwrap_err().field(), "overrides.circle.length");
}

#[test]
fn test_huge_junction_is_rejected_before_layout() {
    let err = reconcile_draft(&RawDraft::junction(u32::MAX as i64)).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidTopology { .. }));
    assert_eq!(err.field(), "arity");
}
