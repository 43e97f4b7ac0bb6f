//! End-to-end pipeline tests

use anyhow::Result;
use pretty_assertions::assert_eq;
use road_netgen::generation::{
    Defaults, GenerationError, JunctionControl, LaneSpec, NetworkKind, Override, Pipeline, RawDraft,
};
use road_netgen::parser::{DescriptionParser, KeywordParser};

/// Hands back a fixed draft, whatever the description says
struct FixedParser(RawDraft);

impl DescriptionParser for FixedParser {
    fn parse(&self, _description: &str) -> Result<RawDraft> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_bidirectional_junction_end_to_end() {
    let draft = RawDraft::junction(4)
        .with_lanes(LaneSpec::bidirectional(4))
        .with_length(200.0);
    let model = Pipeline::default().generate(&draft).unwrap();

    assert_eq!(model.node_count(), 5);
    assert_eq!(model.edge_count(), 8);
    for edge in model.edges() {
        assert_eq!(edge.lanes, 2);
        assert_eq!(edge.length, 200.0);
    }
}

#[test]
fn test_description_end_to_end() {
    let parser = KeywordParser::new().unwrap();
    let model = Pipeline::default()
        .generate_from_description(&parser, "A 4-way junction, bidirectional 4 lanes, 200 m long")
        .unwrap();

    assert_eq!(model.node_count(), 5);
    assert_eq!(model.edge_count(), 8);
    assert!(model.edges().all(|edge| edge.lanes == 2 && edge.length == 200.0));
}

#[test]
fn test_generation_is_idempotent() {
    let draft = RawDraft::radial(3, 7)
        .with_lanes(LaneSpec::per_direction(2))
        .with_override(Override::length("spoke", 85.0));
    let pipeline = Pipeline::default();

    let first = pipeline.generate(&draft).unwrap();
    let second = pipeline.generate(&draft).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_first_error_is_returned_unchanged() {
    // Malformed lanes and a missing arity: reconciliation stops at the lanes
    let mut draft = RawDraft::junction(4).with_lanes(LaneSpec::bidirectional(3));
    draft.arity = None;
    let err = Pipeline::default().generate(&draft).unwrap_err();
    assert!(matches!(err, GenerationError::MalformedQuantity { .. }));
}

#[test]
fn test_pipeline_defaults_apply() {
    let defaults = Defaults {
        lanes: 2,
        length: 60.0,
        speed: 20.0,
        control: JunctionControl::AllwayStop,
    };
    let model = Pipeline::new(defaults).generate(&RawDraft::grid(2, 2)).unwrap();

    assert!(model.nodes().all(|node| node.control == JunctionControl::AllwayStop));
    assert!(model.edges().all(|edge| edge.lanes == 2 && edge.length == 60.0 && edge.speed == 20.0));
}

#[test]
fn test_fallback_kind_only_applies_to_descriptions() {
    let mut draft = RawDraft::grid(2, 3);
    draft.network_kind = None;

    let pipeline = Pipeline::default().with_fallback_kind(Some(NetworkKind::Grid));
    assert!(matches!(
        pipeline.generate(&draft),
        Err(GenerationError::UnderspecifiedNetwork { .. })
    ));

    let model = pipeline
        .generate_from_description(&FixedParser(draft), "a 2 by 3 layout")
        .unwrap();
    assert_eq!(model.node_count(), 6);
}

#[test]
fn test_parse_description_fills_fallback_kind() {
    let mut draft = RawDraft::radial(1, 4);
    draft.network_kind = None;

    let pipeline = Pipeline::default().with_fallback_kind(Some(NetworkKind::Radial));
    let parsed = pipeline.parse_description(&FixedParser(draft), "one ring").unwrap();
    assert_eq!(parsed, RawDraft::radial(1, 4));
}

#[test]
fn test_description_without_kind_fails_without_fallback() {
    let mut draft = RawDraft::junction(4);
    draft.network_kind = None;

    let err = Pipeline::default()
        .generate_from_description(&FixedParser(draft), "four arms")
        .unwrap_err();
    let generation = err.downcast_ref::<GenerationError>().unwrap();
    assert_eq!(generation.field(), "network_kind");
}

#[test]
fn test_pipeline_is_shareable_across_threads() {
    let pipeline = Pipeline::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (3..7)
            .map(|arity| {
                let pipeline = &pipeline;
                scope.spawn(move || pipeline.generate(&RawDraft::junction(arity)).unwrap())
            })
            .collect();
        for (arity, handle) in (3..7).zip(handles) {
            let model = handle.join().unwrap();
            assert_eq!(model.node_count(), arity + 1);
        }
    });
}
