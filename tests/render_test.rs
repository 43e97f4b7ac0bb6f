//! Renderer and exporter tests

use road_netgen::generation::{LaneSpec, NetworkModel, Pipeline, RawDraft};
use road_netgen::render::{
    write_artifacts, AsciiRenderer, JsonExporter, NetworkRenderer, PlainXmlExporter, RenderMethod,
    SummaryRenderer,
};

fn cross_junction() -> NetworkModel {
    let draft = RawDraft::junction(4)
        .with_lanes(LaneSpec::bidirectional(4))
        .with_length(200.0);
    Pipeline::default().generate(&draft).unwrap()
}

#[test]
fn test_summary_lists_counts() {
    let summary = SummaryRenderer.summarize(&cross_junction()).unwrap();
    assert!(summary.contains("Nodes: 5, Edges: 8, Connections: 12"));
    assert!(summary.contains("One-way: no"));
    assert!(summary.contains("C_N0: C -> N0, lanes=2, length=200.0m"));
}

#[test]
fn test_ascii_map_draws_junction() {
    let map = AsciiRenderer::default().draw(&cross_junction());
    let lines: Vec<&str> = map.lines().skip(2).collect();

    let count = |symbol: char| -> usize { lines.iter().map(|line| line.matches(symbol).count()).sum() };

    assert!(map.starts_with("Legend:"));
    assert_eq!(count('+'), 1, "only the center has three or more roads");
    assert_eq!(count('o'), 4);
    assert!(lines.iter().any(|line| line.contains('.')));
    // North terminal on the first map row, south terminal on the last
    assert_eq!(lines.first().map(|line| line.trim()), Some("o"));
    assert_eq!(lines.last().map(|line| line.trim()), Some("o"));
}

#[test]
fn test_plain_xml_files() {
    let model = cross_junction();
    let artifacts = PlainXmlExporter.render(&model).unwrap();
    let suffixes: Vec<&str> = artifacts.iter().map(|artifact| artifact.suffix.as_str()).collect();
    assert_eq!(suffixes, vec!["nod.xml", "edg.xml", "con.xml"]);

    let nodes = &artifacts[0].contents;
    assert!(nodes.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert_eq!(nodes.matches("<node ").count(), 5);
    assert!(nodes.contains(r#"id="C" x="0.00" y="0.00" type="traffic_light""#));
    assert!(nodes.contains(r#"id="N0" x="200.00" y="0.00" type="priority""#));

    let edges = &artifacts[1].contents;
    assert_eq!(edges.matches("<edge ").count(), 8);
    assert!(edges.contains(r#"id="C_N0" from="C" to="N0" numLanes="2""#));

    // 12 turning movements, 2 x 2 lanes each
    let connections = &artifacts[2].contents;
    assert_eq!(connections.matches("<connection ").count(), 48);
    assert!(connections.contains(r#"fromLane="1" toLane="0""#));
}

#[test]
fn test_json_export() {
    let artifacts = JsonExporter.render(&cross_junction()).unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].suffix, "json");

    let value: serde_json::Value = serde_json::from_str(&artifacts[0].contents).unwrap();
    assert_eq!(value["one_way"], false);
    assert_eq!(value["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(value["edges"].as_array().unwrap().len(), 8);
    assert_eq!(value["nodes"][0]["label"], "C");
    assert_eq!(value["nodes"][0]["control"], "traffic_light");
    assert_eq!(value["edges"][0]["lanes"], 2);
}

#[test]
fn test_every_method_renders() {
    let model = cross_junction();
    for method in [
        RenderMethod::Ascii,
        RenderMethod::Summary,
        RenderMethod::PlainXml,
        RenderMethod::Json,
    ] {
        let artifacts = method.renderer().render(&model).unwrap();
        assert!(!artifacts.is_empty(), "{method:?} produced nothing");
    }
    assert!(RenderMethod::Summary.is_terminal());
    assert!(!RenderMethod::PlainXml.is_terminal());
}

#[test]
fn test_write_artifacts() {
    let dir = std::env::temp_dir().join(format!("road_netgen_render_{}", std::process::id()));
    let artifacts = PlainXmlExporter.render(&cross_junction()).unwrap();

    let written = write_artifacts(&dir, "cross", &artifacts).unwrap();
    assert_eq!(written.len(), 3);
    assert_eq!(written[0], dir.join("cross.nod.xml"));
    for (path, artifact) in written.iter().zip(&artifacts) {
        assert_eq!(std::fs::read_to_string(path).unwrap(), artifact.contents);
    }

    std::fs::remove_dir_all(&dir).unwrap();
}
