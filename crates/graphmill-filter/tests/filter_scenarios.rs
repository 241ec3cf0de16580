use graphmill_filter::{
    load_infores_remap, load_predicate_remap, process_edges, run_filter, ConsistencyReport,
    EdgeFilterOptions, FilterConfig, FilterError, FindingLevel,
};
use graphmill_io::CurieUriMap;
use graphmill_schema::{make_edge_id, Node};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn write_configs(dir: &Path, predicate_remap: &str, infores_remap: &str, prefixes: &str) {
    fs::write(dir.join("predicate-remap.yaml"), predicate_remap).expect("predicate remap");
    fs::write(dir.join("infores-remap.yaml"), infores_remap).expect("infores remap");
    fs::write(dir.join("curies-to-uri.yaml"), prefixes).expect("prefix map");
    fs::write(dir.join("version.txt"), "2.9.0\n").expect("version file");
}

fn config_for(dir: &Path) -> FilterConfig {
    FilterConfig {
        predicate_remap_path: dir.join("predicate-remap.yaml"),
        infores_remap_path: dir.join("infores-remap.yaml"),
        curie_uri_map_path: dir.join("curies-to-uri.yaml"),
        input_path: dir.join("input.json"),
        output_path: dir.join("output.json"),
        version_path: dir.join("version.txt"),
        test_mode: false,
        drop_negated: false,
        self_edge_exceptions: None,
    }
}

fn node_json(id: &str) -> serde_json::Value {
    json!({"id": id, "name": id, "provided_by": ["semmeddb"]})
}

fn edge_json(subject: &str, predicate: &str, label: &str, object: &str) -> serde_json::Value {
    json!({
        "id": make_edge_id(subject, predicate, object, "semmeddb"),
        "subject": subject,
        "object": object,
        "relation_label": label,
        "source_predicate": predicate,
        "primary_knowledge_source": "semmeddb"
    })
}

#[test]
fn mixed_rules_shape_the_output_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_configs(
        dir.path(),
        concat!(
            "REL:treats:\n",
            "  operation: keep\n",
            "  core_predicate: 'biolink:treats'\n",
            "REL:caused_by:\n",
            "  operation: invert\n",
            "  core_predicate: 'biolink:causes'\n",
            "REL:junk:\n",
            "  operation: delete\n",
            "REL:raises:\n",
            "  operation: keep\n",
            "  core_predicate: 'biolink:affects'\n",
            "  qualified_predicate: 'biolink:causes'\n",
            "  qualifiers:\n",
            "    - object_aspect: activity\n",
            "      object_direction: increased\n",
        ),
        "semmeddb:\n  infores_curie: 'infores:semmeddb'\n",
        "use_for_bidirectional_mapping:\n  - REL: \"http://example.org/rel#\"\n",
    );
    let document = json!({
        "nodes": [
            node_json("CHEMBL.COMPOUND:10"),
            node_json("MONDO:20"),
            node_json("MONDO:21"),
            node_json("NCBIGene:30")
        ],
        "edges": [
            edge_json("CHEMBL.COMPOUND:10", "REL:treats", "treats", "MONDO:20"),
            edge_json("MONDO:21", "REL:caused_by", "caused_by", "CHEMBL.COMPOUND:10"),
            edge_json("CHEMBL.COMPOUND:10", "REL:junk", "junk", "NCBIGene:30"),
            edge_json("CHEMBL.COMPOUND:10", "REL:raises", "raises", "NCBIGene:30")
        ]
    });
    fs::write(dir.path().join("input.json"), document.to_string()).expect("input");

    let summary = run_filter(&config_for(dir.path())).expect("filter run");
    assert_eq!(summary.nodes, 5, "four input nodes plus the build node");
    assert_eq!(summary.edges, 3, "the delete rule removes one of four");
    assert_eq!(summary.warnings, 0);
    assert_eq!(summary.infos, 0);

    let written = fs::read_to_string(dir.path().join("output.json")).expect("output");
    let graph: serde_json::Value = serde_json::from_str(&written).expect("output json");
    let edges = graph["edges"].as_array().expect("edges array");

    // Output order follows the dedup key: subject first, then source
    // predicate, so the inverted edge (now subject CHEMBL.COMPOUND:10,
    // source predicate REL:caused_by) sorts ahead of raises and treats.
    let predicates: Vec<&str> = edges
        .iter()
        .map(|e| e["predicate"].as_str().expect("predicate"))
        .collect();
    assert_eq!(
        predicates,
        vec!["biolink:causes", "biolink:affects", "biolink:treats"]
    );

    let inverted = &edges[0];
    assert_eq!(inverted["subject"], "CHEMBL.COMPOUND:10");
    assert_eq!(inverted["object"], "MONDO:21");
    assert_eq!(inverted["relation_label"], "INVERTED:caused_by");
    assert_eq!(inverted["predicate_label"], "caused_by");
    assert!(
        inverted["id"]
            .as_str()
            .expect("id")
            .starts_with("MONDO:21---REL:caused_by---"),
        "id segments keep extraction order across the swap"
    );

    let qualified = &edges[1];
    assert_eq!(qualified["qualified_predicate"], "biolink:causes");
    assert_eq!(qualified["qualified_object_aspect"], "activity");
    assert_eq!(qualified["qualified_object_direction"], "increased");
    assert_eq!(
        qualified["id"],
        "CHEMBL.COMPOUND:10---REL:raises---biolink:causes---activity---increased---NCBIGene:30---semmeddb"
    );

    let nodes = graph["nodes"].as_array().expect("nodes array");
    let build_node = nodes
        .iter()
        .find(|n| n["id"] == "GRAPHMILL:KG")
        .expect("build node");
    assert_eq!(build_node["name"], "Graphmill KG 2.9.0");
    assert_eq!(graph["build"]["version"], "Graphmill KG 2.9.0");
    assert!(nodes
        .iter()
        .filter(|n| n["id"] != "GRAPHMILL:KG")
        .all(|n| n["provided_by"] == json!(["infores:semmeddb"])));
}

#[test]
fn every_finding_class_surfaces_in_one_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_configs(
        dir.path(),
        concat!(
            "REL:used:\n",
            "  operation: keep\n",
            "  core_predicate: 'biolink:treats'\n",
            "REL:never:\n",
            "  operation: keep\n",
        ),
        "semmeddb:\n  infores_curie: 'infores:semmeddb'\n",
        concat!(
            "use_for_bidirectional_mapping:\n",
            "  - REL: \"http://example.org/rel#\"\n",
            "  - biolink: \"https://w3id.org/biolink/vocab/\"\n",
        ),
    );
    let document = json!({
        "nodes": [node_json("A:1"), node_json("B:2")],
        "edges": [
            edge_json("A:1", "REL:used", "treats", "B:2"),
            // No rule, no node, no prefix expansion: fatal plus info.
            edge_json("A:1", "GHOST:thing", "thing", "B:2"),
            {
                "id": make_edge_id("A:1", "biolink:related_to", "B:2", "mystery_dump"),
                "subject": "A:1",
                "object": "B:2",
                "relation_label": "related to",
                "source_predicate": "biolink:related_to",
                "primary_knowledge_source": "mystery_dump"
            }
        ]
    });
    fs::write(dir.path().join("input.json"), document.to_string()).expect("input");

    let rules = load_predicate_remap(&dir.path().join("predicate-remap.yaml")).expect("rules");
    let infores = load_infores_remap(&dir.path().join("infores-remap.yaml")).expect("infores");
    let prefix_map = CurieUriMap::load(&dir.path().join("curies-to-uri.yaml")).expect("prefixes");
    let mut node_ids = BTreeMap::new();
    node_ids.insert("A:1".to_string(), Node::new("A:1"));
    node_ids.insert("B:2".to_string(), Node::new("B:2"));

    let outcome = process_edges(
        &dir.path().join("input.json"),
        &rules,
        &infores,
        &prefix_map,
        &node_ids,
        &EdgeFilterOptions::default(),
    )
    .expect("edge pass");
    let report = ConsistencyReport::from_audit(&outcome.audit);

    let findings: Vec<(FindingLevel, &str)> = report
        .findings
        .iter()
        .map(|f| (f.level, f.code))
        .collect();
    assert_eq!(
        findings,
        vec![
            (FindingLevel::Warning, "unused_remap_rule"),
            (FindingLevel::Info, "predicate_without_node"),
            (FindingLevel::Fatal, "unmapped_source_predicate"),
            (FindingLevel::Fatal, "unmapped_knowledge_source"),
        ]
    );
    assert!(report.findings[0].message.contains("REL:never"));
    assert!(report.findings[1].message.contains("GHOST:thing"));
    // The vocabulary predicate is recorded but never fatal; the ghost is.
    assert!(report.findings[2].message.contains("GHOST:thing"));
    assert!(report.findings[3].message.contains("mystery_dump"));

    // The same inputs through the pipeline: both fatals counted, nothing
    // written.
    let err = run_filter(&config_for(dir.path())).expect_err("fatal run");
    match err.downcast_ref::<FilterError>() {
        Some(FilterError::AuditFailed { fatal }) => assert_eq!(*fatal, 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("output.json").exists());
}

#[test]
fn edge_flags_thread_through_the_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_configs(
        dir.path(),
        concat!(
            "REL:binds:\n",
            "  operation: keep\n",
            "  core_predicate: 'biolink:interacts_with'\n",
        ),
        "semmeddb:\n  infores_curie: 'infores:semmeddb'\n",
        "use_for_bidirectional_mapping:\n  - REL: \"http://example.org/rel#\"\n",
    );
    let mut negated = edge_json("A:1", "REL:binds", "binds", "B:2");
    negated["negated"] = json!(true);
    let document = json!({
        "nodes": [node_json("A:1"), node_json("B:2"), node_json("X:5"), node_json("Y:6")],
        "edges": [
            negated,
            edge_json("X:5", "REL:binds", "interacts_with", "X:5"),
            edge_json("Y:6", "REL:binds", "binds", "Y:6")
        ]
    });
    fs::write(dir.path().join("input.json"), document.to_string()).expect("input");

    let mut config = config_for(dir.path());
    config.drop_negated = true;
    config.self_edge_exceptions =
        Some(["interacts_with".to_string()].into_iter().collect());

    let summary = run_filter(&config).expect("filter run");
    assert_eq!(summary.edges, 1, "negated and unexcepted self edges drop");

    let written = fs::read_to_string(dir.path().join("output.json")).expect("output");
    let graph: serde_json::Value = serde_json::from_str(&written).expect("output json");
    let edge = &graph["edges"][0];
    assert_eq!(edge["subject"], "X:5");
    assert_eq!(edge["object"], "X:5");
    assert_eq!(edge["predicate_label"], "interacts_with");
    assert_eq!(edge["predicate"], "biolink:interacts_with");
}
