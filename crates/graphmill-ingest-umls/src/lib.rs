//! UMLS Metathesaurus JSON-Lines extraction.
//!
//! Converts the Metathesaurus item dump into common node records, one
//! JSON-Lines output line per extracted node. Each input line holds one
//! entity keyed by a `('SOURCE', 'id')` string; the entity value carries
//! the concept's CUIs, its names grouped by term type and suppressibility,
//! its raw attributes, and its semantic-type identifiers (TUIs).
//!
//! Extraction is table-driven by [`sources::SourceSpec`]:
//!
//! - the node curie comes from the source's CURIE prefix (CUI-identified
//!   sources use the concept CUI instead and drop items whose CUI is not
//!   unique),
//! - the name is the first hit walking the source's term-type hierarchy,
//!   preferred ("Y") entries before suppressed ("N"); everything after the
//!   first hit becomes a synonym,
//! - the category comes from the TUI-combination mapping file, the IRI
//!   from the CURIE-to-URI map,
//! - Gene Ontology items additionally remap their category from the
//!   `GO_NAMESPACE` attribute and fold `GO_COMMENT` into the description.
//!
//! This stage produces no edges, but downstream stages expect the edges
//! file to exist, so an empty one is written.

pub mod sources;

use anyhow::{Context, Result};
use graphmill_io::{open_jsonl, CurieUriMap, JsonLinesWriter};
use graphmill_schema::Node;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use sources::SourceSpec;

/// CURIE prefix for provenance labels, completed by each source's code.
pub const UMLS_SOURCE_CURIE_PREFIX: &str = "umls_source";

/// The dump's placeholder entity for codeless Metathesaurus concepts.
const NOCODE_ENTITY: &str = "('NOCODE', 'MTH')";

/// Release year stamped on every extracted node.
const UPDATE_DATE: &str = "2023";

const TEST_MODE_ITEM_CAP: u64 = 10_000;
const PROGRESS_INTERVAL: u64 = 1_000_000;

#[derive(Debug, Error)]
pub enum UmlsError {
    #[error("entity key {key:?} is not a (source, id) pair")]
    MalformedEntityKey { key: String },

    #[error("no name found for {curie} in any accession tier")]
    EmptyNames { curie: String },

    #[error("no IRI mapping for curie prefix {prefix}")]
    MissingIriPrefix { prefix: String },

    #[error("no category mapping for TUI combination {key}")]
    UnknownTuiCombination { key: String },

    #[error("GO item {curie} must carry exactly one GO_NAMESPACE attribute, found {found}")]
    GoNamespace { curie: String, found: usize },
}

/// One entity value from the dump. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UmlsEntity {
    #[serde(default)]
    pub cuis: Vec<String>,
    #[serde(default)]
    pub names: BTreeMap<String, NameGroup>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub tuis: Vec<String>,
}

/// Names of one term type, split by suppressibility flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameGroup {
    #[serde(rename = "Y", default)]
    pub preferred: Vec<String>,
    #[serde(rename = "N", default)]
    pub other: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UmlsIngestConfig {
    pub input_path: PathBuf,
    pub nodes_out_path: PathBuf,
    pub edges_out_path: PathBuf,
    pub curie_uri_map_path: PathBuf,
    pub tui_mapping_path: PathBuf,
    pub test_mode: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct UmlsSummary {
    pub items: u64,
    pub nodes: u64,
}

/// Convert the item dump into node records.
///
/// Test mode stops after the first 10,000 items.
pub fn run_ingest(config: &UmlsIngestConfig) -> Result<UmlsSummary> {
    let prefix_map = CurieUriMap::load(&config.curie_uri_map_path)?;
    let tui_map = load_tui_mappings(&config.tui_mapping_path)?;
    info!(
        prefixes = prefix_map.len(),
        tui_combinations = tui_map.len(),
        "mappings loaded"
    );

    let reader = open_jsonl::<BTreeMap<String, UmlsEntity>>(&config.input_path)?;
    let mut nodes_out = JsonLinesWriter::create(&config.nodes_out_path)?;
    // No edges come out of this stage, but downstream expects the file.
    JsonLinesWriter::create(&config.edges_out_path)?.finish()?;

    let mut items: u64 = 0;
    let mut written: u64 = 0;
    for record in reader {
        let record = record?;
        items += 1;
        if config.test_mode && items > TEST_MODE_ITEM_CAP {
            break;
        }
        if items % PROGRESS_INTERVAL == 0 {
            info!(items, nodes = written, "converting items");
        }
        // Each line should hold exactly one entity; tolerate more.
        for (entity_key, entity) in &record {
            if entity_key == NOCODE_ENTITY {
                continue;
            }
            let (source, node_id) = parse_entity_key(entity_key)?;
            let Some(spec) = sources::lookup(&source) else {
                continue;
            };
            if let Some(node) = build_node(spec, &node_id, entity, &prefix_map, &tui_map)? {
                nodes_out.write(&node)?;
                written += 1;
            }
        }
    }
    nodes_out.finish()?;

    info!(items, nodes = written, "item dump converted");
    Ok(UmlsSummary {
        items,
        nodes: written,
    })
}

/// The TUI-combination category file: stringified TUI tuple to category.
pub fn load_tui_mappings(path: &Path) -> Result<BTreeMap<String, String>> {
    let file =
        File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

/// Key format of the TUI-combination file, inherited from the upstream
/// asset: `('T047',)` for one TUI, `('T116', 'T121')` for several.
pub fn tui_combo_key(tuis: &[String]) -> String {
    match tuis {
        [] => "()".to_string(),
        [single] => format!("('{single}',)"),
        _ => {
            let quoted: Vec<String> = tuis.iter().map(|tui| format!("'{tui}'")).collect();
            format!("({})", quoted.join(", "))
        }
    }
}

fn parse_entity_key(key: &str) -> Result<(String, String), UmlsError> {
    let cleaned: String = key
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '\''))
        .collect();
    let mut parts = cleaned.split(',');
    match (parts.next(), parts.next()) {
        (Some(source), Some(id)) => Ok((source.trim().to_string(), id.trim().to_string())),
        _ => Err(UmlsError::MalformedEntityKey {
            key: key.to_string(),
        }),
    }
}

fn build_node(
    spec: &SourceSpec,
    raw_id: &str,
    entity: &UmlsEntity,
    prefix_map: &CurieUriMap,
    tui_map: &BTreeMap<String, String>,
) -> Result<Option<Node>, UmlsError> {
    let mut id = raw_id.to_string();
    if let Some(prefix) = spec.strip_prefix {
        id = id.replace(prefix, "");
    }
    if spec.cui_identified() {
        if entity.cuis.len() != 1 {
            return Ok(None);
        }
        id = entity.cuis[0].clone();
    }
    let curie = format!("{}:{id}", spec.curie_prefix);

    let iri_base = prefix_map.expand_prefix(spec.curie_prefix).ok_or_else(|| {
        UmlsError::MissingIriPrefix {
            prefix: spec.curie_prefix.to_string(),
        }
    })?;
    let iri = format!("{iri_base}{id}");

    let combo_key = tui_combo_key(&entity.tuis);
    let mut category = tui_map
        .get(&combo_key)
        .cloned()
        .ok_or(UmlsError::UnknownTuiCombination { key: combo_key })?;

    let mut comment = String::new();
    if spec.source == "GO" {
        let namespaces = entity
            .attributes
            .get("GO_NAMESPACE")
            .map(Vec::as_slice)
            .unwrap_or_default();
        let [namespace] = namespaces else {
            return Err(UmlsError::GoNamespace {
                curie,
                found: namespaces.len(),
            });
        };
        category = match namespace.as_str() {
            "molecular_function" => "molecular activity".to_string(),
            "cellular_component" => "cellular component".to_string(),
            "biological_process" => "biological process".to_string(),
            _ => category,
        };
        if let Some(go_comment) = entity
            .attributes
            .get("GO_COMMENT")
            .and_then(|values| values.first())
        {
            comment = format!("// COMMENTS: {go_comment}");
        }
    }

    let (name, synonyms) = name_and_synonyms(spec, entity, &curie)?;

    let mut node = Node::new(curie);
    node.iri = Some(iri);
    node.name = Some(name);
    node.category = Some(category);
    node.update_date = Some(UPDATE_DATE.to_string());
    node.provided_by = vec![format!(
        "{UMLS_SOURCE_CURIE_PREFIX}:{}",
        spec.provenance_code
    )];
    node.synonym = synonyms;
    node.description = Some(semantic_type_description(&comment, &entity.tuis));
    Ok(Some(node))
}

/// Walk the source's term-type hierarchy collecting names, preferred before
/// suppressed within each tier. The first name wins; the rest are synonyms.
fn name_and_synonyms(
    spec: &SourceSpec,
    entity: &UmlsEntity,
    curie: &str,
) -> Result<(String, Vec<String>), UmlsError> {
    let mut names = Vec::new();
    for tty in spec.tty_hierarchy {
        if let Some(group) = entity.names.get(*tty) {
            names.extend(group.preferred.iter().cloned());
            names.extend(group.other.iter().cloned());
        }
    }
    let mut names = names.into_iter();
    let name = names.next().ok_or_else(|| UmlsError::EmptyNames {
        curie: curie.to_string(),
    })?;
    Ok((name, names.collect()))
}

/// Append one `; UMLS Semantic Type: STY:<tui>` fragment per TUI to the
/// comment, then trim stray separators from both ends.
fn semantic_type_description(comment: &str, tuis: &[String]) -> String {
    let mut description = comment.to_string();
    for tui in tuis {
        description.push_str("; UMLS Semantic Type: STY:");
        description.push_str(tui);
    }
    description
        .trim_matches(|c| c == ';' || c == ' ')
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn entity(value: serde_json::Value) -> UmlsEntity {
        serde_json::from_value(value).unwrap()
    }

    fn test_prefix_map() -> CurieUriMap {
        let mut map = CurieUriMap::default();
        map.insert("ATC".to_string(), "https://www.whocc.no/atc_ddd_index/?code=".to_string());
        map.insert("GO".to_string(), "http://purl.obolibrary.org/obo/GO_".to_string());
        map.insert("MESH".to_string(), "http://id.nlm.nih.gov/mesh/".to_string());
        map.insert(
            "UMLS".to_string(),
            "https://uts.nlm.nih.gov/uts/umls/concept/".to_string(),
        );
        map
    }

    fn test_tui_map() -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("('T109',)".to_string(), "chemical substance".to_string());
        map.insert("('T116', 'T121')".to_string(), "protein".to_string());
        map.insert("('T045',)".to_string(), "genetic function".to_string());
        map
    }

    #[test]
    fn entity_keys_parse_to_source_and_id() {
        let (source, id) = parse_entity_key("('MSH', 'D014867')").unwrap();
        assert_eq!(source, "MSH");
        assert_eq!(id, "D014867");
        assert!(matches!(
            parse_entity_key("not a pair"),
            Err(UmlsError::MalformedEntityKey { .. })
        ));
    }

    #[test]
    fn tui_combo_keys_match_the_mapping_file_format() {
        assert_eq!(tui_combo_key(&[]), "()");
        assert_eq!(tui_combo_key(&["T047".to_string()]), "('T047',)");
        assert_eq!(
            tui_combo_key(&["T116".to_string(), "T121".to_string()]),
            "('T116', 'T121')"
        );
    }

    #[test]
    fn names_walk_the_hierarchy_preferred_first() {
        let spec = sources::lookup("ATC").unwrap();
        let entity = entity(json!({
            "cuis": ["C0000001"],
            "tuis": ["T109"],
            "names": {
                "IN": {"Y": ["ingredient name"], "N": []},
                "PT": {"Y": ["preferred name"], "N": ["suppressed name"]}
            }
        }));
        let (name, synonyms) =
            name_and_synonyms(spec, &entity, "ATC:X").unwrap();
        // RXN_PT is absent, so PT wins; IN trails as a synonym.
        assert_eq!(name, "preferred name");
        assert_eq!(
            synonyms,
            vec!["suppressed name".to_string(), "ingredient name".to_string()]
        );
    }

    #[test]
    fn nameless_entities_are_a_typed_error() {
        let spec = sources::lookup("ATC").unwrap();
        let entity = entity(json!({"tuis": ["T109"], "names": {}}));
        assert!(matches!(
            name_and_synonyms(spec, &entity, "ATC:X"),
            Err(UmlsError::EmptyNames { .. })
        ));
    }

    #[test]
    fn descriptions_accumulate_semantic_types() {
        assert_eq!(
            semantic_type_description("", &["T116".to_string(), "T121".to_string()]),
            "UMLS Semantic Type: STY:T116; UMLS Semantic Type: STY:T121"
        );
        assert_eq!(
            semantic_type_description("// COMMENTS: note", &["T045".to_string()]),
            "// COMMENTS: note; UMLS Semantic Type: STY:T045"
        );
        assert_eq!(semantic_type_description("", &[]), "");
    }

    #[test]
    fn plain_source_builds_a_complete_node() {
        let spec = sources::lookup("ATC").unwrap();
        let entity = entity(json!({
            "cuis": ["C0000001"],
            "tuis": ["T109"],
            "names": {"PT": {"Y": ["Aspirin"], "N": []}}
        }));
        let node = build_node(spec, "N02BA01", &entity, &test_prefix_map(), &test_tui_map())
            .unwrap()
            .unwrap();
        assert_eq!(node.id, "ATC:N02BA01");
        assert_eq!(
            node.iri.as_deref(),
            Some("https://www.whocc.no/atc_ddd_index/?code=N02BA01")
        );
        assert_eq!(node.name.as_deref(), Some("Aspirin"));
        assert_eq!(node.category.as_deref(), Some("chemical substance"));
        assert_eq!(node.provided_by, vec!["umls_source:ATC".to_string()]);
        assert_eq!(node.update_date.as_deref(), Some("2023"));
        assert_eq!(
            node.description.as_deref(),
            Some("UMLS Semantic Type: STY:T109")
        );
    }

    #[test]
    fn cui_identified_sources_use_the_unique_cui() {
        let spec = sources::lookup("MTH").unwrap();
        let one_cui = entity(json!({
            "cuis": ["C0004057"],
            "tuis": ["T109"],
            "names": {"PN": {"Y": ["aspirin"], "N": []}}
        }));
        let node = build_node(spec, "U000001", &one_cui, &test_prefix_map(), &test_tui_map())
            .unwrap()
            .unwrap();
        assert_eq!(node.id, "UMLS:C0004057");
        assert_eq!(node.provided_by, vec!["umls_source:MTH".to_string()]);

        let two_cuis = entity(json!({
            "cuis": ["C0004057", "C0004058"],
            "tuis": ["T109"],
            "names": {"PN": {"Y": ["aspirin"], "N": []}}
        }));
        let skipped =
            build_node(spec, "U000001", &two_cuis, &test_prefix_map(), &test_tui_map()).unwrap();
        assert!(skipped.is_none());
    }

    #[test]
    fn go_items_strip_their_prefix_and_remap_category() {
        let spec = sources::lookup("GO").unwrap();
        let entity = entity(json!({
            "cuis": ["C0000123"],
            "tuis": ["T045"],
            "names": {"PT": {"Y": ["DNA repair"], "N": []}},
            "attributes": {
                "GO_NAMESPACE": ["biological_process"],
                "GO_COMMENT": ["Note that DNA repair is broad."]
            }
        }));
        let node = build_node(spec, "GO:0006281", &entity, &test_prefix_map(), &test_tui_map())
            .unwrap()
            .unwrap();
        assert_eq!(node.id, "GO:0006281");
        assert_eq!(
            node.iri.as_deref(),
            Some("http://purl.obolibrary.org/obo/GO_0006281")
        );
        assert_eq!(node.category.as_deref(), Some("biological process"));
        assert_eq!(
            node.description.as_deref(),
            Some("// COMMENTS: Note that DNA repair is broad.; UMLS Semantic Type: STY:T045")
        );
    }

    #[test]
    fn go_items_without_a_namespace_are_a_typed_error() {
        let spec = sources::lookup("GO").unwrap();
        let entity = entity(json!({
            "tuis": ["T045"],
            "names": {"PT": {"Y": ["DNA repair"], "N": []}}
        }));
        assert!(matches!(
            build_node(spec, "GO:0006281", &entity, &test_prefix_map(), &test_tui_map()),
            Err(UmlsError::GoNamespace { found: 0, .. })
        ));
    }

    #[test]
    fn unknown_tui_combination_is_a_typed_error() {
        let spec = sources::lookup("ATC").unwrap();
        let entity = entity(json!({
            "tuis": ["T999"],
            "names": {"PT": {"Y": ["thing"], "N": []}}
        }));
        assert!(matches!(
            build_node(spec, "X01", &entity, &test_prefix_map(), &test_tui_map()),
            Err(UmlsError::UnknownTuiCombination { .. })
        ));
    }

    fn write_fixture_mappings(dir: &Path) {
        fs::write(
            dir.join("curies-to-uri.yaml"),
            concat!(
                "use_for_bidirectional_mapping:\n",
                "  - MESH: \"http://id.nlm.nih.gov/mesh/\"\n",
                "  - UMLS: \"https://uts.nlm.nih.gov/uts/umls/concept/\"\n",
            ),
        )
        .unwrap();
        fs::write(
            dir.join("tui-mappings.json"),
            serde_json::to_string(&json!({
                "('T109',)": "chemical substance"
            }))
            .unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn ingest_writes_nodes_and_an_empty_edges_file() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_mappings(dir.path());
        let lines = [
            json!({"('MSH', 'D001241')": {
                "cuis": ["C0004057"],
                "tuis": ["T109"],
                "names": {"MH": {"Y": ["Aspirin"], "N": ["ASA"]}}
            }}),
            json!({"('NOCODE', 'MTH')": {}}),
            json!({"('SNOMEDCT_US', '387458008')": {
                "tuis": ["T109"],
                "names": {"PT": {"Y": ["unsupported"], "N": []}}
            }}),
        ];
        let body: String = lines.iter().map(|l| format!("{l}\n")).collect();
        fs::write(dir.path().join("items.jsonl"), body).unwrap();

        let config = UmlsIngestConfig {
            input_path: dir.path().join("items.jsonl"),
            nodes_out_path: dir.path().join("nodes.jsonl"),
            edges_out_path: dir.path().join("edges.jsonl"),
            curie_uri_map_path: dir.path().join("curies-to-uri.yaml"),
            tui_mapping_path: dir.path().join("tui-mappings.json"),
            test_mode: false,
        };
        let summary = run_ingest(&config).unwrap();
        assert_eq!(summary.items, 3);
        assert_eq!(summary.nodes, 1);

        let nodes_body = fs::read_to_string(dir.path().join("nodes.jsonl")).unwrap();
        let node: Node = serde_json::from_str(nodes_body.lines().next().unwrap()).unwrap();
        assert_eq!(node.id, "MESH:D001241");
        assert_eq!(node.name.as_deref(), Some("Aspirin"));
        assert_eq!(node.synonym, vec!["ASA".to_string()]);
        assert_eq!(node.provided_by, vec!["umls_source:MSH".to_string()]);

        let edges_body = fs::read_to_string(dir.path().join("edges.jsonl")).unwrap();
        assert!(edges_body.is_empty());
    }
}
