//! DGIdb drug-gene interaction ingest.
//!
//! Reads the DGIdb `interactions.tsv` dump and produces a graph document
//! of chemical-to-gene edges:
//!
//! - genes are referenced as `NCBIGene:` curies and never minted as nodes
//!   here; the gene nodes come from other ingests,
//! - drugs resolve to `CHEMBL.COMPOUND:` references when the row carries a
//!   ChEMBL id; otherwise a claim-level chemical node is minted for the
//!   GuideToPharmacology and TTD claim sources,
//! - each interaction type on a row becomes one edge whose source
//!   predicate is `DGIDB:<interaction>`.
//!
//! Rows without a gene id are skipped silently; rows whose drug cannot be
//! resolved to any controlled id are skipped with a warning.

use anyhow::{Context, Result};
use graphmill_schema::{make_edge_id, snake_to_camel, Edge, Graph, Node};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

pub const DGIDB_BASE_IRI: &str = "http://www.dgidb.org";
pub const DGIDB_CURIE_PREFIX: &str = "DGIDB";

pub const GTPI_IRI_BASE: &str = "https://www.guidetopharmacology.org/";
pub const GTPI_CURIE_PREFIX: &str = "GTPI";
pub const GTPI_LIGAND_SUFFIX: &str = "GRAC/LigandDisplayForward?ligandId=";

pub const TTD_IRI_BASE: &str = "https://db.idrblab.org/ttd/";
pub const TTD_CURIE_PREFIX: &str = "TTD";

/// Claim source labels as they appear in the `interaction_claim_source`
/// column.
const CLAIM_SOURCE_GTPI: &str = "GuideToPharmacologyInteractions";
const CLAIM_SOURCE_TTD: &str = "TTD";

const CHEMICAL_SUBSTANCE_CATEGORY: &str = "chemical_substance";
const FIELD_COUNT: usize = 10;
const TEST_MODE_ROW_CAP: u64 = 10_000;

/// Some GtP claim names carry an inline citation, e.g.
/// `compound 10a [PMID: 22546090]`; the name is everything before the
/// bracket and the PMID becomes a node publication.
const PMID_PATTERN: &str = r"^([^\[]+)[\[,\{](PMID: \d+)";

#[derive(Debug, Error)]
pub enum DgidbError {
    #[error("line {line}: expected {FIELD_COUNT} tab-separated fields, found {found}")]
    MalformedRow { line: u64, found: usize },
}

/// Parse the interactions dump into a graph document.
///
/// Test mode stops after the first 10,000 data rows.
pub fn build_graph(input_path: &Path, test_mode: bool) -> Result<Graph> {
    let file = File::open(input_path)
        .with_context(|| format!("opening {}", input_path.display()))?;
    let reader = BufReader::new(file);
    let re_pmid = Regex::new(PMID_PATTERN).unwrap();

    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut update_date: Option<String> = None;
    let mut row_count: u64 = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_no = (index + 1) as u64;
        let line = line
            .with_context(|| format!("reading {} line {line_no}", input_path.display()))?;
        if line.starts_with('#') {
            update_date = Some(line.replace('#', ""));
            continue;
        }
        if line.starts_with("gene_name\t") {
            continue;
        }
        row_count += 1;
        if test_mode && row_count > TEST_MODE_ROW_CAP {
            break;
        }

        // Layout: gene_name, gene_claim_name, entrez_id,
        // interaction_claim_source, interaction_types, drug_claim_name,
        // drug_claim_primary_name, drug_name, drug_chembl_id, PMIDs.
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != FIELD_COUNT {
            return Err(DgidbError::MalformedRow {
                line: line_no,
                found: fields.len(),
            }
            .into());
        }
        let entrez_id = fields[2];
        let interaction_claim_source = fields[3];
        let interaction_types = fields[4];
        let drug_claim_name = fields[5];
        let drug_claim_primary_name = fields[6];
        let drug_chembl_id = fields[8];
        let pmids = fields[9];

        if entrez_id.is_empty() {
            continue;
        }
        let object_id = format!("NCBIGene:{entrez_id}");

        let subject_id = if !drug_chembl_id.is_empty() {
            Some(format!("CHEMBL.COMPOUND:{drug_chembl_id}"))
        } else if !drug_claim_name.is_empty() {
            claim_node(
                interaction_claim_source,
                drug_claim_name,
                drug_claim_primary_name,
                update_date.as_deref(),
                &re_pmid,
            )
            .map(|node| {
                let id = node.id.clone();
                nodes.push(node);
                id
            })
        } else {
            None
        };
        let Some(subject_id) = subject_id else {
            warn!(
                drug = drug_claim_primary_name,
                source = interaction_claim_source,
                "no controlled id for this drug claim; row skipped"
            );
            continue;
        };

        let interaction_types = if interaction_types.is_empty() {
            "affects"
        } else {
            interaction_types
        };
        let publications: Vec<String> = if pmids.trim().is_empty() {
            Vec::new()
        } else {
            pmids
                .split(',')
                .map(|pmid| format!("PMID:{}", pmid.trim()))
                .collect()
        };

        for interaction in interaction_types.split(',') {
            let interaction = interaction.replace(' ', "_");
            let source_predicate = format!("{DGIDB_CURIE_PREFIX}:{interaction}");
            let id = make_edge_id(&subject_id, &source_predicate, &object_id, DGIDB_BASE_IRI);
            let mut edge =
                Edge::new(id, subject_id.clone(), object_id.clone(), interaction.as_str());
            edge.relation = Some(format!("{DGIDB_BASE_IRI}/{}", snake_to_camel(&interaction)));
            edge.source_predicate = Some(source_predicate);
            edge.primary_knowledge_source = Some(DGIDB_BASE_IRI.to_string());
            edge.update_date = update_date.clone();
            edge.publications = publications.clone();
            edges.push(edge);
        }
    }

    info!(
        rows = row_count,
        nodes = nodes.len(),
        edges = edges.len(),
        "interactions ingested"
    );
    Ok(Graph::new(nodes, edges))
}

/// Mint a chemical node for a drug claim with no ChEMBL id, or `None` when
/// the claim source is not one we mint for.
fn claim_node(
    claim_source: &str,
    drug_claim_name: &str,
    drug_claim_primary_name: &str,
    update_date: Option<&str>,
    re_pmid: &Regex,
) -> Option<Node> {
    let mut node = match claim_source {
        CLAIM_SOURCE_GTPI => {
            let mut node = Node::new(format!("{GTPI_CURIE_PREFIX}:{drug_claim_name}"));
            match re_pmid.captures(drug_claim_primary_name) {
                Some(caps) => {
                    node.name = Some(caps[1].trim().to_string());
                    node.publications = vec![caps[2].replace(' ', "")];
                }
                None => {
                    node.name = Some(drug_claim_primary_name.to_string());
                }
            }
            node.iri = Some(format!("{GTPI_IRI_BASE}{GTPI_LIGAND_SUFFIX}{drug_claim_name}"));
            node.provided_by = vec![GTPI_IRI_BASE.to_string()];
            node
        }
        CLAIM_SOURCE_TTD => {
            let mut node = Node::new(format!("{TTD_CURIE_PREFIX}:{drug_claim_name}"));
            node.name = Some(drug_claim_primary_name.to_string());
            node.iri = Some(format!("{TTD_IRI_BASE}{drug_claim_name}"));
            node.provided_by = vec![TTD_IRI_BASE.to_string()];
            node
        }
        _ => return None,
    };
    node.category = Some(CHEMICAL_SUBSTANCE_CATEGORY.to_string());
    node.update_date = update_date.map(str::to_string);
    Some(node)
}

// ============================================================================
// Tests
// ============================================================================
