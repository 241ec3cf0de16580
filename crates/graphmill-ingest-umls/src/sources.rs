//! The supported-source table.
//!
//! One entry per Metathesaurus source vocabulary we extract, carrying the
//! CURIE prefix the ids are published under, the provenance code appended
//! to `umls_source:`, an optional redundant id prefix to strip, and the
//! name-accession hierarchy: term types in precedence order, mined from the
//! Metathesaurus precedence and suppressibility tables.
//!
//! Sources whose CURIE prefix is `UMLS` have no stable code of their own;
//! their items are identified by the concept CUI instead and dropped when
//! the CUI is not unique.

/// CURIE prefix marking CUI-identified sources.
pub const UMLS_CURIE_PREFIX: &str = "UMLS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpec {
    /// Source vocabulary label as it appears in the dump.
    pub source: &'static str,
    /// CURIE prefix for published node ids.
    pub curie_prefix: &'static str,
    /// Code appended to `umls_source:` for provenance.
    pub provenance_code: &'static str,
    /// Prefix the dump repeats inside the raw id, removed before use.
    pub strip_prefix: Option<&'static str>,
    /// Term types in name-precedence order.
    pub tty_hierarchy: &'static [&'static str],
}

impl SourceSpec {
    /// Whether items are identified by their (unique) concept CUI.
    pub fn cui_identified(&self) -> bool {
        self.curie_prefix == UMLS_CURIE_PREFIX
    }
}

pub const SOURCES: &[SourceSpec] = &[
    SourceSpec {
        source: "ATC",
        curie_prefix: "ATC",
        provenance_code: "ATC",
        strip_prefix: None,
        tty_hierarchy: &["RXN_PT", "PT", "RXN_IN", "IN"],
    },
    SourceSpec {
        source: "CHV",
        curie_prefix: "CHV",
        provenance_code: "CHV",
        strip_prefix: None,
        tty_hierarchy: &["PT", "SY"],
    },
    SourceSpec {
        source: "DRUGBANK",
        curie_prefix: "DRUGBANK",
        provenance_code: "DRUGBANK",
        strip_prefix: None,
        tty_hierarchy: &["IN", "SY", "FSY"],
    },
    SourceSpec {
        source: "FMA",
        curie_prefix: "FMA",
        provenance_code: "FMA",
        strip_prefix: None,
        tty_hierarchy: &["PT", "SY", "AB", "OP", "IS"],
    },
    SourceSpec {
        source: "GO",
        curie_prefix: "GO",
        provenance_code: "GO",
        strip_prefix: Some("GO:"),
        tty_hierarchy: &[
            "PT", "MTH_PT", "ET", "MTH_ET", "SY", "MTH_SY", "OP", "MTH_OP", "OET",
            "MTH_OET", "IS", "MTH_IS",
        ],
    },
    SourceSpec {
        source: "HCPCS",
        curie_prefix: "HCPCS",
        provenance_code: "HCPCS",
        strip_prefix: None,
        tty_hierarchy: &["PT", "MP", "MTH_HT"],
    },
    SourceSpec {
        source: "HGNC",
        curie_prefix: "HGNC",
        provenance_code: "HGNC",
        strip_prefix: Some("HGNC:"),
        tty_hierarchy: &["PT", "ACR", "MTH_ACR", "NA", "SYN", "NP", "NS"],
    },
    SourceSpec {
        source: "HL7V3.0",
        curie_prefix: UMLS_CURIE_PREFIX,
        provenance_code: "HL7",
        strip_prefix: None,
        tty_hierarchy: &["CSY", "PT", "CDO", "VS", "BR", "CPR", "CR", "NPT"],
    },
    SourceSpec {
        source: "HPO",
        curie_prefix: "HP",
        provenance_code: "HP",
        strip_prefix: Some("HP:"),
        tty_hierarchy: &["PT", "SY", "ET", "OP", "IS", "OET"],
    },
    SourceSpec {
        source: "ICD10PCS",
        curie_prefix: "ICD10PCS",
        provenance_code: "ICD10PCS",
        strip_prefix: None,
        tty_hierarchy: &["PT", "PX", "HX", "MTH_HX", "HT", "HS", "AB"],
    },
    SourceSpec {
        source: "ICD9CM",
        curie_prefix: "ICD9",
        provenance_code: "ICD9CM",
        strip_prefix: None,
        tty_hierarchy: &["PT", "HT", "AB"],
    },
    SourceSpec {
        source: "MED-RT",
        curie_prefix: UMLS_CURIE_PREFIX,
        provenance_code: "MED-RT",
        strip_prefix: None,
        tty_hierarchy: &["PT", "FN", "SY"],
    },
    SourceSpec {
        source: "MEDLINEPLUS",
        curie_prefix: UMLS_CURIE_PREFIX,
        provenance_code: "MEDLINEPLUS",
        strip_prefix: None,
        tty_hierarchy: &["PT", "ET", "SY", "HT"],
    },
    SourceSpec {
        source: "MSH",
        curie_prefix: "MESH",
        provenance_code: "MSH",
        strip_prefix: None,
        tty_hierarchy: &[
            "MH", "TQ", "PEP", "ET", "XQ", "PXQ", "NM", "N1", "PCE", "CE", "HT", "HS",
            "DEV", "DSV", "QAB", "QEV", "QSV", "PM",
        ],
    },
    SourceSpec {
        source: "MTH",
        curie_prefix: UMLS_CURIE_PREFIX,
        provenance_code: "MTH",
        strip_prefix: None,
        tty_hierarchy: &["PN", "CV", "XM", "PT", "SY", "RT", "DT"],
    },
    SourceSpec {
        source: "NCBI",
        curie_prefix: "NCBITaxon",
        provenance_code: "NCBITaxon",
        strip_prefix: None,
        tty_hierarchy: &["SCN", "USN", "USY", "SY", "UCN", "CMN", "UE", "EQ"],
    },
    SourceSpec {
        source: "NCI",
        curie_prefix: "NCIT",
        provenance_code: "NCI",
        strip_prefix: None,
        tty_hierarchy: &[
            "PT", "SY", "CSN", "DN", "FBD", "HD", "CCN", "AD", "CA2", "CA3", "BN", "AB",
            "CCS", "OP",
        ],
    },
    SourceSpec {
        source: "NDDF",
        curie_prefix: "NDDF",
        provenance_code: "NDDF",
        strip_prefix: None,
        tty_hierarchy: &["MTH_RXN_CDC", "CDC", "CDD", "CDA", "IN", "DF"],
    },
    SourceSpec {
        source: "OMIM",
        curie_prefix: "OMIM",
        provenance_code: "OMIM",
        strip_prefix: None,
        tty_hierarchy: &[
            "PT", "PHENO", "PHENO_ET", "PTAV", "PTCS", "ETAL", "ET", "HT", "ACR",
        ],
    },
    SourceSpec {
        source: "PDQ",
        curie_prefix: "PDQ",
        provenance_code: "PDQ",
        strip_prefix: None,
        tty_hierarchy: &[
            "PT", "HT", "PSC", "SY", "ET", "CU", "LV", "ACR", "AB", "BN", "FBD", "CCN",
            "CHN", "OP", "IS",
        ],
    },
    SourceSpec {
        source: "PSY",
        curie_prefix: "PSY",
        provenance_code: "PSY",
        strip_prefix: None,
        tty_hierarchy: &["PT", "HT", "ET"],
    },
    SourceSpec {
        source: "RXNORM",
        curie_prefix: "RXNORM",
        provenance_code: "RXNORM",
        strip_prefix: None,
        tty_hierarchy: &[
            "SCD", "SBD", "SCDG", "SBDG", "BPCK", "GPCK", "IN", "PSN", "MIN", "SCDF",
            "SBDF", "SCDC", "DFG", "DF", "SBDC", "BN", "PIN", "TMSY", "SY", "ET",
        ],
    },
    SourceSpec {
        source: "VANDF",
        curie_prefix: "VANDF",
        provenance_code: "VANDF",
        strip_prefix: None,
        tty_hierarchy: &["PT", "CD", "IN", "AB", "MTH_RXN_CD"],
    },
];

pub fn lookup(source: &str) -> Option<&'static SourceSpec> {
    SOURCES.iter().find(|spec| spec.source == source)
}

// ============================================================================
// Tests
// ============================================================================
