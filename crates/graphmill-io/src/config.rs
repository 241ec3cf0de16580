//! The small configuration inputs that steer a run.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Load a whole YAML file into a deserializable table.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// First non-blank line of the version file, trimmed.
pub fn read_version_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading version file {}", path.display()))?;
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("version file {} has no non-blank line", path.display()))
}

/// Bidirectional CURIE-prefix / URI-prefix map.
///
/// Loaded from the `use_for_bidirectional_mapping` section of the prefix-map
/// YAML, which is a list of single-entry `prefix: uri` maps.
#[derive(Debug, Clone, Default)]
pub struct CurieUriMap {
    expand: BTreeMap<String, String>,
    contract: BTreeMap<String, String>,
}

impl CurieUriMap {
    pub fn load(path: &Path) -> Result<Self> {
        #[derive(Deserialize)]
        struct PrefixMapFile {
            use_for_bidirectional_mapping: Vec<BTreeMap<String, String>>,
        }
        let file: PrefixMapFile = load_yaml(path)?;
        let mut map = CurieUriMap::default();
        for entry in file.use_for_bidirectional_mapping {
            for (prefix, uri) in entry {
                map.insert(prefix, uri);
            }
        }
        Ok(map)
    }

    pub fn insert(&mut self, prefix: String, uri: String) {
        self.expand.insert(prefix.clone(), uri.clone());
        self.contract.insert(uri, prefix);
    }

    /// URI prefix for a CURIE prefix, if the prefix is recognized.
    pub fn expand_prefix(&self, curie_prefix: &str) -> Option<&str> {
        self.expand.get(curie_prefix).map(String::as_str)
    }

    /// Full URI for a CURIE, if its prefix is recognized.
    pub fn expand_curie(&self, curie: &str) -> Option<String> {
        let (prefix, local_id) = curie.split_once(':')?;
        self.expand_prefix(prefix)
            .map(|uri| format!("{uri}{local_id}"))
    }

    /// CURIE for a URI, matching the longest registered URI prefix.
    pub fn contract_uri(&self, uri: &str) -> Option<String> {
        self.contract
            .iter()
            .filter(|(uri_prefix, _)| uri.starts_with(uri_prefix.as_str()))
            .max_by_key(|(uri_prefix, _)| uri_prefix.len())
            .map(|(uri_prefix, prefix)| format!("{}:{}", prefix, &uri[uri_prefix.len()..]))
    }

    pub fn len(&self) -> usize {
        self.expand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expand.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn prefix_map_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            concat!(
                "use_for_bidirectional_mapping:\n",
                "  - GO: \"http://purl.obolibrary.org/obo/GO_\"\n",
                "  - biolink: \"https://w3id.org/biolink/vocab/\"\n",
                "  - NCBIGene: \"http://identifiers.org/ncbigene/\"\n",
            )
            .as_bytes(),
        )
        .unwrap();
        file
    }

    #[test]
    fn expands_known_prefixes_and_curies() {
        let map = CurieUriMap::load(prefix_map_file().path()).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(
            map.expand_prefix("GO"),
            Some("http://purl.obolibrary.org/obo/GO_")
        );
        assert_eq!(
            map.expand_curie("GO:0005575").as_deref(),
            Some("http://purl.obolibrary.org/obo/GO_0005575")
        );
        assert_eq!(map.expand_prefix("REL"), None);
        assert_eq!(map.expand_curie("no_colon"), None);
    }

    #[test]
    fn contracts_by_longest_uri_prefix() {
        let mut map = CurieUriMap::default();
        map.insert("OBO".to_string(), "http://purl.obolibrary.org/obo/".to_string());
        map.insert(
            "GO".to_string(),
            "http://purl.obolibrary.org/obo/GO_".to_string(),
        );
        assert_eq!(
            map.contract_uri("http://purl.obolibrary.org/obo/GO_0005575")
                .as_deref(),
            Some("GO:0005575")
        );
        assert_eq!(
            map.contract_uri("http://purl.obolibrary.org/obo/SO_1")
                .as_deref(),
            Some("OBO:SO_1")
        );
        assert_eq!(map.contract_uri("http://example.org/x"), None);
    }

    #[test]
    fn version_file_takes_the_first_non_blank_line() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\n  \n2.10.1\nignored\n").unwrap();
        assert_eq!(read_version_file(file.path()).unwrap(), "2.10.1");
    }

    #[test]
    fn empty_version_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\n \n").unwrap();
        assert!(read_version_file(file.path()).is_err());
    }
}
