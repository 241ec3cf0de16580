//! CURIE helpers and shared vocabulary constants.

/// CURIE prefix of the controlled predicate vocabulary. Source predicates
/// carrying this prefix may pass through the filter stage without a remap
/// rule; every other prefix must be configured.
pub const BIOLINK_CURIE_PREFIX: &str = "biolink";

/// Category assigned to synthetic data-source nodes such as the build node.
pub const SOURCE_NODE_CATEGORY: &str = "data source";

/// The prefix of a CURIE, or `None` when the string has no colon at all.
pub fn curie_prefix(curie: &str) -> Option<&str> {
    curie.split_once(':').map(|(prefix, _)| prefix)
}

/// Whether a curie belongs to the controlled predicate vocabulary.
pub fn is_biolink_curie(curie: &str) -> bool {
    curie_prefix(curie) == Some(BIOLINK_CURIE_PREFIX)
}

/// `lower_snake_case` to `lowerCamelCase`. The first word is kept as-is;
/// each following word gets its first character uppercased.
pub fn snake_to_camel(s: &str) -> String {
    let mut words = s.split('_');
    let mut out = String::with_capacity(s.len());
    if let Some(first) = words.next() {
        out.push_str(first);
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
