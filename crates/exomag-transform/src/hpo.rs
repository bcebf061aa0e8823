//! HPO-identifier extraction from free-text clinical strings.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `HP:nnn` / `HPO:nnn` identifiers anywhere in free text. Both
/// prefixes occur in hand-entered phenotype descriptions.
static HPO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HPO?:\d+").expect("valid HPO pattern"));

/// Collect every HPO identifier in the text, comma-joined, in order of
/// appearance. Extraction only: duplicates are preserved and identifiers
/// are not checked against the ontology.
pub fn extract_hpo_terms(text: &str) -> String {
    let terms: Vec<&str> = HPO_ID_REGEX.find_iter(text).map(|m| m.as_str()).collect();
    terms.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_free_text() {
        assert_eq!(
            extract_hpo_terms("Patient has HPO:0001250 and HPO:0001263"),
            "HPO:0001250,HPO:0001263"
        );
    }

    #[test]
    fn accepts_short_prefix() {
        assert_eq!(
            extract_hpo_terms("HP:0004322; severe short stature"),
            "HP:0004322"
        );
    }

    #[test]
    fn idempotent_on_clean_strings() {
        let clean = "HPO:0001250,HPO:0001263";
        assert_eq!(extract_hpo_terms(clean), clean);
    }

    #[test]
    fn preserves_duplicates_and_order() {
        assert_eq!(
            extract_hpo_terms("HPO:2 then HPO:1 then HPO:2"),
            "HPO:2,HPO:1,HPO:2"
        );
    }

    #[test]
    fn no_identifiers_yields_empty() {
        assert_eq!(extract_hpo_terms("unremarkable phenotype"), "");
        assert_eq!(extract_hpo_terms(""), "");
    }
}
