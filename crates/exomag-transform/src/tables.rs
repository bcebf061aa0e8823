//! The ExomAG registry mapping tables.
//!
//! Configuration data, not logic: both registry template variants are
//! declared here in full, column by column, together with their inclusion
//! filters. The two variants share the same 36-column structure; they differ
//! in which age column they fill and which date anchors the diagnostics
//! start (`Datum Einschluss` for [`TableVariant::Inclusion`],
//! `Datum Labor-Eingang` for [`TableVariant::LabEntry`]).

use exomag_model::TableVariant;

use crate::filter::FilterRule;
use crate::pipeline::{Mapping, MappingTable};
use crate::steps::{AgeUnit, LookupFallback, Step};

/// A mapping-table variant bundled with its static filter rules.
#[derive(Debug, Clone)]
pub struct ExportProfile {
    pub variant: TableVariant,
    pub table: MappingTable,
    pub filters: Vec<FilterRule>,
}

/// Resolve the profile for a configured variant.
pub fn profile(variant: TableVariant) -> ExportProfile {
    match variant {
        TableVariant::Inclusion => ExportProfile {
            variant,
            table: inclusion_table(),
            filters: case_filters(),
        },
        TableVariant::LabEntry => ExportProfile {
            variant,
            table: lab_entry_table(),
            filters: case_filters(),
        },
    }
}

/// Only actual sequencing cases are exported.
fn case_filters() -> Vec<FilterRule> {
    vec![FilterRule::new("Falltyp", ["Single", "Duo", "Trio"])]
}

/// Registry template, age in months at the inclusion date.
fn inclusion_table() -> MappingTable {
    MappingTable::new(vec![
        Mapping::field("internal case ID", "Medgen ID"),
        Mapping::constant("sequencing lab", "LaborBerlin"),
        Mapping::constant("GestaltMatcher ID", ""),
        Mapping::constant("prenatal", ""),
        Mapping::constant("DoB", ""),
        Mapping::new(
            "age in months",
            &["Birthdate", "Datum Einschluss"],
            vec![Step::Age(AgeUnit::Months)],
        ),
        Mapping::constant("age in years", ""),
        Mapping::field("sex", "Gender"),
        Mapping::new(
            "referring clinician",
            &["Clinician"],
            vec![
                Step::One,
                Step::One,
                Step::FormatTemplate("{Title} {Firstname} {Lastname} ({Email})".into()),
            ],
        ),
        Mapping::new(
            "Start der Diagnostik",
            &["Datum Einschluss"],
            vec![Step::One, Step::FormatDate],
        ),
        Mapping::new(
            "Befunddatum",
            &["Datum Befund"],
            vec![Step::One, Step::FormatDate],
        ),
        Mapping::new("HPO terms", &["HPO Terms"], vec![Step::One, Step::CleanHpo]),
        Mapping::new(
            "bisherige Diagnostik",
            &["Bisherige Diagnostik"],
            vec![Step::One, Step::Join(", ".into())],
        ),
        Mapping::field("single/duo/trio", "Analysezahl"),
        Mapping::field("Selektivvertrag", "Vertrag"),
        Mapping::constant("disease category", ""),
        Mapping::new(
            "case solved/unsolved/unclear",
            &["Case Status"],
            vec![
                Step::One,
                Step::lookup([("VUS", "unclear")], LookupFallback::PassThrough),
            ],
        ),
        Mapping::constant("changes in management/therapy after test", ""),
        Mapping::constant("relevant findings for research", ""),
        Mapping::field("Test conducted", "Falltyp"),
        Mapping::constant("wet lab meta info", ""),
        Mapping::constant("AutoCasc", ""),
        Mapping::constant("autozygosity", ""),
        Mapping::new(
            "gene",
            &["Findings"],
            vec![
                Step::One,
                Step::Concat {
                    sep: "/".into(),
                    inner: vec![Step::FormatTemplate("{Genename}".into())],
                },
            ],
        ),
        Mapping::constant("variant_solves_case", ""),
        Mapping::constant("if new disease gene, level of evidence", ""),
        Mapping::constant("pmid", ""),
        Mapping::constant("ISCN", ""),
        Mapping::constant("HGVS_gDNA", ""),
        Mapping::new(
            "HGVS_cDNA",
            &["Findings"],
            vec![
                Step::One,
                Step::One,
                Step::Select("HGVS".into()),
                Step::regex(r"c\.[^ ;,]+"),
            ],
        ),
        Mapping::new(
            "HGVS_protein",
            &["Findings"],
            vec![
                Step::One,
                Step::One,
                Step::Select("HGVS".into()),
                Step::regex(r"p\.[^ ;,]+"),
            ],
        ),
        Mapping::new(
            "ACMG class",
            &["Findings"],
            vec![Step::One, Step::One, Step::Select("ACMG".into())],
        ),
        Mapping::constant("zygosity", ""),
        Mapping::constant("de novo", ""),
        Mapping::constant("mode of inheritance", ""),
        Mapping::constant("ClinVar Accession ID", ""),
    ])
}

/// Registry template, age in years at the lab-entry date.
fn lab_entry_table() -> MappingTable {
    MappingTable::new(vec![
        Mapping::field("internal case ID", "Medgen ID"),
        Mapping::constant("sequencing lab", "LaborBerlin"),
        Mapping::constant("GestaltMatcher ID", ""),
        Mapping::constant("prenatal", ""),
        Mapping::constant("DoB", ""),
        Mapping::constant("age in months", ""),
        Mapping::new(
            "age in years",
            &["Birthdate", "Datum Labor-Eingang"],
            vec![Step::Age(AgeUnit::Years)],
        ),
        Mapping::field("sex", "Gender"),
        Mapping::new(
            "referring clinician",
            &["Clinician"],
            vec![
                Step::One,
                Step::One,
                Step::FormatTemplate("{Title} {Firstname} {Lastname} ({Email})".into()),
            ],
        ),
        Mapping::new(
            "Start der Diagnostik",
            &["Datum Labor-Eingang"],
            vec![Step::One, Step::FormatDate],
        ),
        Mapping::new(
            "Befunddatum",
            &["Datum Befund"],
            vec![Step::One, Step::FormatDate],
        ),
        Mapping::new("HPO terms", &["HPO Terms"], vec![Step::One, Step::CleanHpo]),
        Mapping::new(
            "bisherige Diagnostik",
            &["Bisherige Diagnostik"],
            vec![Step::One, Step::Join(", ".into())],
        ),
        Mapping::field("single/duo/trio", "Analysezahl"),
        Mapping::field("Selektivvertrag", "Vertrag"),
        Mapping::constant("disease category", ""),
        Mapping::new(
            "case solved/unsolved/unclear",
            &["Case Status"],
            vec![
                Step::One,
                Step::lookup([("VUS", "unclear")], LookupFallback::PassThrough),
            ],
        ),
        Mapping::constant("changes in management/therapy after test", ""),
        Mapping::constant("relevant findings for research", ""),
        Mapping::field("Test conducted", "Falltyp"),
        Mapping::constant("wet lab meta info", ""),
        Mapping::constant("AutoCasc", ""),
        Mapping::constant("autozygosity", ""),
        Mapping::new(
            "gene",
            &["Findings"],
            vec![
                Step::One,
                Step::Concat {
                    sep: "/".into(),
                    inner: vec![Step::FormatTemplate("{Genename}".into())],
                },
            ],
        ),
        Mapping::constant("variant_solves_case", ""),
        Mapping::constant("if new disease gene, level of evidence", ""),
        Mapping::constant("pmid", ""),
        Mapping::constant("ISCN", ""),
        Mapping::constant("HGVS_gDNA", ""),
        Mapping::new(
            "HGVS_cDNA",
            &["Findings"],
            vec![
                Step::One,
                Step::One,
                Step::Select("HGVS".into()),
                Step::regex(r"c\.[^ ;,]+"),
            ],
        ),
        Mapping::new(
            "HGVS_protein",
            &["Findings"],
            vec![
                Step::One,
                Step::One,
                Step::Select("HGVS".into()),
                Step::regex(r"p\.[^ ;,]+"),
            ],
        ),
        Mapping::new(
            "ACMG class",
            &["Findings"],
            vec![Step::One, Step::One, Step::Select("ACMG".into())],
        ),
        Mapping::constant("zygosity", ""),
        Mapping::constant("de novo", ""),
        Mapping::constant("mode of inheritance", ""),
        Mapping::constant("ClinVar Accession ID", ""),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_share_column_structure() {
        let inclusion = profile(TableVariant::Inclusion);
        let lab_entry = profile(TableVariant::LabEntry);

        assert_eq!(inclusion.table.columns(), lab_entry.table.columns());
        assert_eq!(inclusion.table.len(), 36);
    }

    #[test]
    fn column_order_matches_registry_template() {
        let columns = profile(TableVariant::Inclusion).table.columns();
        assert_eq!(columns[0], "internal case ID");
        assert_eq!(columns[5], "age in months");
        assert_eq!(columns[6], "age in years");
        assert_eq!(columns[35], "ClinVar Accession ID");
    }

    #[test]
    fn variants_disagree_only_on_age_and_start_date() {
        let inclusion = profile(TableVariant::Inclusion).table;
        let lab_entry = profile(TableVariant::LabEntry).table;

        let differing: Vec<&str> = inclusion
            .mappings()
            .iter()
            .zip(lab_entry.mappings())
            .filter(|(a, b)| a != b)
            .map(|(a, _)| a.destination.as_str())
            .collect();
        assert_eq!(
            differing,
            vec!["age in months", "age in years", "Start der Diagnostik"]
        );
    }

    #[test]
    fn both_variants_filter_on_case_type() {
        for variant in [TableVariant::Inclusion, TableVariant::LabEntry] {
            let profile = profile(variant);
            assert_eq!(profile.filters.len(), 1);
            assert_eq!(profile.filters[0].field, "Falltyp");
        }
    }
}
