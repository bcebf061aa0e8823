//! Integration test: dump file in, registry CSV out.

use exomag_cli::pipeline::{load_config, run_transfer};

const DUMP: &str = r#"{
    "root": {
        "1": {
            "Birthdate": "2019-02-10",
            "Datum Einschluss": "2021-03-07",
            "Datum Befund": "2021-09-30",
            "Gender": "female",
            "Clinician": ["5"],
            "HPO Terms": "seizures HPO:0001250 and HPO:0001263",
            "Bisherige Diagnostik": ["Karyotyping"],
            "Analysezahl": "Trio",
            "Vertrag": "Selektivvertrag",
            "Case Status": "VUS",
            "Falltyp": "Trio",
            "Findings": ["9"]
        },
        "2": {
            "Birthdate": "",
            "Datum Einschluss": "2021-05-01",
            "Datum Befund": "",
            "Gender": "male",
            "Clinician": [],
            "HPO Terms": null,
            "Bisherige Diagnostik": [],
            "Analysezahl": "",
            "Vertrag": "",
            "Case Status": "unsolved",
            "Falltyp": "Beratung",
            "Findings": []
        }
    },
    "links": {
        "Clinician": {
            "5": {
                "Title": "Dr.",
                "Firstname": "Anna",
                "Lastname": "Weber",
                "Email": "anna.weber@charite.example"
            }
        },
        "Findings": {
            "9": {
                "Genename": "SCN1A",
                "HGVS": "c.602G>A p.Arg201His",
                "ACMG": "likely pathogenic"
            }
        }
    }
}"#;

fn write_fixtures(dir: &std::path::Path) -> std::path::PathBuf {
    let dump_path = dir.join("dump.json");
    std::fs::write(&dump_path, DUMP).expect("write dump");

    let config_path = dir.join("exomag.toml");
    std::fs::write(
        &config_path,
        format!(
            "[source]\nkind = \"json\"\n\n[json]\npath = \"{}\"\n",
            dump_path.display()
        ),
    )
    .expect("write config");
    config_path
}

#[test]
fn transfer_writes_filtered_export() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = load_config(&write_fixtures(dir.path())).expect("load config");

    let output = dir.path().join("export.csv");
    let summary = run_transfer(&config, Some(&output)).expect("run transfer");

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.exported, 1);
    assert_eq!(summary.columns, 36);

    let written = std::fs::read_to_string(&output).expect("read export");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("internal case ID,sequencing lab,"));

    // Case 1: 24 completed months between birth and inclusion date.
    assert!(lines[1].starts_with("SV-1,LaborBerlin,,,,24,,female,"));
    assert!(lines[1].contains("Dr. Anna Weber (anna.weber@charite.example)"));
    assert!(lines[1].contains("07.03.2021"));
    assert!(lines[1].contains("HPO:0001250,HPO:0001263"));
    assert!(lines[1].contains("SCN1A"));
    assert!(lines[1].contains("c.602G>A"));
    assert!(lines[1].contains("p.Arg201His"));
    assert!(lines[1].contains("unclear"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = load_config(&write_fixtures(dir.path())).expect("load config");

    let summary = run_transfer(&config, None).expect("run transfer");
    assert_eq!(summary.exported, 1);
    assert!(summary.output.is_none());
    assert!(!dir.path().join("export.csv").exists());
}
