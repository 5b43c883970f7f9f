// join_pipeline.rs - End-to-end join through the public API

use std::fs;
use std::path::{Path, PathBuf};
use ukbprep::output::{summary_path, write_joined, write_summary, RunSummary};
use ukbprep::prelude::*;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let phenotypes = write(dir, "pheno.csv", "eid,age,PHQ9_binary\n5,40,1\n7,55,0\n9,61,1\n");
    let link = write(
        dir,
        "ukb_imp_chr1.sample",
        "ID_1 ID_2 missing sex\n0 0 0 D\n5 5 0 1\n-1 -1 0 2\n7 7 0 1\n12 12 0 2\n",
    );
    (phenotypes, link)
}

#[test]
fn test_join_follows_link_order_and_skips_withdrawn() {
    let dir = tempfile::tempdir().unwrap();
    let (phenotypes, link) = fixtures(dir.path());

    let joined = DataLoader::new().load_and_join(&phenotypes, &link).unwrap();

    let ids: Vec<i64> = joined.rows.iter().map(|r| r.participant_id).collect();
    let positions: Vec<usize> = joined.rows.iter().map(|r| r.position).collect();
    assert_eq!(ids, vec![5, 7]);
    assert_eq!(positions, vec![0, 2]);
    assert_eq!(joined.rows[1].values, vec!["55", "0"]);

    assert_eq!(joined.report.withdrawn, 1);
    assert_eq!(joined.report.unmatched, 1);
    assert_eq!(joined.report.phenotype_only, 1);
}

#[test]
fn test_join_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (phenotypes, link) = fixtures(dir.path());
    let loader = DataLoader::new();

    let first = loader.load_and_join(&phenotypes, &link).unwrap();
    let second = loader.load_and_join(&phenotypes, &link).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_flagged_output_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let (phenotypes, link) = fixtures(dir.path());

    let mut loader = DataLoader::new();
    loader.unmatched_policy(UnmatchedPolicy::Flag);
    let joined = loader.load_and_join(&phenotypes, &link).unwrap();

    let output = dir.path().join("out").join("joined.tsv");
    write_joined(&output, "tsv", &joined).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "genetic_index\tID_1\tstatus\tage\tPHQ9_binary\n\
         0\t5\tmatched\t40\t1\n\
         1\t-1\twithdrawn\tNA\tNA\n\
         2\t7\tmatched\t55\t0\n\
         3\t12\tunmatched\tNA\tNA\n"
    );

    let mut summary = RunSummary::new("join", "ukbprep --task join");
    summary.add_input(&phenotypes).unwrap();
    summary.add_input(&link).unwrap();
    summary.report = Some(joined.report.clone());
    write_summary(&summary_path(&output), &summary).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(summary_path(&output)).unwrap()).unwrap();
    assert_eq!(json["report"]["matched"], 2);
    assert_eq!(json["inputs"].as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_input_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let (_, link) = fixtures(dir.path());
    let missing = dir.path().join("no_such_pheno.csv");

    match DataLoader::new().load_and_join(&missing, &link) {
        Err(PrepError::FileNotFound { path }) => assert_eq!(path, missing),
        other => panic!("expected FileNotFound, got {:?}", other.map(|j| j.len())),
    }
}
