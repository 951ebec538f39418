use std::fs;

use tempfile::TempDir;

use super::*;

fn sample_set() -> RpmSet {
    let mut listings = BTreeMap::new();
    listings.insert(
        "foo".to_string(),
        vec![
            "/usr/bin/foo".to_string(),
            "/usr/share/doc/foo/README".to_string(),
        ],
    );
    listings.insert(
        "foo-devel".to_string(),
        vec![
            "/usr/lib64/libfoo.a".to_string(),
            "/usr/lib64/libfoo.so".to_string(),
        ],
    );
    RpmSet::from_listings(listings)
}

#[test]
fn find_accepts_glob_patterns() {
    let rpms = sample_set();
    assert!(rpms.find("*.a").unwrap());
    assert!(rpms.find("**/libfoo.so").unwrap());
    assert!(!rpms.find("*.jar").unwrap());
}

#[test]
fn find_also_reads_the_pattern_as_a_regex() {
    let rpms = sample_set();
    // Parens are literal in glob syntax; only the regex reading hits.
    assert!(rpms.find(r"/usr/(bin|sbin)/foo").unwrap());
    assert!(!rpms.find(r"/usr/(share|lib|lib64)/sugar/activities/").unwrap());
}

#[test]
fn files_matching_groups_by_subpackage() {
    let rpms = sample_set();
    let hits = rpms.files_matching(r"\.a$").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(
        hits["foo-devel"],
        vec![PathBuf::from("/usr/lib64/libfoo.a")]
    );
}

#[test]
fn from_roots_walks_unpacked_trees() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("foo");
    fs::create_dir_all(root.join("usr/bin")).unwrap();
    fs::write(root.join("usr/bin/foo"), b"#!/bin/sh\n").unwrap();

    let mut roots = BTreeMap::new();
    roots.insert("foo".to_string(), root);
    let rpms = RpmSet::from_roots(&roots);

    assert_eq!(rpms.subpackages(), vec!["foo"]);
    assert!(rpms.find("/usr/bin/foo").unwrap());
}

#[test]
fn empty_set_matches_nothing() {
    let rpms = RpmSet::default();
    assert!(rpms.is_empty());
    assert!(!rpms.find("*").unwrap());
}
