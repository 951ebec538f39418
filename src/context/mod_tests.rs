use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::*;
use crate::build::{BuildProducts, StaticBuilder};

fn context_with_listings(listings: BTreeMap<String, Vec<String>>) -> AnalysisContext {
    let spec = SpecFile::from_text(Path::new("foo.spec"), "Name: foo\nVersion: 1.0\n").unwrap();
    let srpm = Srpm::new(PathBuf::from("foo-1.0.src.rpm"), PathBuf::from("/tmp/none"));
    let products = BuildProducts {
        rpms: RpmSet::from_listings(listings),
        logs: vec!["log line".to_string()],
        rpmlint: "foo.x86_64: W: no-documentation\n".to_string(),
    };
    let build = BuildCoordinator::new(
        Box::new(StaticBuilder::new(products)),
        PathBuf::from("foo-1.0.src.rpm"),
        PathBuf::from("/tmp/review"),
    );
    AnalysisContext::new(spec, srpm, build, Vec::new(), PathBuf::from("/tmp/review"))
}

#[test]
fn rpm_queries_are_idempotent() {
    let mut listings = BTreeMap::new();
    listings.insert("foo".to_string(), vec!["/usr/bin/foo".to_string()]);
    let ctx = context_with_listings(listings);

    assert!(ctx.rpms().unwrap().find("/usr/bin/foo").unwrap());
    assert!(ctx.rpms().unwrap().find("/usr/bin/foo").unwrap());
    assert_eq!(ctx.rpmlint_output().unwrap(), "foo.x86_64: W: no-documentation\n");
    assert_eq!(ctx.build_logs().unwrap().len(), 1);
}

#[test]
fn review_name_comes_from_the_spec() {
    let ctx = context_with_listings(BTreeMap::new());
    assert_eq!(ctx.review_name(), "foo");
}

#[test]
fn build_error_is_none_for_successful_builds() {
    let ctx = context_with_listings(BTreeMap::new());
    let _ = ctx.rpms();
    assert!(ctx.build_error().is_none());
}
