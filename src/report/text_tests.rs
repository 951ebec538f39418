use super::*;
use crate::check::{CheckDescriptor, CheckResult, Kind};
use crate::registry::GroupStatus;
use crate::report::{SourceChecksum, aggregate};
use crate::scheduler::RecordedResult;

fn sample_doc(error: Option<String>) -> ReviewDocument {
    let results = [
        RecordedResult {
            descriptor: CheckDescriptor::new(
                "CheckStaticLibs",
                "Generic",
                Kind::Must,
                "Package contains no static libraries",
            )
            .with_url("https://example.org/static"),
            result: CheckResult::fail("CheckStaticLibs", "static libraries in: foo-devel"),
            internal: false,
        },
        RecordedResult {
            descriptor: CheckDescriptor::new(
                "CheckSpecName",
                "Generic",
                Kind::Must,
                "Spec file name matches the package name",
            ),
            result: CheckResult::pass("CheckSpecName"),
            internal: false,
        },
    ];
    aggregate(
        "foo",
        &results,
        vec![
            GroupStatus {
                group: "Generic".to_string(),
                applicable: true,
            },
            GroupStatus {
                group: "Python".to_string(),
                applicable: false,
            },
        ],
        "foo.x86_64: W: spelling\n",
        vec![SourceChecksum {
            file: "foo-1.0.tar.gz".to_string(),
            sha256: "abc123".to_string(),
        }],
        error,
    )
}

#[test]
fn entries_render_glyph_text_note_and_url() {
    let out = TextRenderer.render(&sample_doc(None)).unwrap();
    assert!(out.contains("==== MUST fail ===="));
    assert!(out.contains("[!]: Package contains no static libraries"));
    assert!(out.contains("     Note: static libraries in: foo-devel"));
    assert!(out.contains("     See: https://example.org/static"));
    assert!(out.contains("[x]: Spec file name matches the package name"));
}

#[test]
fn run_level_error_leads_the_report() {
    let out = TextRenderer
        .render(&sample_doc(Some("build failed: mock exited with 1".to_string())))
        .unwrap();
    let error_at = out.find("ERROR: build failed").unwrap();
    let sections_at = out.find("==== MUST fail").unwrap();
    assert!(error_at < sections_at);
}

#[test]
fn auxiliary_tables_render_after_the_sections() {
    let out = TextRenderer.render(&sample_doc(None)).unwrap();
    assert!(out.contains("==== Applicable groups ====\nGeneric: yes\nPython: no\n"));
    assert!(out.contains("==== Source checksums (sha256) ====\nabc123  foo-1.0.tar.gz\n"));
    assert!(out.contains("==== Rpmlint ====\nfoo.x86_64: W: spelling\n"));
}

#[test]
fn rendering_is_byte_identical_across_calls() {
    let doc = sample_doc(None);
    assert_eq!(
        TextRenderer.render(&doc).unwrap(),
        TextRenderer.render(&doc).unwrap()
    );
}
