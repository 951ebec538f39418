use super::*;
use crate::check::{CheckDescriptor, CheckResult, Kind};
use crate::registry::GroupStatus;
use crate::report::aggregate;
use crate::scheduler::RecordedResult;

fn sample_doc() -> ReviewDocument {
    let results = [RecordedResult {
        descriptor: CheckDescriptor::new(
            "CheckSourceUrls",
            "Generic",
            Kind::Should,
            "Source tags use full upstream URLs",
        )
        .with_url("https://example.org?a=1&b=2"),
        result: CheckResult::fail("CheckSourceUrls", "sources without a full URL: <local>"),
        internal: false,
    }];
    aggregate(
        "foo",
        &results,
        vec![GroupStatus {
            group: "Generic".to_string(),
            applicable: true,
        }],
        "",
        Vec::new(),
        None,
    )
}

#[test]
fn document_structure_is_emitted() {
    let out = XmlRenderer.render(&sample_doc()).unwrap();
    assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(out.contains(r#"<review package="foo">"#));
    assert!(out.contains(r#"<section title="SHOULD fail">"#));
    assert!(out.contains(r#"kind="SHOULD" outcome="fail""#));
    assert!(out.contains("<text>Source tags use full upstream URLs</text>"));
    assert!(out.contains(r#"<group name="Generic" applicable="true"/>"#));
    assert!(out.trim_end().ends_with("</review>"));
}

#[test]
fn reserved_characters_are_escaped() {
    let out = XmlRenderer.render(&sample_doc()).unwrap();
    assert!(out.contains("https://example.org?a=1&amp;b=2"));
    assert!(out.contains("<message>sources without a full URL: &lt;local&gt;</message>"));
    assert!(!out.contains("<local>"));
}

#[test]
fn renderer_extensions_name_the_report_files() {
    assert_eq!(XmlRenderer.extension(), "xml");
    assert_eq!(super::super::TextRenderer.extension(), "txt");
}
