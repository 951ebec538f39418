use super::*;

#[test]
fn kind_parses_case_insensitively() {
    assert_eq!("must".parse::<Kind>().unwrap(), Kind::Must);
    assert_eq!("SHOULD".parse::<Kind>().unwrap(), Kind::Should);
    assert_eq!("Extra".parse::<Kind>().unwrap(), Kind::Extra);
    assert!("maybe".parse::<Kind>().is_err());
}

#[test]
fn kind_orders_must_first() {
    assert!(Kind::Must < Kind::Should);
    assert!(Kind::Should < Kind::Extra);
    assert!(Kind::Extra < Kind::Pending);
}

#[test]
fn builder_sets_relations() {
    let desc = CheckDescriptor::new("HaskellCheckStaticLibs", "Haskell", Kind::Must, "text")
        .deprecating(&["CheckStaticLibs"])
        .needing(&["CheckRpmlint"])
        .with_url("https://example.org/guidelines");

    assert!(desc.deprecates.contains("CheckStaticLibs"));
    assert!(desc.needs.contains("CheckRpmlint"));
    assert_eq!(desc.url, "https://example.org/guidelines");
    assert!(desc.automatic);
}

#[test]
fn manual_clears_automatic() {
    let desc = CheckDescriptor::new("CheckLicense", "Generic", Kind::Must, "text").manual();
    assert!(!desc.automatic);
}

#[test]
fn order_key_is_group_then_name() {
    let a = CheckDescriptor::new("B", "Alpha", Kind::Must, "");
    let b = CheckDescriptor::new("A", "Beta", Kind::Must, "");
    assert!(a.order_key() < b.order_key());
}
