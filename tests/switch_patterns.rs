use stdio_recorder::switches::{SwitchCatalog, SwitchError, SwitchId, SwitchPattern};

fn pattern(long: &str, short: &str, has_parameters: bool) -> SwitchPattern {
    SwitchPattern::new(long, short, has_parameters).expect("pattern should compile")
}

// -- long form ----------------------------------------------------------------

#[test]
fn long_form_is_a_whole_token_match_for_both_arities() {
    for has_parameters in [false, true] {
        let p = pattern("application", "a", has_parameters);
        assert!(p.is_match("--application"));
        assert!(!p.is_match("--applicationx"));
        assert!(!p.is_match("--applicatio"));
        assert!(!p.is_match("application"));
    }
}

#[test]
fn single_dash_word_is_a_cluster() {
    // Every letter of "application" is a cluster member.
    assert!(pattern("application", "a", false).is_match("-application"));
    // A value-taking letter must close the cluster, and "n" does.
    assert!(!pattern("application", "a", true).is_match("-application"));
    assert!(pattern("application", "n", true).is_match("-application"));
}

#[test]
fn matching_ignores_case() {
    let p = pattern("stdout", "o", false);
    assert!(p.is_match("--STDOUT"));
    assert!(p.is_match("-O"));
    assert!(p.is_match("-xOy"));
}

// -- short clusters -----------------------------------------------------------

#[test]
fn flag_letter_may_sit_anywhere_in_cluster() {
    let p = pattern("stdout", "o", false);
    assert!(p.is_match("-o"));
    assert!(p.is_match("-xoy"));
    assert!(p.is_match("-xo"));
    assert!(p.is_match("-oy"));
    assert!(!p.is_match("-xy"));
    assert!(!p.is_match("--o"));
    assert!(!p.is_match("-o1"));
}

#[test]
fn value_letter_must_close_cluster() {
    let p = pattern("application", "a", true);
    assert!(p.is_match("-a"));
    assert!(p.is_match("-xa"));
    assert!(!p.is_match("-xay"));
    assert!(!p.is_match("-ay"));
}

#[test]
fn names_are_matched_literally() {
    let p = pattern("a.b", "x", false);
    assert!(p.is_match("--a.b"));
    assert!(!p.is_match("--aXb"));
}

// -- construction errors ------------------------------------------------------

#[test]
fn malformed_names_are_configuration_errors() {
    assert!(matches!(
        SwitchPattern::new("", "o", false),
        Err(SwitchError::InvalidLongName { .. })
    ));
    assert!(matches!(
        SwitchPattern::new("--stdout", "o", false),
        Err(SwitchError::InvalidLongName { .. })
    ));
    assert!(matches!(
        SwitchPattern::new("stdout", "", false),
        Err(SwitchError::InvalidShortName { .. })
    ));
    assert!(matches!(
        SwitchPattern::new("stdout", "oo", false),
        Err(SwitchError::InvalidShortName { .. })
    ));
    assert!(matches!(
        SwitchPattern::new("stdout", "1", false),
        Err(SwitchError::InvalidShortName { .. })
    ));
}

// -- catalog ------------------------------------------------------------------

#[test]
fn catalog_recognizes_every_documented_form() {
    let catalog = SwitchCatalog::new().unwrap();
    let cases = [
        ("--stdout", SwitchId::Stdout),
        ("-o", SwitchId::Stdout),
        ("--stderr", SwitchId::Stderr),
        ("-e", SwitchId::Stderr),
        ("--application", SwitchId::Application),
        ("-a", SwitchId::Application),
        ("--file", SwitchId::File),
        ("-f", SwitchId::File),
        ("--pid", SwitchId::Pid),
        ("-i", SwitchId::Pid),
        ("--parameters", SwitchId::Parameters),
        ("-p", SwitchId::Parameters),
    ];
    for (token, id) in cases {
        assert_eq!(catalog.find(token).map(|d| d.id), Some(id), "token {token}");
    }
}

#[test]
fn shared_catalog_is_built_once() {
    let first = SwitchCatalog::shared().unwrap();
    let second = SwitchCatalog::shared().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.as_slice().len(), 6);
}

#[test]
fn help_lists_every_switch() {
    let catalog = SwitchCatalog::new().unwrap();
    let help = catalog.help_text();
    assert_eq!(help.lines().count(), catalog.as_slice().len());
    for descriptor in catalog.iter() {
        assert!(help.contains(&descriptor.long_form()));
    }
}
