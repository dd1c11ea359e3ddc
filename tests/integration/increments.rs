use anyhow::Result;
use gencat::context::RelocationRules;
use gencat::core::ConfigError;
use gencat::test_utils::{ConfigFixture, test_trigger};
use std::sync::Arc;

use crate::fixtures::{FOO_TEMPLATES, foo_root};

fn resolve_increments(declaration: &str) -> Result<(), ConfigError> {
    let fixture = ConfigFixture::new().template_files(FOO_TEMPLATES).declaration(declaration);
    let reader = fixture.reader()?;
    let templates = reader.load_templates(&test_trigger(), &RelocationRules::new())?;
    reader.load_increments(&templates, &test_trigger()).map(|_| ())
}

const SCAN: &str = r#"
[[template-scan]]
name = "foo_scan"
template-path = "foo"
template-name-prefix = "prefix_"
"#;

/// Test that nested increments flatten to a set union sharing template values
#[test]
fn test_nested_increments_are_a_set_union() -> Result<()> {
    let fixture = foo_root();
    let reader = fixture.reader()?;
    let trigger = test_trigger();
    let templates = reader.load_templates(&trigger, &RelocationRules::new())?;
    let increments = reader.load_increments(&templates, &trigger)?;

    assert_eq!(increments.len(), 3);

    let scanned: Vec<_> = increments["scanned"].template_ids().collect();
    assert_eq!(scanned, vec!["prefix_BarClass.java", "prefix_Foo2Class.java", "prefix_FooClass.java"]);

    let explicit: Vec<_> = increments["explicit"].template_ids().collect();
    assert_eq!(explicit, vec!["prefix_Foo2Class.java"]);

    // prefix_Foo2Class.java is reached through both nested increments
    let all = &increments["all"];
    assert_eq!(all.len(), 3);
    assert_eq!(all.description, "Both increments");

    // a scan member shadowed by an explicit declaration is the explicit template
    let shared = &increments["scanned"].templates["prefix_Foo2Class.java"];
    assert!(Arc::ptr_eq(shared, &templates["prefix_Foo2Class.java"]));
    assert_eq!(shared.merge_strategy.as_deref(), Some("javamerge"));
    Ok(())
}

/// Test that increments resolve against relocated templates
#[test]
fn test_increments_share_relocated_templates() -> Result<()> {
    let fixture = foo_root();
    let reader = fixture.reader()?;
    let trigger = test_trigger();
    let templates = reader.load_templates(&trigger, &RelocationRules::new().with_rule("foo_scan", "../api/"))?;
    let increments = reader.load_increments(&templates, &trigger)?;

    let bar = &increments["all"].templates["prefix_BarClass.java"];
    assert!(bar.unresolved_target_path.starts_with("../api/"));
    Ok(())
}

/// Test that an unknown template reference fails without a partial result
#[test]
fn test_dangling_template_reference() {
    let declaration = format!(
        "{SCAN}\n[[increment]]\nname = \"ok\"\ntemplate-scans = [\"foo_scan\"]\n\n[[increment]]\nname = \"dao\"\ntemplates = [\"prefix_FooClas.java\"]\n"
    );

    let err = resolve_increments(&declaration).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidTemplateReference { ref increment, ref reference, ref suggestion }
            if increment == "dao"
                && reference == "prefix_FooClas.java"
                && suggestion.as_deref() == Some("prefix_FooClass.java")
    ));
}

/// Test that an unknown scan reference names the increment
#[test]
fn test_invalid_scan_reference() {
    let declaration = format!("{SCAN}\n[[increment]]\nname = \"dao\"\ntemplate-scans = [\"bar_scan\"]\n");

    let err = resolve_increments(&declaration).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidScanReference { ref increment, ref reference, .. }
            if increment == "dao" && reference == "bar_scan"
    ));
}

/// Test that unnamed scans cannot be referenced by their path
#[test]
fn test_unnamed_scan_is_not_referenceable() {
    let declaration = "[[template-scan]]\ntemplate-path = \"foo\"\n\n[[increment]]\nname = \"x\"\ntemplate-scans = [\"foo\"]\n";
    let err = resolve_increments(declaration).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidScanReference { .. }));
}

/// Test that two increments with the same name are rejected
#[test]
fn test_duplicate_increment_name() {
    let declaration = format!("{SCAN}\n[[increment]]\nname = \"dup\"\n\n[[increment]]\nname = \"dup\"\n");
    let err = resolve_increments(&declaration).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateIncrementName { ref name } if name == "dup"));
}

/// Test that self and mutual recursion are detected with the full chain
#[test]
fn test_increment_cycles() {
    let own = "[[increment]]\nname = \"self\"\nincrements = [\"self\"]\n";
    let err = resolve_increments(own).unwrap_err();
    assert!(matches!(err, ConfigError::IncrementReferenceCycle { ref chain } if chain == "self → self"));

    let mutual = "[[increment]]\nname = \"a\"\nincrements = [\"b\"]\n\n[[increment]]\nname = \"b\"\nincrements = [\"a\"]\n";
    let err = resolve_increments(mutual).unwrap_err();
    assert!(matches!(err, ConfigError::IncrementReferenceCycle { ref chain } if chain == "a → b → a"));
}

/// Test that an unknown nested increment is reported with a hint
#[test]
fn test_invalid_increment_reference() {
    let declaration = "[[increment]]\nname = \"all\"\nincrements = [\"servic\"]\n\n[[increment]]\nname = \"service\"\n";
    let err = resolve_increments(declaration).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidIncrementReference { ref suggestion, .. } if suggestion.as_deref() == Some("service")
    ));
}

/// Test that increments must be resolved against the catalog of the same root
#[test]
fn test_scan_members_must_exist_in_catalog() -> Result<()> {
    let fixture = foo_root();
    let reader = fixture.reader()?;
    let mut templates = reader.load_templates(&test_trigger(), &RelocationRules::new())?;
    templates.remove("prefix_BarClass.java");

    let err = reader.load_increments(&templates, &test_trigger()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidTemplateReference { ref reference, .. } if reference == "prefix_BarClass.java"));
    Ok(())
}
