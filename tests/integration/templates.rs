use anyhow::Result;
use gencat::context::{RelocationRules, Trigger};
use gencat::core::ConfigError;
use gencat::declaration::TemplatesDeclaration;
use gencat::models::TemplateOrigin;
use gencat::reader::ConfigurationReader;
use gencat::test_utils::{ConfigFixture, init_test_logging, test_trigger};

use crate::fixtures::{FOO_DECLARATION, FOO_TEMPLATES, foo_root};

/// Test that a scan plus an explicit declaration sharing one id resolves to
/// exactly three templates, with the explicit attributes winning
#[test]
fn test_round_trip_explicit_over_scan() -> Result<()> {
    init_test_logging(None);
    let fixture = foo_root();

    let templates = fixture.reader()?.load_templates(&test_trigger(), &RelocationRules::new())?;

    let ids: Vec<_> = templates.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["prefix_BarClass.java", "prefix_Foo2Class.java", "prefix_FooClass.java"]);
    assert!(templates.iter().all(|(id, template)| *id == template.name));

    let explicit = &templates["prefix_Foo2Class.java"];
    assert_eq!(explicit.origin, TemplateOrigin::Explicit);
    assert_eq!(explicit.unresolved_target_path, "src/main/java/foo/Foo2Class${variable}.java");
    assert_eq!(explicit.merge_strategy.as_deref(), Some("javamerge"));
    assert_eq!(explicit.relative_template_path, "foo/Foo2Class.java.ftl");
    assert_eq!(explicit.placeholders(), vec!["variable"]);

    let bar = &templates["prefix_BarClass.java"];
    assert_eq!(bar.relative_template_path, "foo/bar/BarClass.java.ftl");
    assert_eq!(bar.unresolved_target_path, "src/main/java/foo/bar/BarClass.java");
    assert_eq!(bar.absolute_template_path, fixture.join("foo/bar/BarClass.java.ftl"));
    assert!(bar.absolute_template_path.is_file());
    assert_eq!(bar.merge_strategy, None);
    Ok(())
}

/// Test that an extension overriding target path and merge strategy keeps the
/// inherited charset
#[test]
fn test_extension_keeps_absent_attributes() -> Result<()> {
    let fixture = foo_root();
    let trigger = Trigger::new("latin", "java", "foo", "ISO-8859-1");

    let templates = fixture.reader()?.load_templates(&trigger, &RelocationRules::new())?;
    let extended = &templates["prefix_FooClass.java"];

    assert_eq!(extended.unresolved_target_path, "src/main/java/foo/FooClass${variable}.java");
    assert_eq!(extended.merge_strategy.as_deref(), Some("javamerge_override"));
    assert_eq!(extended.target_charset, "ISO-8859-1");
    assert_eq!(extended.relative_template_path, "foo/FooClass.java.ftl");
    Ok(())
}

/// Test that extensions also apply to explicit templates
#[test]
fn test_extension_applies_to_explicit_template() -> Result<()> {
    let fixture = ConfigFixture::new().template_file("Entity.java.ftl").declaration(
        r#"
[[template]]
name = "Entity.java"
template-file = "Entity.java.ftl"
destination-path = "src/Entity.java"
target-charset = "UTF-16"
variables = { layer = "api" }

[[template-extension]]
ref = "Entity.java"
merge-strategy = "javamerge"
variables = { layer = "core", extra = "1" }
"#,
    );

    let templates = fixture.reader()?.load_templates(&test_trigger(), &RelocationRules::new())?;
    let entity = &templates["Entity.java"];

    assert_eq!(entity.merge_strategy.as_deref(), Some("javamerge"));
    assert_eq!(entity.target_charset, "UTF-16");
    assert_eq!(entity.unresolved_target_path, "src/Entity.java");
    assert_eq!(entity.variables["layer"], "core");
    assert_eq!(entity.variables["extra"], "1");
    Ok(())
}

/// Test that resolving twice yields equal catalogs
#[test]
fn test_resolution_is_idempotent() -> Result<()> {
    let fixture = foo_root();
    let trigger = test_trigger();
    let rules = RelocationRules::new().with_rule("foo_scan", "../api/");

    let reader = fixture.reader()?;
    let first = reader.load_templates(&trigger, &rules)?;
    let second = reader.load_templates(&trigger, &rules)?;
    assert_eq!(first, second);

    let fresh = fixture.reader()?.load_templates(&trigger, &rules)?;
    assert_eq!(first, fresh);
    Ok(())
}

/// Test that two scans producing the same id fail with the file name in the message
#[test]
fn test_duplicate_scanned_id() {
    let fixture = ConfigFixture::new().template_files(&["a/Bar.java.ftl", "b/Bar.java.ftl"]).declaration(
        r#"
[[template-scan]]
name = "first"
template-path = "a"

[[template-scan]]
name = "second"
template-path = "b"
"#,
    );

    let err = fixture.reader().unwrap().load_templates(&test_trigger(), &RelocationRules::new()).unwrap_err();

    assert!(matches!(err, ConfigError::DuplicateTemplateId { .. }), "got {err:?}");
    let message = err.to_string();
    assert!(message.contains("Bar.java.ftl"));
    assert!(message.contains("template scan #1 'first'"));
    assert!(message.contains("template scan #2 'second'"));
}

/// Test that an unknown extension target fails with a close-match hint
#[test]
fn test_unhooked_extension() {
    let content = format!("{FOO_DECLARATION}\n[[template-extension]]\nref = \"prefix_BarClas.java\"\n");
    let fixture = ConfigFixture::new().template_files(FOO_TEMPLATES).declaration(&content);

    let err = fixture.reader().unwrap().load_templates(&test_trigger(), &RelocationRules::new()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnhookedTemplateExtension { ref reference, ref suggestion }
            if reference == "prefix_BarClas.java" && suggestion.as_deref() == Some("prefix_BarClass.java")
    ));
}

/// Test that two extensions of the same template are rejected
#[test]
fn test_duplicate_extension() {
    let content = format!("{FOO_DECLARATION}\n[[template-extension]]\nref = \"prefix_FooClass.java\"\n");
    let fixture = ConfigFixture::new().template_files(FOO_TEMPLATES).declaration(&content);

    let err = fixture.reader().unwrap().load_templates(&test_trigger(), &RelocationRules::new()).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateTemplateExtension { ref reference } if reference == "prefix_FooClass.java"));
}

/// Test that a tree without extensions keeps the scan defaults
#[test]
fn test_no_extensions_is_a_no_op() -> Result<()> {
    let fixture = foo_root();
    let mut declarations = TemplatesDeclaration::from_toml_str(FOO_DECLARATION, "templates.toml")?;
    declarations.template_extensions.clear();

    let reader = ConfigurationReader::from_declarations(fixture.path(), declarations)?;
    let templates = reader.load_templates(&test_trigger(), &RelocationRules::new())?;

    let foo = &templates["prefix_FooClass.java"];
    assert_eq!(foo.unresolved_target_path, "src/main/java/foo/FooClass.java");
    assert_eq!(foo.merge_strategy, None);
    Ok(())
}

/// Test that a root without templates.toml is reported as such
#[test]
fn test_missing_declaration_file() {
    let fixture = ConfigFixture::new().template_file("foo/FooClass.java.ftl");
    let err = fixture.reader().unwrap_err();
    assert!(matches!(err, ConfigError::ConfigurationNotFound { .. }));
}

/// Test that a missing scan directory fails at construction, naming the scan
#[test]
fn test_missing_scan_directory() {
    let fixture = ConfigFixture::new().declaration("[[template-scan]]\nname = \"ghost\"\ntemplate-path = \"nowhere\"\n");

    let err = fixture.reader().unwrap_err();
    assert!(matches!(err, ConfigError::UnreadableScanDirectory { ref scan, .. } if scan == "ghost"));
    assert!(err.to_string().contains("nowhere"));
}

/// Test that trees handed in directly are validated too
#[test]
fn test_from_declarations_validates() {
    let fixture = ConfigFixture::new();
    let mut declarations = TemplatesDeclaration::default();
    declarations.increments.push(Default::default());

    let err = ConfigurationReader::from_declarations(fixture.path(), declarations).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedConfiguration { ref file, .. } if file == "<in-memory>"));
}

/// Test that excluded files never become templates
#[test]
fn test_scan_exclusions() -> Result<()> {
    let fixture = ConfigFixture::new()
        .template_files(&["java/Keep.java.ftl", "java/Keep.java.ftl.orig", "java/internal/Secret.java.ftl"])
        .declaration(
            r#"
[[template-scan]]
template-path = "java"
exclude = ["*.orig", "internal/**"]
"#,
        );

    let templates = fixture.reader()?.load_templates(&test_trigger(), &RelocationRules::new())?;
    let ids: Vec<_> = templates.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["Keep.java"]);
    Ok(())
}

/// Test the package variable derived from the scanned sub-directory
#[test]
fn test_package_variable() -> Result<()> {
    let templates = foo_root().reader()?.load_templates(&test_trigger(), &RelocationRules::new())?;

    assert_eq!(templates["prefix_FooClass.java"].variables["rootpackage"], "root");
    assert_eq!(templates["prefix_BarClass.java"].variables["rootpackage"], "bar");
    assert!(!templates["prefix_Foo2Class.java"].variables.contains_key("rootpackage"));
    Ok(())
}

/// Test that a symlinked template file is part of the catalog
#[cfg(unix)]
#[test]
fn test_symlinked_template_file() -> Result<()> {
    let fixture = ConfigFixture::new()
        .template_files(&["shared/Common.java.ftl", "java/Own.java.ftl"])
        .declaration("[[template-scan]]\ntemplate-path = \"java\"\n");
    std::os::unix::fs::symlink(fixture.join("shared/Common.java.ftl"), fixture.join("java/Common.java.ftl"))?;

    let templates = fixture.reader()?.load_templates(&test_trigger(), &RelocationRules::new())?;
    let ids: Vec<_> = templates.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["Common.java", "Own.java"]);
    assert!(templates["Common.java"].absolute_template_path.is_file());
    Ok(())
}
