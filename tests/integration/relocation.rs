use anyhow::Result;
use gencat::constants::{DEFAULT_PACKAGE_VARIABLE, RELOCATE_VARIABLE};
use gencat::context::{RelocationRules, ResolutionContext, Trigger};
use gencat::core::ConfigError;
use gencat::test_utils::{ConfigFixture, test_trigger};
use std::collections::BTreeMap;

const API_DECLARATION: &str = r#"
[[template]]
name = "Pom.xml"
template-file = "pom.xml.ftl"
destination-path = "pom.xml"

[[template-scan]]
name = "api"
template-path = "templates/api"
destination-path = "src/main"
"#;

fn api_root() -> ConfigFixture {
    ConfigFixture::new()
        .template_files(&["pom.xml.ftl", "templates/api/java/Api.java.ftl"])
        .declaration(API_DECLARATION)
}

/// Test that a scan-keyed rule prefixes the target and records the relocation
#[test]
fn test_scan_relocation() -> Result<()> {
    let rules = RelocationRules::new().with_rule("api", "../api/");
    let templates = api_root().reader()?.load_templates(&test_trigger(), &rules)?;

    let api = &templates["Api.java"];
    assert_eq!(api.unresolved_template_path, "src/main/java/Api.java");
    assert_eq!(api.unresolved_target_path, "../api/src/main/java/Api.java");
    assert_eq!(api.variables[RELOCATE_VARIABLE], "../api/src/main/${cwd}");

    // scan rules never reach explicit templates
    let pom = &templates["Pom.xml"];
    assert_eq!(pom.unresolved_target_path, "pom.xml");
    assert!(!pom.variables.contains_key(RELOCATE_VARIABLE));
    Ok(())
}

/// Test that a trigger-type rule relocates explicit templates as well
#[test]
fn test_trigger_type_relocation() -> Result<()> {
    let rules = RelocationRules::new().with_rule("java", "../core/");
    let templates = api_root().reader()?.load_templates(&test_trigger(), &rules)?;

    let pom = &templates["Pom.xml"];
    assert_eq!(pom.unresolved_template_path, "pom.xml");
    assert_eq!(pom.unresolved_target_path, "../core/pom.xml");
    assert_eq!(pom.variables[RELOCATE_VARIABLE], "../core/${cwd}");

    assert_eq!(templates["Api.java"].unresolved_target_path, "../core/src/main/java/Api.java");
    Ok(())
}

/// Test that a matcher-type rule wins over the trigger type
#[test]
fn test_matcher_rule_precedes_trigger_type() -> Result<()> {
    let trigger = Trigger::new("entity", "java", "api", "UTF-8").with_matcher("fqn", ".*Entity");
    let rules = RelocationRules::new().with_rule("java", "../core/").with_rule("fqn", "../entity/");

    let templates = api_root().reader()?.load_templates(&trigger, &rules)?;
    assert_eq!(templates["Pom.xml"].unresolved_target_path, "../entity/pom.xml");
    Ok(())
}

/// Test that an empty rule disables relocation without falling through
#[test]
fn test_empty_rule_is_a_no_op() -> Result<()> {
    let rules = RelocationRules::new().with_rule("api", "").with_rule("java", "../core/");
    let templates = api_root().reader()?.load_templates(&test_trigger(), &rules)?;

    let api = &templates["Api.java"];
    assert_eq!(api.unresolved_target_path, "src/main/java/Api.java");
    assert_eq!(api.unresolved_template_path, api.unresolved_target_path);
    assert!(!api.variables.contains_key(RELOCATE_VARIABLE));
    Ok(())
}

/// Test that a context file supplies trigger and rules
#[test]
fn test_context_file() -> Result<()> {
    let fixture = api_root().write(
        "context.toml",
        r#"
[trigger]
id = "api_entity"
type = "java"
template-folder = "api"

[[trigger.matcher]]
type = "fqn"
value = "com\\.example\\..*"

[relocate]
api = "../api/"
"#,
    );

    let context = ResolutionContext::load(&fixture.join("context.toml"))?;
    assert_eq!(context.trigger.id, "api_entity");
    assert_eq!(context.trigger.input_charset, "UTF-8");
    assert_eq!(context.trigger.matchers.len(), 1);

    let templates = fixture.reader()?.load_templates(&context.trigger, &context.relocations)?;
    assert_eq!(templates["Api.java"].unresolved_target_path, "../api/src/main/java/Api.java");
    Ok(())
}

/// Test that unknown keys in a context file are rejected
#[test]
fn test_malformed_context_file() {
    let fixture = ConfigFixture::new().write("context.toml", "[trigger]\nflavour = \"java\"\n");

    let err = ResolutionContext::load(&fixture.join("context.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedConfiguration { .. }));
}

/// Test a root mixing relocated scans, a scan switched off by an empty rule
/// and a scan without a package variable name
#[test]
fn test_variables_of_relocated_and_plain_scans() -> Result<()> {
    let fixture = ConfigFixture::new()
        .template_files(&[
            "java/api/common/api/__EntityName__.java.ftl",
            "java/api/logic/api/to/__EntityName__Eto.java.ftl",
            "java/core/__EntityName__Entity.java.ftl",
            "java/core/__Component__.java.ftl",
            "java/impl/__Component__Impl.java.ftl",
        ])
        .declaration(
            r#"
[[template-scan]]
name = "api_scan"
template-path = "java/api"
destination-path = "src/main"
package-variable = "foo"

[[template-scan]]
name = "core_scan"
template-path = "java/core"
destination-path = "src/main/core"
package-variable = "foo"

[[template-scan]]
template-path = "java/impl"
destination-path = "src/main/impl"

[[increment]]
name = "test"
description = "TEST"
template-scans = ["api_scan", "core_scan"]
templates = ["__Component__Impl.java"]
"#,
        );

    let trigger = Trigger::new("id", "type", "valid_relocate", "UTF-8");
    let rules = RelocationRules::new().with_rule("api_scan", "../api/").with_rule("core_scan", "");
    let reader = fixture.reader()?;
    let templates = reader.load_templates(&trigger, &rules)?;
    let increments = reader.load_increments(&templates, &trigger)?;

    let variables = |id: &str| templates[id].variables.clone();
    let relocated = "../api/src/main/${cwd}".to_string();

    assert_eq!(
        variables("__EntityName__.java"),
        BTreeMap::from([("foo".to_string(), "common.api".to_string()), ("relocate".to_string(), relocated.clone())])
    );
    assert_eq!(templates["__EntityName__.java"].unresolved_target_path, "../api/src/main/common/api/__EntityName__.java");

    assert_eq!(
        variables("__EntityName__Eto.java"),
        BTreeMap::from([("foo".to_string(), "logic.api.to".to_string()), ("relocate".to_string(), relocated)])
    );

    for id in ["__EntityName__Entity.java", "__Component__.java"] {
        assert_eq!(variables(id), BTreeMap::from([("foo".to_string(), "root".to_string())]));
        assert!(templates[id].unresolved_target_path.starts_with("src/main/core/"));
    }

    assert_eq!(
        variables("__Component__Impl.java"),
        BTreeMap::from([(DEFAULT_PACKAGE_VARIABLE.to_string(), "root".to_string())])
    );
    assert_eq!(templates["__Component__Impl.java"].unresolved_target_path, "src/main/impl/__Component__Impl.java");

    assert_eq!(templates.len(), 5);
    let test = &increments["test"];
    assert_eq!(test.description, "TEST");
    assert_eq!(test.len(), templates.len());
    Ok(())
}

/// Test that two unnamed scans over one directory keep their own destination
/// and package variable
#[test]
fn test_unnamed_scans_over_one_directory() -> Result<()> {
    let fixture = ConfigFixture::new().template_file("java/Entity.java.ftl").declaration(
        r#"
[[template-scan]]
template-path = "java"
template-name-prefix = "api_"
destination-path = "api/src"
package-variable = "pkg"

[[template-scan]]
template-path = "java"
template-name-prefix = "core_"
destination-path = "core/src"
"#,
    );

    let rules = RelocationRules::new().with_rule("java", "../x/");
    let templates = fixture.reader()?.load_templates(&test_trigger(), &rules)?;

    let api = &templates["api_Entity.java"];
    assert_eq!(api.unresolved_target_path, "../x/api/src/Entity.java");
    assert_eq!(api.variables[RELOCATE_VARIABLE], "../x/api/src/${cwd}");
    assert_eq!(api.variables.get("pkg").map(String::as_str), Some("root"));

    let core = &templates["core_Entity.java"];
    assert_eq!(core.unresolved_target_path, "../x/core/src/Entity.java");
    assert_eq!(core.variables[RELOCATE_VARIABLE], "../x/core/src/${cwd}");
    assert_eq!(core.variables[DEFAULT_PACKAGE_VARIABLE], "root");
    assert!(!core.variables.contains_key("pkg"));
    Ok(())
}
