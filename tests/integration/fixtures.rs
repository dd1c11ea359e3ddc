//! Shared configuration roots.

use gencat::test_utils::ConfigFixture;

/// Files of the `foo` template tree: two templates in `foo/`, one in `foo/bar/`.
pub const FOO_TEMPLATES: &[&str] =
    &["foo/FooClass.java.ftl", "foo/Foo2Class.java.ftl", "foo/bar/BarClass.java.ftl"];

/// A scan over `foo/` plus an explicit declaration sharing a scanned id, an
/// extension of another scanned id, and a few increments.
pub const FOO_DECLARATION: &str = r#"
[[template]]
name = "prefix_Foo2Class.java"
template-file = "foo/Foo2Class.java.ftl"
destination-path = "src/main/java/foo/Foo2Class${variable}.java"
merge-strategy = "javamerge"

[[template-scan]]
name = "foo_scan"
template-path = "foo"
template-name-prefix = "prefix_"
destination-path = "src/main/java/foo"
package-variable = "rootpackage"

[[template-extension]]
ref = "prefix_FooClass.java"
destination-path = "src/main/java/foo/FooClass${variable}.java"
merge-strategy = "javamerge_override"

[[increment]]
name = "scanned"
description = "Everything found in foo"
template-scans = ["foo_scan"]

[[increment]]
name = "explicit"
description = "The explicit template"
templates = ["prefix_Foo2Class.java"]

[[increment]]
name = "all"
description = "Both increments"
increments = ["scanned", "explicit"]
"#;

/// The `foo` configuration root.
pub fn foo_root() -> ConfigFixture {
    ConfigFixture::new().template_files(FOO_TEMPLATES).declaration(FOO_DECLARATION)
}
