//! `//= require` directive extraction.

use regex::Regex;
use std::sync::LazyLock;

/// One directive per line: `//= require name`, name optionally quoted.
static REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*//=\s*require\s+['"]?([\w./*-]+)['"]?\s*$"#).unwrap()
});

/// Split the dependency section out of `content`.
///
/// Returns the content with every directive line removed (line terminator
/// included) and the required names in declaration order. Duplicates are kept.
///
/// Blank lines touching a directive go with it, so a header block of
/// requires followed by an empty line leaves no leading gap.
pub fn extract_dependencies(content: &str) -> (String, Vec<String>) {
    let mut stripped = String::with_capacity(content.len());
    let mut requires = Vec::new();
    // blank lines not yet known to be adjacent to a directive
    let mut pending = String::new();
    let mut after_directive = false;

    for line in content.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        if let Some(caps) = REQUIRE.captures(bare) {
            requires.push(caps[1].to_string());
            pending.clear();
            after_directive = true;
        } else if bare.trim().is_empty() {
            if !after_directive {
                pending.push_str(line);
            }
        } else {
            stripped.push_str(&pending);
            pending.clear();
            stripped.push_str(line);
            after_directive = false;
        }
    }
    stripped.push_str(&pending);

    (stripped, requires)
}
