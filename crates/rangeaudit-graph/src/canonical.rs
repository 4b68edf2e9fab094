//! PEP 503 package-name canonicalization.

/// Lowercases the name and collapses runs of `-`, `_`, and `.` into a
/// single `-`, per PEP 503. Used as the join key for `ConstraintGraph`
/// nodes so `Flask`, `flask`, and `FLASK` (and `foo_bar`/`foo.bar`) all
/// land on the same node.
pub fn canonicalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_was_separator = false;
    for c in name.chars() {
        if c == '-' || c == '_' || c == '.' {
            if !prev_was_separator && !out.is_empty() {
                out.push('-');
            }
            prev_was_separator = true;
        } else {
            out.push(c.to_ascii_lowercase());
            prev_was_separator = false;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_separators() {
        assert_eq!(canonicalize_name("Foo__Bar.-Baz"), "foo-bar-baz");
        assert_eq!(canonicalize_name("FLASK"), "flask");
        assert_eq!(canonicalize_name("zope.interface"), "zope-interface");
    }

    #[test]
    fn trailing_separators_are_dropped() {
        assert_eq!(canonicalize_name("foo-"), "foo");
    }
}
