use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters.
///
/// Control characters other than tab, newline and carriage return are not
/// allowed in XML 1.0 and are dropped.
///
/// # Examples
///
/// ```
/// use u2p::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    let escaped = XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]);
    if escaped.chars().any(is_forbidden_control) {
        escaped.chars().filter(|c| !is_forbidden_control(*c)).collect()
    } else {
        escaped
    }
}

#[inline]
fn is_forbidden_control(c: char) -> bool {
    (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_entities() {
        assert_eq!(
            escape_xml(r#"<foo & "bar" 'baz'>"#),
            "&lt;foo &amp; &quot;bar&quot; &apos;baz&apos;&gt;"
        );
    }

    #[test]
    fn test_escape_drops_control_characters() {
        assert_eq!(escape_xml("a\u{0001}b\tc"), "ab\tc");
    }

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_xml("holiday photo.jpg"), "holiday photo.jpg");
    }
}
