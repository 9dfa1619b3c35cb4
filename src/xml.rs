//! Minimal XML text helpers for the string-built writers.

/// Escape a text or attribute value for embedding in an XML document.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Resolve the five predefined entities in an attribute value. Unknown
/// entities are kept verbatim.
pub fn unescape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let entity = rest.find(';').map(|end| &rest[..=end]);
        match entity {
            Some("&amp;") => {
                result.push('&');
                rest = &rest[5..];
            }
            Some("&lt;") => {
                result.push('<');
                rest = &rest[4..];
            }
            Some("&gt;") => {
                result.push('>');
                rest = &rest[4..];
            }
            Some("&quot;") => {
                result.push('"');
                rest = &rest[6..];
            }
            Some("&apos;") => {
                result.push('\'');
                rest = &rest[6..];
            }
            _ => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::{escape_xml, unescape_xml};

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(
            escape_xml(r#"<A & B> "c" 'd'"#),
            "&lt;A &amp; B&gt; &quot;c&quot; &apos;d&apos;"
        );
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_unescape_roundtrip() {
        let original = r#"Logger<T> & "friends""#;
        assert_eq!(unescape_xml(&escape_xml(original)), original);
    }

    #[test]
    fn test_unescape_keeps_unknown_entities() {
        assert_eq!(unescape_xml("a &copy; b"), "a &copy; b");
        assert_eq!(unescape_xml("dangling &"), "dangling &");
    }
}
