//! URL escaping with browser `encodeURI` rules.
//!
//! Reserved URI characters and `#` pass through untouched, so JSON segments
//! keep their `:` and `,` while braces, quotes and spaces are escaped.

/// Percent-encode `s` the way `encodeURI` does.
pub fn encode_uri(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for ch in s.chars() {
        if is_unescaped(ch) {
            out.push(ch);
        } else {
            for byte in ch.encode_utf8(&mut buf).as_bytes() {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    out
}

fn is_unescaped(ch: char) -> bool {
    matches!(ch,
        'A'..='Z' | 'a'..='z' | '0'..='9'
        | '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')'
        | ';' | ',' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | '#'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_characters_pass_through() {
        let s = "http://h:8080/a;b,c?d=e&f+g$h#i";
        assert_eq!(encode_uri(s), s);
        assert_eq!(encode_uri("-_.!~*'()"), "-_.!~*'()");
    }

    #[test]
    fn json_punctuation_is_escaped() {
        assert_eq!(encode_uri(r#"{"a":1}"#), "%7B%22a%22:1%7D");
        assert_eq!(encode_uri("[1, 2]"), "%5B1,%202%5D");
    }

    #[test]
    fn percent_is_escaped() {
        assert_eq!(encode_uri("100%"), "100%25");
    }

    #[test]
    fn multibyte_characters_use_utf8_bytes() {
        assert_eq!(encode_uri("é"), "%C3%A9");
        assert_eq!(encode_uri("€"), "%E2%82%AC");
        assert_eq!(encode_uri("😀"), "%F0%9F%98%80");
    }
}
