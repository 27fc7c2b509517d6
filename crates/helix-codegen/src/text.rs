use helix_ast::TokenKind;

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '"' || c == '\''
}

/// Append a token's literal text, separating adjacent words with one space.
///
/// With `space_after_comma`, a comma is followed by a single space as well;
/// type text keeps `Map<K,V>` tight while decorator arguments read
/// `route("/", methods)`.
pub(crate) fn append_token(buf: &mut String, kind: TokenKind, text: &str, space_after_comma: bool) {
    let needs_space = match (buf.chars().last(), text.chars().next()) {
        (Some(','), Some(_)) => space_after_comma,
        (Some(prev), Some(next)) => is_word(prev) && is_word(next),
        _ => false,
    };
    if needs_space {
        buf.push(' ');
    }
    buf.push_str(text);
    debug_assert!(kind != TokenKind::Newline, "newlines never reach rendered text");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(tokens: &[(TokenKind, &str)], space_after_comma: bool) -> String {
        let mut buf = String::new();
        for (kind, text) in tokens {
            append_token(&mut buf, *kind, text, space_after_comma);
        }
        buf
    }

    #[test]
    fn test_words_are_spaced() {
        use TokenKind::*;
        assert_eq!(join(&[(Ident, "unsigned"), (Ident, "int")], false), "unsigned int");
        assert_eq!(join(&[(Ident, "List"), (Lt, "<"), (Ident, "int"), (Gt, ">")], false), "List<int>");
    }

    #[test]
    fn test_comma_spacing() {
        use TokenKind::*;
        let tokens = [(Ident, "K"), (Comma, ","), (Ident, "V")];
        assert_eq!(join(&tokens, false), "K,V");
        assert_eq!(join(&tokens, true), "K, V");
    }
}
