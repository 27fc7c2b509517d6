use helix_ast::{Modifier, RecognizedModifiers, TokenCursor};

/// Consume leading modifier keywords.
///
/// Stops at the first token that is not a recognized modifier. Never fails;
/// most declarations have no modifiers at all.
pub fn parse(cursor: &mut TokenCursor<'_>, recognized: &RecognizedModifiers) -> Vec<Modifier> {
    let mut modifiers = Vec::new();
    while let Some(modifier) = cursor.peek().and_then(|node| recognized.lookup(&node.text)) {
        tracing::trace!(%modifier, "consumed modifier");
        modifiers.push(modifier);
        cursor.bump();
    }
    modifiers
}

/// Boolean view of a parsed modifier list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifierFlags {
    pub is_static: bool,
    pub is_async: bool,
    pub is_unsafe: bool,
    pub is_private: bool,
    pub is_protected: bool,
    pub is_final: bool,
}

impl ModifierFlags {
    pub fn from_modifiers(modifiers: &[Modifier]) -> Self {
        let mut flags = Self::default();
        for modifier in modifiers {
            match modifier {
                Modifier::Static => flags.is_static = true,
                Modifier::Async => flags.is_async = true,
                Modifier::Unsafe => flags.is_unsafe = true,
                Modifier::Private => flags.is_private = true,
                Modifier::Protected => flags.is_protected = true,
                Modifier::Final => flags.is_final = true,
            }
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_ast::{KeywordTable, lex};

    #[test]
    fn test_static_async() {
        let tokens = lex("static async fn bar()").unwrap();
        let recognized = KeywordTable::default()
            .recognized_subset(&[Modifier::Static, Modifier::Async, Modifier::Unsafe]);
        let mut cursor = TokenCursor::new(&tokens);

        let modifiers = parse(&mut cursor, &recognized);
        assert_eq!(modifiers, [Modifier::Static, Modifier::Async]);
        assert_eq!(cursor.peek().unwrap().text, "fn");

        let flags = ModifierFlags::from_modifiers(&modifiers);
        assert!(flags.is_static && flags.is_async && !flags.is_unsafe);
    }

    #[test]
    fn test_unrecognized_modifier_stops() {
        let tokens = lex("final fn bar()").unwrap();
        let recognized = KeywordTable::default().recognized_subset(&[Modifier::Static]);
        let mut cursor = TokenCursor::new(&tokens);
        assert!(parse(&mut cursor, &recognized).is_empty());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let recognized = KeywordTable::default().recognized_modifiers();
        for source in [
            "fn a()",
            "unsafe fn a()",
            "private static final fn a()",
            "async async fn a()",
            "static",
        ] {
            let tokens = lex(source).unwrap();
            let mut cursor = TokenCursor::new(&tokens);
            parse(&mut cursor, &recognized);
            let rest = cursor.position();
            assert!(parse(&mut cursor, &recognized).is_empty(), "{source}");
            assert_eq!(cursor.position(), rest);
        }
    }

    #[test]
    fn test_renamed_keyword() {
        let table = KeywordTable::default().with_modifier(Modifier::Static, "shared");
        let recognized = table.recognized_modifiers();
        let tokens = lex("shared static fn a()").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        assert_eq!(parse(&mut cursor, &recognized), [Modifier::Static]);
        assert_eq!(cursor.peek().unwrap().text, "static");
    }
}
