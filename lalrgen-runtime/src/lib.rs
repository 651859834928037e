//! `lalrgen-runtime`: the table-driven lexer and LALR(1) parser that
//! consume a [`lalrgen::LanguageData`] produced by the compiler (§6). A
//! grammar compiled once can be replayed against any number of source
//! texts without regenerating Rust code for it.

pub mod error;
pub mod lexer;
pub mod location;
pub mod parser;
pub mod tree;

pub use error::RuntimeError;
pub use lexer::{tokenize, Token};
pub use location::Location;
pub use tree::Tree;

use lalrgen::LanguageData;

/// Tokenizes `source` and parses the result in one pass, the common case
/// for a runtime consumer that doesn't need the intermediate token list.
pub fn parse(data: &LanguageData, source: &str) -> Result<Tree, RuntimeError> {
    let tokens = lexer::tokenize(data, source)?;
    let mut eof_location = Location::start();
    eof_location.advance_past(source);
    parser::parse(data, &tokens, eof_location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic_data() -> LanguageData {
        let spec = lalrgen::GrammarSpec {
            tokens: vec![
                lalrgen::TokenDecl { name: "num".into(), pattern: "[0-9]+".into(), skip: false },
                lalrgen::TokenDecl { name: "plus".into(), pattern: r"\+".into(), skip: false },
                lalrgen::TokenDecl { name: "ws".into(), pattern: "[ \\t]+".into(), skip: true },
            ],
            rules: vec![lalrgen::RuleDecl {
                name: "sum".into(),
                alternatives: vec![
                    vec!["num".into(), "plus".into(), "num".into()],
                    vec!["num".into()],
                ],
            }],
        };
        lalrgen::compile(&spec).unwrap()
    }

    #[test]
    fn parse_composes_lexer_and_parser() {
        let data = arithmetic_data();
        let tree = parse(&data, "12 + 7").unwrap();
        // num, plus, num, then the $ sentinel at id `max_terminal` (ws is
        // skipped so never reaches the token stream at all).
        assert_eq!(tree.leaf_terminal_ids(), vec![1, 2, 1, data.max_terminal]);
    }

    #[test]
    fn bad_character_propagates_through_parse() {
        let data = arithmetic_data();
        let err = parse(&data, "1 @ 2").unwrap_err();
        assert!(matches!(err, RuntimeError::BadCharacter { .. }));
    }

    #[test]
    fn unexpected_token_is_reported() {
        let data = arithmetic_data();
        let err = parse(&data, "+ 1").unwrap_err();
        assert!(matches!(err, RuntimeError::BadToken { token_index: 0, .. }));
    }
}
