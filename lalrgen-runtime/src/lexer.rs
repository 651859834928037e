//! The table-driven lexer half of the runtime ABI (§6): walks
//! `lex_state_table`/`lex_final_table` using the longest-match protocol
//! from §4.C, discarding tokens whose terminal is marked `skip`.

use lalrgen::LanguageData;

use crate::error::RuntimeError;
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub terminal_id: u32,
    pub from: usize,
    pub to: usize,
    pub location: Location,
}

impl Token {
    pub fn lexeme<'a>(&self, source: &'a str) -> &'a str {
        &source[self.from..self.to]
    }
}

/// Tokenizes `source` against `data`'s lexer tables. On success, returns
/// every non-skipped token in source order.
pub fn tokenize(data: &LanguageData, source: &str) -> Result<Vec<Token>, RuntimeError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut index = 0usize;
    let mut location = Location::start();

    while index < bytes.len() {
        let mut state = 1u32;
        let mut i = index;
        let mut last_match: Option<(u32, usize)> = None;

        loop {
            let tag = data.lex_final_table[state as usize];
            if tag != 0 {
                last_match = Some((tag, i));
            }
            if i >= bytes.len() {
                break;
            }
            let next = data.lex_state_table[state as usize][bytes[i] as usize];
            if next == 0 {
                break;
            }
            state = next;
            i += 1;
        }

        match last_match {
            Some((tag, end)) => {
                let text = &source[index..end];
                let start_location = location.clone();
                location.advance_past(text);
                if !data.lex_skip_table[tag as usize] {
                    tokens.push(Token { terminal_id: tag, from: index, to: end, location: start_location });
                }
                index = end;
            }
            None => {
                return Err(RuntimeError::BadCharacter { offset: index, location });
            }
        }
    }

    log::debug!("tokenized {} bytes into {} tokens", bytes.len(), tokens.len());
    Ok(tokens)
}
