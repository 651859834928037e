//! Component D: grammar model and start-symbol augmentation.

use serde::{Deserialize, Serialize};

use crate::error::GrammarError;
use crate::symbols::{Symbol, SymbolTable};

/// A single declared token, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDecl {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub skip: bool,
}

/// A single declared rule: a name and its ordered list of alternative
/// bodies, each body an ordered list of symbol names (referring to either
/// a token or another rule).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDecl {
    pub name: String,
    pub alternatives: Vec<Vec<String>>,
}

/// The input to the core compiler: `{tokens: name→(regex, options),
/// rules: name→[alternatives]}` from §2. Declaration order is significant:
/// it fixes terminal/nonterminal ids and picks the start symbol (the first
/// declared rule).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GrammarSpec {
    pub tokens: Vec<TokenDecl>,
    pub rules: Vec<RuleDecl>,
}

/// One production: `head -> body`. Productions are indexed 0..M-1 in a
/// stable order; that index is the reduction id used in the action table.
/// Index 0 is always the augmented start production `S' -> S $`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub head: u32,
    pub body: Vec<Symbol>,
}

/// A fully resolved grammar: symbol table plus the augmented production
/// list. Immutable once built.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub symbols: SymbolTable,
    pub productions: Vec<Production>,
    /// The terminal id of `$`, the end-of-input marker: one past the
    /// highest user-declared terminal id.
    pub eof_terminal: u32,
}

impl Grammar {
    /// Builds a [`Grammar`] from a [`GrammarSpec`], performing start
    /// augmentation (`S' -> S $`) and resolving every rule-body identifier
    /// against the combined terminal/nonterminal namespace.
    pub fn build(spec: &GrammarSpec) -> Result<Grammar, GrammarError> {
        let mut symbols = SymbolTable::new();

        for token in &spec.tokens {
            symbols.add_terminal(&token.name, &token.pattern, token.skip)?;
        }

        if spec.rules.is_empty() {
            return Err(GrammarError::NoStartSymbol);
        }

        for rule in &spec.rules {
            symbols.add_nonterminal(&rule.name)?;
        }

        let eof_terminal = symbols.max_terminal() + 1;
        let user_start_id = symbols.nonterminals[0].id;

        let mut productions = Vec::new();
        productions.push(Production {
            head: 0,
            body: vec![
                Symbol::Nonterminal(user_start_id),
                Symbol::Terminal(eof_terminal),
            ],
        });

        for rule in &spec.rules {
            let head_id = match symbols.resolve(&rule.name) {
                Some(Symbol::Nonterminal(id)) => id,
                _ => {
                    return Err(GrammarError::UndefinedSymbol { name: rule.name.clone() })
                }
            };
            for alternative in &rule.alternatives {
                let mut body = Vec::with_capacity(alternative.len());
                for name in alternative {
                    match symbols.resolve(name) {
                        Some(sym) => body.push(sym),
                        None => {
                            return Err(GrammarError::UndefinedSymbol { name: name.clone() })
                        }
                    }
                }
                productions.push(Production { head: head_id, body });
            }
        }

        Ok(Grammar { symbols, productions, eof_terminal })
    }

    pub fn start_production(&self) -> &Production {
        &self.productions[0]
    }

    pub fn productions_of(&self, nonterminal: u32) -> impl Iterator<Item = (usize, &Production)> {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.head == nonterminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic_spec() -> GrammarSpec {
        GrammarSpec {
            tokens: vec![
                TokenDecl { name: "num".into(), pattern: "[0-9]+".into(), skip: false },
                TokenDecl { name: "plus".into(), pattern: r"\+".into(), skip: false },
            ],
            rules: vec![RuleDecl {
                name: "sum".into(),
                alternatives: vec![
                    vec!["num".into(), "plus".into(), "num".into()],
                    vec!["num".into()],
                ],
            }],
        }
    }

    #[test]
    fn start_augmentation() {
        let grammar = Grammar::build(&arithmetic_spec()).unwrap();
        let start = grammar.start_production();
        assert_eq!(start.head, 0);
        assert_eq!(start.body.len(), 2);
        assert!(start.body[0].is_nonterminal());
        assert!(start.body[1].is_terminal());
        assert_eq!(grammar.eof_terminal, 3);
    }

    #[test]
    fn undefined_symbol_reported() {
        let mut spec = arithmetic_spec();
        spec.rules[0].alternatives[0].push("bogus".into());
        let err = Grammar::build(&spec).unwrap_err();
        match err {
            GrammarError::UndefinedSymbol { name } => assert_eq!(name, "bogus"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn empty_grammar_rejected() {
        let spec = GrammarSpec::default();
        assert_eq!(Grammar::build(&spec).unwrap_err(), GrammarError::NoStartSymbol);
    }
}
