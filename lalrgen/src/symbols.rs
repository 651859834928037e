//! Terminal and nonterminal identities (component D: grammar model).
//!
//! Ids are assigned in declaration order: terminals starting at 1 (0 is the
//! reserved "no token" value), nonterminals starting at 1 (0 is reserved for
//! the augmented start symbol introduced by [`crate::grammar::Grammar`]).

use std::collections::BTreeMap;

/// A tagged union of terminal-or-nonterminal. The tag travels with the id
/// so that table lookups never need runtime type dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(u32),
    Nonterminal(u32),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }
}

/// A declared token: its assigned id, source regex, and whether matches of
/// it are discarded by the lexer.
#[derive(Debug, Clone)]
pub struct Terminal {
    pub id: u32,
    pub name: String,
    pub pattern: String,
    pub skip: bool,
}

/// A declared rule name; carries no data beyond identity; its alternatives
/// live in `Grammar::productions`.
#[derive(Debug, Clone)]
pub struct Nonterminal {
    pub id: u32,
    pub name: String,
}

/// Bidirectional name/id bookkeeping for both symbol namespaces, built once
/// while consuming a [`crate::grammar::GrammarSpec`] and never mutated
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub terminals: Vec<Terminal>,
    pub nonterminals: Vec<Nonterminal>,
    name_to_symbol: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new terminal, assigning it the next terminal id in
    /// sequence. Returns `Err` if the name is already in use (as either a
    /// terminal or a nonterminal).
    pub fn add_terminal(
        &mut self,
        name: &str,
        pattern: &str,
        skip: bool,
    ) -> Result<u32, crate::error::GrammarError> {
        if self.name_to_symbol.contains_key(name) {
            return Err(crate::error::GrammarError::DuplicateSymbol { name: name.to_string() });
        }
        let id = self.terminals.len() as u32 + 1;
        self.terminals.push(Terminal {
            id,
            name: name.to_string(),
            pattern: pattern.to_string(),
            skip,
        });
        self.name_to_symbol.insert(name.to_string(), Symbol::Terminal(id));
        Ok(id)
    }

    /// Declares a new nonterminal, assigning it the next nonterminal id in
    /// sequence (ids 1.. ; 0 is reserved for the augmented start symbol
    /// added later by [`crate::grammar::Grammar`]).
    pub fn add_nonterminal(
        &mut self,
        name: &str,
    ) -> Result<u32, crate::error::GrammarError> {
        if self.name_to_symbol.contains_key(name) {
            return Err(crate::error::GrammarError::DuplicateSymbol { name: name.to_string() });
        }
        let id = self.nonterminals.len() as u32 + 1;
        self.nonterminals.push(Nonterminal { id, name: name.to_string() });
        self.name_to_symbol.insert(name.to_string(), Symbol::Nonterminal(id));
        Ok(id)
    }

    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        self.name_to_symbol.get(name).copied()
    }

    pub fn terminal_name(&self, id: u32) -> Option<&str> {
        self.terminals.iter().find(|t| t.id == id).map(|t| t.name.as_str())
    }

    pub fn nonterminal_name(&self, id: u32) -> Option<&str> {
        if id == 0 {
            return Some("$start");
        }
        self.nonterminals.iter().find(|n| n.id == id).map(|n| n.name.as_str())
    }

    pub fn max_terminal(&self) -> u32 {
        self.terminals.len() as u32
    }

    pub fn max_nonterminal(&self) -> u32 {
        self.nonterminals.len() as u32
    }
}
