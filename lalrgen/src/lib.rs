//! `lalrgen`: a parser generator compiling a declarative grammar
//! description — named tokens (regular expressions) plus named grammar
//! rules — into the table data a table-driven lexer and an LALR(1)
//! shift-reduce parser need at runtime.
//!
//! The pipeline, leaf-first:
//!
//! - [`regex`] + [`nfa`] + [`dfa`]: regex → NFA (Thompson) → DFA (subset
//!   construction), producing the lexer tables (components A, B, C).
//! - [`grammar`] + [`state`] + [`lalr`]: grammar model and start
//!   augmentation, LR(0) canonical collection, LALR(1) lookahead
//!   propagation (components D, E, F).
//! - [`tables`]: table assembly and conflict reporting, producing
//!   [`tables::LanguageData`] (component G).
//!
//! [`compile`] drives all seven stages and is the crate's single entry
//! point.

pub mod dfa;
pub mod error;
pub mod grammar;
pub mod lalr;
pub mod nfa;
pub mod regex;
pub mod state;
pub mod symbols;
pub mod tables;

pub use error::{ConflictKind, CoreError, GrammarConflict, GrammarError, InternalError};
pub use grammar::{Grammar, GrammarSpec, RuleDecl, TokenDecl};
pub use tables::LanguageData;

/// Compiles a [`GrammarSpec`] into [`LanguageData`], running every
/// component of the pipeline in turn. A batch, single-threaded pass: each
/// stage consumes its predecessor's output and produces an immutable
/// value, per §5 of the design.
pub fn compile(spec: &GrammarSpec) -> Result<LanguageData, CoreError> {
    let grammar = Grammar::build(spec)?;
    log::debug!(
        "grammar resolved: {} terminals, {} nonterminals, {} productions",
        grammar.symbols.max_terminal(),
        grammar.symbols.max_nonterminal(),
        grammar.productions.len()
    );

    let mut machine = nfa::Nfa::new();
    for token in &grammar.symbols.terminals {
        let node = regex::parse(&token.pattern)?;
        machine.add_token(token.id, &node);
    }
    let lex_tables = dfa::build(&machine, dfa::DEFAULT_MAX_DFA_STATES)?;
    log::debug!("lexer DFA has {} states", lex_tables.state_table.len());

    let collection = state::build(&grammar);
    log::debug!("LR(0) canonical collection has {} states", collection.states.len());

    let firsts = lalr::compute_firsts(&grammar);
    let lookaheads = lalr::compute_lookaheads(&grammar, &collection, &firsts);

    tables::assemble(&grammar, lex_tables, &collection, &lookaheads).map_err(CoreError::from)
}
