//! Component G: table assembly and conflict reporting.
//!
//! Flattens the LALR automaton into `parse_state_table` (GOTO, indexed by
//! terminal and nonterminal) and `parse_action_table` (indexed by
//! terminal), and interns the lexer's `LexTables` alongside them, into the
//! single value aggregate consumed by the runtime (§6): [`LanguageData`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dfa::LexTables;
use crate::error::{ConflictKind, GrammarConflict};
use crate::grammar::Grammar;
use crate::lalr::LookaheadTable;
use crate::state::CanonicalCollection;
use crate::symbols::Symbol;

/// One production as it appears in the output, indexed by reduction id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub head: u32,
    pub body: Vec<SymbolRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum SymbolRecord {
    Terminal(u32),
    Nonterminal(u32),
}

impl From<Symbol> for SymbolRecord {
    fn from(s: Symbol) -> Self {
        match s {
            Symbol::Terminal(id) => SymbolRecord::Terminal(id),
            Symbol::Nonterminal(id) => SymbolRecord::Nonterminal(id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalRecord {
    pub id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonterminalRecord {
    pub id: u32,
    pub is_start: bool,
}

/// The consolidated compiler output: a value aggregate with no further
/// behavior. Stable field names and table widths (§6 compatibility
/// contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageData {
    pub lex_skip_table: Vec<bool>,
    pub lex_state_table: Vec<[u32; 256]>,
    pub lex_final_table: Vec<u32>,
    pub parse_state_table: Vec<Vec<u32>>,
    pub parse_action_table: Vec<Vec<i32>>,
    pub terminals: BTreeMap<String, TerminalRecord>,
    pub nonterminals: BTreeMap<String, NonterminalRecord>,
    pub items: Vec<ItemRecord>,
    pub max_terminal: u32,
}

/// Column index of symbol `x` in `parse_state_table`, per §3: terminals
/// occupy columns `0..=T`, nonterminals occupy `T+1..=T+N+1`.
fn column_of(x: Symbol, max_terminal: u32) -> usize {
    match x {
        Symbol::Terminal(t) => t as usize,
        Symbol::Nonterminal(n) => (max_terminal as usize) + 1 + n as usize,
    }
}

/// Assembles `LanguageData` from the compiled lexer tables and the LALR
/// automaton, detecting shift/reduce and reduce/reduce conflicts. Returns
/// every conflict found (not just the first) so the caller can report them
/// all at once, matching the `--expect <n>` budget convention of the CLI.
pub fn assemble(
    grammar: &Grammar,
    lex_tables: LexTables,
    collection: &CanonicalCollection,
    lookaheads: &LookaheadTable,
) -> Result<LanguageData, Vec<GrammarConflict>> {
    let max_terminal = grammar.eof_terminal;
    let max_nonterminal = grammar.symbols.max_nonterminal();
    let state_table_width = max_terminal as usize + max_nonterminal as usize + 2;
    let action_table_width = max_terminal as usize + 1;

    // Row 0 is a reserved error row, mirroring the lexer's reject-sink
    // convention (`lex_state_table[0]`); real LR(0) states occupy rows
    // `1..=num_states` (collection state id `i` -> table row `i + 1`).
    let num_states = collection.states.len();
    let mut parse_state_table = vec![vec![0u32; state_table_width]; num_states + 1];
    let mut parse_action_table = vec![vec![-1i32; action_table_width]; num_states + 1];

    let mut conflicts = Vec::new();

    for state in &collection.states {
        let row = state.id + 1;
        for (&symbol, &target) in &state.goto {
            parse_state_table[row][column_of(symbol, max_terminal)] = target as u32 + 1;
        }

        // Candidate actions per terminal: shift (from items with the dot
        // before that terminal) and reduce-by-production (from completed
        // items whose lookahead contains it).
        let mut shifts: BTreeSet<u32> = BTreeSet::new();
        for item in &state.items {
            if let Some(Symbol::Terminal(t)) = item.next_symbol(grammar) {
                shifts.insert(t);
            }
        }

        let mut reduces: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for item in &state.items {
            if item.is_reducible(grammar) {
                let empty = BTreeSet::new();
                let la = lookaheads.get(&(state.id, *item)).unwrap_or(&empty);
                for &t in la {
                    reduces.entry(t).or_default().push(item.production);
                }
            }
        }

        let mut terminals: BTreeSet<u32> = shifts.clone();
        terminals.extend(reduces.keys().copied());

        for t in terminals {
            let shift = shifts.contains(&t);
            let reduce_list = reduces.get(&t).cloned().unwrap_or_default();

            match (shift, reduce_list.len()) {
                (false, 0) => {
                    parse_action_table[row][t as usize] = -1;
                }
                (true, 0) => {
                    parse_action_table[row][t as usize] = 0;
                }
                (false, 1) => {
                    parse_action_table[row][t as usize] = reduce_list[0] as i32 + 1;
                }
                (true, n) if n >= 1 => {
                    conflicts.push(build_conflict(
                        grammar,
                        row,
                        ConflictKind::ShiftReduce,
                        &reduce_list,
                    ));
                    parse_action_table[row][t as usize] = 0;
                }
                (false, _) => {
                    conflicts.push(build_conflict(
                        grammar,
                        row,
                        ConflictKind::ReduceReduce,
                        &reduce_list,
                    ));
                    parse_action_table[row][t as usize] = reduce_list[0] as i32 + 1;
                }
            }
        }
    }

    if !conflicts.is_empty() {
        return Err(conflicts);
    }

    let terminals = grammar
        .symbols
        .terminals
        .iter()
        .map(|t| (t.name.clone(), TerminalRecord { id: t.id }))
        .collect();

    let nonterminals = grammar
        .symbols
        .nonterminals
        .iter()
        .enumerate()
        .map(|(i, nt)| (nt.name.clone(), NonterminalRecord { id: nt.id, is_start: i == 0 }))
        .collect();

    let items = grammar
        .productions
        .iter()
        .map(|p| ItemRecord {
            head: p.head,
            body: p.body.iter().copied().map(SymbolRecord::from).collect(),
        })
        .collect();

    let mut lex_skip_table = vec![false; max_terminal as usize + 1];
    for t in &grammar.symbols.terminals {
        lex_skip_table[t.id as usize] = t.skip;
    }

    Ok(LanguageData {
        lex_skip_table,
        lex_state_table: lex_tables.state_table,
        lex_final_table: lex_tables.final_table,
        parse_state_table,
        parse_action_table,
        terminals,
        nonterminals,
        items,
        max_terminal,
    })
}

fn build_conflict(
    grammar: &Grammar,
    state: usize,
    kind: ConflictKind,
    productions: &[usize],
) -> GrammarConflict {
    let mut nonterminals = Vec::new();
    for &p in productions {
        let name = grammar
            .symbols
            .nonterminal_name(grammar.productions[p].head)
            .unwrap_or("?")
            .to_string();
        if !nonterminals.contains(&name) {
            nonterminals.push(name);
        }
    }
    GrammarConflict { state, kind, nonterminals }
}
