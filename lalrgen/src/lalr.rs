//! Component F: FIRST sets and LALR(1) lookahead propagation over the
//! already-built LR(0) canonical collection.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::grammar::Grammar;
use crate::state::{CanonicalCollection, GrammarItemKey};
use crate::symbols::Symbol;

/// FIRST(A) for a single nonterminal: the terminals that can begin some
/// derivation of A, plus whether A can derive the empty string.
#[derive(Debug, Clone, Default)]
pub struct FirstsData {
    pub token_set: BTreeSet<u32>,
    pub nullable: bool,
}

/// Least fixpoint of `FIRST(A) ⊇ {first terminal of any production of A,
/// transitively through nullable prefixes}` for every declared nonterminal.
pub fn compute_firsts(grammar: &Grammar) -> BTreeMap<u32, FirstsData> {
    let mut firsts: BTreeMap<u32, FirstsData> = grammar
        .symbols
        .nonterminals
        .iter()
        .map(|nt| (nt.id, FirstsData::default()))
        .collect();

    loop {
        let mut changed = false;
        for production in &grammar.productions {
            if production.head == 0 {
                continue; // augmented start never derives anything itself
            }
            let (first_body, nullable_body) = first_of_sequence(&firsts, &production.body);
            let entry = firsts.get_mut(&production.head).unwrap();
            for t in first_body {
                changed |= entry.token_set.insert(t);
            }
            if nullable_body && !entry.nullable {
                entry.nullable = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    firsts
}

/// FIRST of a symbol string: the union of FIRSTs through the nullable
/// prefix; the returned bool is true iff the entire string is nullable.
pub fn first_of_sequence(firsts: &BTreeMap<u32, FirstsData>, symbols: &[Symbol]) -> (BTreeSet<u32>, bool) {
    let mut result = BTreeSet::new();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(t) => {
                result.insert(*t);
                return (result, false);
            }
            Symbol::Nonterminal(nt) => {
                let data = firsts.get(nt).cloned().unwrap_or_default();
                result.extend(data.token_set);
                if !data.nullable {
                    return (result, false);
                }
            }
        }
    }
    (result, true)
}

/// `lookaheads[(state, item)]` is the set of terminals that legitimize a
/// reduction (or continuation) at that item in that state.
pub type LookaheadTable = BTreeMap<(usize, GrammarItemKey), BTreeSet<u32>>;

/// Computes LALR(1) lookaheads over `collection` by propagating terminal
/// sets to a fixpoint, using two kinds of edges:
///
/// - **shift edges**, unconditional: an item's lookahead always flows to
///   its shifted counterpart in the GOTO successor state (the same
///   occurrence of the item, just one symbol further along);
/// - **closure edges**, conditional on nullability: within a state, an
///   item `A -> α • B β` contributes `FIRST(β)` to every closure item
///   `B -> • γ`, and (when `β` is nullable) also propagates its own
///   lookahead set to them.
pub fn compute_lookaheads(
    grammar: &Grammar,
    collection: &CanonicalCollection,
    firsts: &BTreeMap<u32, FirstsData>,
) -> LookaheadTable {
    let mut lookaheads: LookaheadTable = BTreeMap::new();
    let mut edges: Vec<((usize, GrammarItemKey), (usize, GrammarItemKey))> = Vec::new();

    lookaheads
        .entry((0, GrammarItemKey::start()))
        .or_default()
        .insert(grammar.eof_terminal);

    for state in &collection.states {
        for &item in &state.items {
            if let Some(Symbol::Nonterminal(b)) = item.next_symbol(grammar) {
                let beta = &grammar.productions[item.production].body[item.dot + 1..];
                let (first_beta, beta_nullable) = first_of_sequence(firsts, beta);

                for (idx, _) in grammar.productions_of(b) {
                    let closure_item = GrammarItemKey { production: idx, dot: 0 };
                    if !state.items.contains(&closure_item) {
                        continue;
                    }
                    let target = lookaheads.entry((state.id, closure_item)).or_default();
                    for t in &first_beta {
                        target.insert(*t);
                    }
                    if beta_nullable {
                        edges.push(((state.id, item), (state.id, closure_item)));
                    }
                }
            }

            if let Some(x) = item.next_symbol(grammar) {
                if let Some(&target_state) = state.goto.get(&x) {
                    edges.push(((state.id, item), (target_state, item.shifted())));
                }
            }
        }
    }

    let mut queue: VecDeque<(usize, GrammarItemKey)> = lookaheads.keys().copied().collect();
    let mut forward: BTreeMap<(usize, GrammarItemKey), Vec<(usize, GrammarItemKey)>> = BTreeMap::new();
    for (from, to) in &edges {
        forward.entry(*from).or_default().push(*to);
    }

    while let Some(node) = queue.pop_front() {
        let source_set = lookaheads.get(&node).cloned().unwrap_or_default();
        if let Some(targets) = forward.get(&node) {
            for target in targets.clone() {
                let entry = lookaheads.entry(target).or_default();
                let before = entry.len();
                for t in &source_set {
                    entry.insert(*t);
                }
                if entry.len() != before {
                    queue.push_back(target);
                }
            }
        }
    }

    lookaheads
}
