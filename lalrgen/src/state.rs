//! Component E: LR(0) canonical collection via CLOSURE and GOTO.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::grammar::Grammar;
use crate::symbols::Symbol;

/// A dotted item: a production index plus a dot position. Lookahead sets
/// (component F) are tracked out-of-line, keyed by `(state id, item)`, so
/// that this type stays a small, freely-clonable `Copy` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GrammarItemKey {
    pub production: usize,
    pub dot: usize,
}

impl GrammarItemKey {
    pub fn start() -> Self {
        GrammarItemKey { production: 0, dot: 0 }
    }

    pub fn next_symbol(&self, grammar: &Grammar) -> Option<Symbol> {
        grammar.productions[self.production].body.get(self.dot).copied()
    }

    pub fn is_reducible(&self, grammar: &Grammar) -> bool {
        self.dot == grammar.productions[self.production].body.len()
    }

    pub fn shifted(&self) -> Self {
        GrammarItemKey { production: self.production, dot: self.dot + 1 }
    }
}

/// One state of the LR(0) automaton: its kernel (identity), the full
/// closure (kernel plus closure-introduced items), and its GOTO successors.
#[derive(Debug, Clone)]
pub struct ParserState {
    pub id: usize,
    pub kernel: BTreeSet<GrammarItemKey>,
    pub items: BTreeSet<GrammarItemKey>,
    pub goto: BTreeMap<Symbol, usize>,
}

#[derive(Debug, Clone)]
pub struct CanonicalCollection {
    pub states: Vec<ParserState>,
}

/// CLOSURE(I): saturate `kernel` with every `B -> • γ` for each nonterminal
/// `B` immediately following a dot in the set, to a fixpoint.
pub fn closure(grammar: &Grammar, kernel: &BTreeSet<GrammarItemKey>) -> BTreeSet<GrammarItemKey> {
    let mut items = kernel.clone();
    loop {
        let mut additions = Vec::new();
        for item in &items {
            if let Some(Symbol::Nonterminal(nt)) = item.next_symbol(grammar) {
                for (index, _) in grammar.productions_of(nt) {
                    let candidate = GrammarItemKey { production: index, dot: 0 };
                    if !items.contains(&candidate) {
                        additions.push(candidate);
                    }
                }
            }
        }
        if additions.is_empty() {
            break;
        }
        items.extend(additions);
    }
    items
}

/// GOTO(I, X): the kernel of the successor state reached from `items` by
/// shifting over symbol `x`.
fn goto_kernel(grammar: &Grammar, items: &BTreeSet<GrammarItemKey>, x: Symbol) -> BTreeSet<GrammarItemKey> {
    items
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(x))
        .map(GrammarItemKey::shifted)
        .collect()
}

/// Builds the canonical collection of LR(0) item sets, starting from
/// `CLOSURE({S' -> • S $})` and exploring every distinct GOTO target.
/// States are identified (and merged) by kernel equality.
pub fn build(grammar: &Grammar) -> CanonicalCollection {
    let start_kernel: BTreeSet<GrammarItemKey> = [GrammarItemKey::start()].into_iter().collect();
    let start_items = closure(grammar, &start_kernel);

    let mut states = vec![ParserState {
        id: 0,
        kernel: start_kernel.clone(),
        items: start_items,
        goto: BTreeMap::new(),
    }];
    let mut kernel_index: BTreeMap<BTreeSet<GrammarItemKey>, usize> = BTreeMap::new();
    kernel_index.insert(start_kernel, 0);

    let mut worklist: VecDeque<usize> = VecDeque::from([0]);
    while let Some(state_id) = worklist.pop_front() {
        let items = states[state_id].items.clone();
        let mut symbols: BTreeSet<Symbol> = BTreeSet::new();
        for item in &items {
            if let Some(sym) = item.next_symbol(grammar) {
                symbols.insert(sym);
            }
        }
        for sym in symbols {
            let kernel = goto_kernel(grammar, &items, sym);
            if kernel.is_empty() {
                continue;
            }
            let target_id = match kernel_index.get(&kernel) {
                Some(&id) => id,
                None => {
                    let id = states.len();
                    let closure_items = closure(grammar, &kernel);
                    states.push(ParserState {
                        id,
                        kernel: kernel.clone(),
                        items: closure_items,
                        goto: BTreeMap::new(),
                    });
                    kernel_index.insert(kernel, id);
                    worklist.push_back(id);
                    id
                }
            };
            states[state_id].goto.insert(sym, target_id);
        }
    }

    CanonicalCollection { states }
}
