//! Component C: NFA → DFA subset construction.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::GrammarError;
use crate::nfa::{Nfa, NfaState};

pub const DEFAULT_MAX_DFA_STATES: usize = 1 << 16;

/// The lexer's emitted tables: dense `[state][byte] -> state` transitions
/// and a final-tag per state. State 0 is the reject sink, state 1 is the
/// start state.
#[derive(Debug, Clone)]
pub struct LexTables {
    pub state_table: Vec<[u32; 256]>,
    pub final_table: Vec<u32>,
}

/// Runs subset construction over `nfa`, resolving overlapping token
/// acceptance by lowest-token-id-wins. Refuses with
/// [`GrammarError::LexerTooLarge`] if more than `max_states` distinct DFA
/// states would be produced.
pub fn build(nfa: &Nfa, max_states: usize) -> Result<LexTables, GrammarError> {
    let mut state_table: Vec<[u32; 256]> = vec![[0u32; 256]];
    let mut final_table: Vec<u32> = vec![0];

    let mut interned: BTreeMap<BTreeSet<NfaState>, u32> = BTreeMap::new();
    let mut worklist: VecDeque<BTreeSet<NfaState>> = VecDeque::new();

    let start_set = nfa.epsilon_closure(&[nfa.start].into_iter().collect());
    interned.insert(start_set.clone(), 1);
    state_table.push([0u32; 256]);
    final_table.push(final_tag_of(nfa, &start_set));
    worklist.push_back(start_set);

    while let Some(set) = worklist.pop_front() {
        let from_id = interned[&set];
        for b in 0..=255u8 {
            let moved = nfa.byte_move(&set, b);
            if moved.is_empty() {
                continue;
            }
            let target_set = nfa.epsilon_closure(&moved);
            let target_id = match interned.get(&target_set) {
                Some(&id) => id,
                None => {
                    if interned.len() + 1 > max_states {
                        return Err(GrammarError::LexerTooLarge { limit: max_states });
                    }
                    let id = state_table.len() as u32;
                    interned.insert(target_set.clone(), id);
                    state_table.push([0u32; 256]);
                    final_table.push(final_tag_of(nfa, &target_set));
                    worklist.push_back(target_set);
                    id
                }
            };
            state_table[from_id as usize][b as usize] = target_id;
        }
    }

    Ok(LexTables { state_table, final_table })
}

/// Smallest non-zero `final_tag` among the NFA states in `set`, or 0 if
/// none of them are accepting (earliest-declared token wins on overlap).
fn final_tag_of(nfa: &Nfa, set: &BTreeSet<NfaState>) -> u32 {
    set.iter()
        .map(|&s| nfa.states[s].final_tag)
        .filter(|&tag| tag != 0)
        .min()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::parse;

    fn run(tables: &LexTables, input: &[u8]) -> Vec<(u32, usize)> {
        // Longest-match protocol from the spec: walk the DFA, remember the
        // last accepting (tag, index) pair seen.
        let mut results = Vec::new();
        let mut index = 0;
        while index < input.len() {
            let mut state = 1u32;
            let mut last_match: Option<(u32, usize)> = None;
            let mut i = index;
            loop {
                if tables.final_table[state as usize] != 0 {
                    last_match = Some((tables.final_table[state as usize], i));
                }
                if i >= input.len() {
                    break;
                }
                let next = tables.state_table[state as usize][input[i] as usize];
                if next == 0 {
                    break;
                }
                state = next;
                i += 1;
            }
            match last_match {
                Some((tag, end)) => {
                    results.push((tag, end));
                    index = end;
                }
                None => panic!("BadCharacter at {}", index),
            }
        }
        results
    }

    #[test]
    fn lowest_token_id_wins_on_overlap() {
        let mut nfa = Nfa::new();
        nfa.add_token(1, &parse("if").unwrap());
        nfa.add_token(2, &parse("[a-z]+").unwrap());
        let tables = build(&nfa, DEFAULT_MAX_DFA_STATES).unwrap();
        assert_eq!(run(&tables, b"if"), vec![(1, 2)]);
        assert_eq!(run(&tables, b"iff"), vec![(2, 3)]);
    }

    #[test]
    fn reject_sink_is_state_zero() {
        let mut nfa = Nfa::new();
        nfa.add_token(1, &parse("a").unwrap());
        let tables = build(&nfa, DEFAULT_MAX_DFA_STATES).unwrap();
        assert_eq!(tables.state_table[0], [0u32; 256]);
        assert_eq!(tables.final_table[0], 0);
    }

    #[test]
    fn state_limit_is_enforced() {
        let mut nfa = Nfa::new();
        nfa.add_token(1, &parse("a").unwrap());
        let err = build(&nfa, 1).unwrap_err();
        assert!(matches!(err, GrammarError::LexerTooLarge { limit: 1 }));
    }
}
