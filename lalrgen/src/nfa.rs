//! Component B: Thompson-construction NFA builder.
//!
//! Every regex tree is compiled against one shared [`Nfa`]: a fresh
//! fragment per token, each ε-linked from the single global start state.
//! The accepting state of each fragment is tagged with that token's id.

use std::collections::BTreeSet;

use crate::regex::ast::{ByteRange, Node};

pub type NfaState = usize;

#[derive(Debug, Clone)]
pub enum Transition {
    Byte { ranges: Vec<ByteRange>, negated: bool, target: NfaState },
    Epsilon(NfaState),
}

#[derive(Debug, Clone, Default)]
pub struct State {
    /// 0 = non-final; otherwise the token id this state accepts.
    pub final_tag: u32,
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<State>,
    pub start: NfaState,
}

/// A fragment under construction: an entry state and the list of
/// not-yet-patched "dangling" outgoing transitions.
struct Frag {
    start: NfaState,
    /// Indices into `dangling`-owning state's transition list that still
    /// point nowhere meaningful (self-loop placeholder) and must be
    /// retargeted once the fragment is threaded into its continuation.
    out: Vec<NfaState>,
}

impl Nfa {
    fn new_state(&mut self) -> NfaState {
        self.states.push(State::default());
        self.states.len() - 1
    }

    /// Adds a fresh ε-transition out of `from` that is still unpatched
    /// (points at itself as a placeholder); returns `from` so callers can
    /// collect it in a fragment's `out` list.
    fn new_dangling_epsilon(&mut self) -> NfaState {
        let s = self.new_state();
        self.states[s].transitions.push(Transition::Epsilon(s));
        s
    }

    fn patch(&mut self, out: &[NfaState], target: NfaState) {
        for &s in out {
            for t in self.states[s].transitions.iter_mut() {
                if let Transition::Epsilon(dst) = t {
                    if *dst == s {
                        *dst = target;
                    }
                }
            }
        }
    }

    fn compile_node(&mut self, node: &Node) -> Frag {
        match node {
            Node::Literal(b) => {
                let start = self.new_state();
                let out = self.new_dangling_epsilon();
                self.states[start].transitions.push(Transition::Byte {
                    ranges: vec![ByteRange { lo: *b, hi: *b }],
                    negated: false,
                    target: out,
                });
                Frag { start, out: vec![out] }
            }
            Node::Class { ranges, negated } => {
                let start = self.new_state();
                let out = self.new_dangling_epsilon();
                self.states[start].transitions.push(Transition::Byte {
                    ranges: ranges.clone(),
                    negated: *negated,
                    target: out,
                });
                Frag { start, out: vec![out] }
            }
            Node::Concat(lhs, rhs) => {
                let lhs_frag = self.compile_node(lhs);
                let rhs_frag = self.compile_node(rhs);
                self.patch(&lhs_frag.out, rhs_frag.start);
                Frag { start: lhs_frag.start, out: rhs_frag.out }
            }
            Node::Alternation(lhs, rhs) => {
                let lhs_frag = self.compile_node(lhs);
                let rhs_frag = self.compile_node(rhs);
                let start = self.new_state();
                self.states[start]
                    .transitions
                    .push(Transition::Epsilon(lhs_frag.start));
                self.states[start]
                    .transitions
                    .push(Transition::Epsilon(rhs_frag.start));
                let mut out = lhs_frag.out;
                out.extend(rhs_frag.out);
                Frag { start, out }
            }
            Node::Star(inner) => {
                let inner_frag = self.compile_node(inner);
                let start = self.new_state();
                let out = self.new_dangling_epsilon();
                self.states[start]
                    .transitions
                    .push(Transition::Epsilon(inner_frag.start));
                self.states[start].transitions.push(Transition::Epsilon(out));
                self.patch(&inner_frag.out, start);
                Frag { start, out: vec![out] }
            }
            Node::Plus(inner) => {
                let inner_frag = self.compile_node(inner);
                let loop_state = self.new_state();
                let out = self.new_dangling_epsilon();
                self.states[loop_state]
                    .transitions
                    .push(Transition::Epsilon(inner_frag.start));
                self.states[loop_state].transitions.push(Transition::Epsilon(out));
                self.patch(&inner_frag.out, loop_state);
                Frag { start: inner_frag.start, out: vec![out] }
            }
            Node::Optional(inner) => {
                let inner_frag = self.compile_node(inner);
                let start = self.new_state();
                let out = self.new_dangling_epsilon();
                self.states[start]
                    .transitions
                    .push(Transition::Epsilon(inner_frag.start));
                self.states[start].transitions.push(Transition::Epsilon(out));
                let mut out_list = inner_frag.out;
                out_list.push(out);
                Frag { start, out: out_list }
            }
        }
    }

    /// Compiles `node` as the pattern for `token_id`, threading it in from
    /// the shared global start via a fresh ε-edge, and tags the fragment's
    /// accepting state with `token_id`.
    pub fn add_token(&mut self, token_id: u32, node: &Node) {
        let frag = self.compile_node(node);
        self.states[self.start]
            .transitions
            .push(Transition::Epsilon(frag.start));
        let accept = self.new_state();
        self.patch(&frag.out, accept);
        self.states[accept].final_tag = token_id;
    }

    pub fn new() -> Self {
        let mut nfa = Nfa { states: Vec::new(), start: 0 };
        nfa.new_state();
        nfa
    }

    /// ε-closure of `states`: every state reachable by zero or more
    /// ε-transitions.
    pub fn epsilon_closure(&self, states: &BTreeSet<NfaState>) -> BTreeSet<NfaState> {
        let mut closure: BTreeSet<NfaState> = states.clone();
        let mut worklist: Vec<NfaState> = states.iter().copied().collect();
        while let Some(s) = worklist.pop() {
            for t in &self.states[s].transitions {
                if let Transition::Epsilon(dst) = t {
                    if closure.insert(*dst) {
                        worklist.push(*dst);
                    }
                }
            }
        }
        closure
    }

    /// States reachable from any state in `states` by consuming byte `b`.
    pub fn byte_move(&self, states: &BTreeSet<NfaState>, b: u8) -> BTreeSet<NfaState> {
        let mut result = BTreeSet::new();
        for &s in states {
            for t in &self.states[s].transitions {
                if let Transition::Byte { ranges, negated, target } = t {
                    if Node::class_matches(ranges, *negated, b) {
                        result.insert(*target);
                    }
                }
            }
        }
        result
    }
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}
