//! The LALR(1) shift-reduce parser half of the runtime ABI (§6): a
//! pushdown automaton over `parse_state_table`/`parse_action_table`, fed by
//! the token list the lexer produced. Fatal on error; no recovery (§7).

use lalrgen::LanguageData;

use crate::error::RuntimeError;
use crate::lexer::Token;
use crate::location::Location;
use crate::tree::Tree;

/// Runs the shift-reduce automaton to completion, accepting when the
/// augmented start production (nonterminal id 0) is reduced.
///
/// `eof_location` is used only to annotate a `BadToken` error raised after
/// the real tokens are exhausted (the end-of-input sentinel itself has no
/// source bytes of its own).
pub fn parse(data: &LanguageData, tokens: &[Token], eof_location: Location) -> Result<Tree, RuntimeError> {
    let eof_terminal = data.max_terminal;
    let mut states: Vec<u32> = vec![1];
    let mut trees: Vec<Tree> = Vec::new();
    let mut index = 0usize;
    let end_offset = tokens.last().map(|t| t.to).unwrap_or(0);

    loop {
        let terminal_id = if index < tokens.len() { tokens[index].terminal_id } else { eof_terminal };
        let state = *states.last().expect("parser stack is never empty") as usize;
        let action = data.parse_action_table[state][terminal_id as usize];

        if action == -1 {
            let location = if index < tokens.len() {
                tokens[index].location.clone()
            } else {
                eof_location
            };
            return Err(RuntimeError::BadToken { token_index: index, location });
        } else if action == 0 {
            if index > tokens.len() {
                return Err(RuntimeError::EofShift);
            }
            let next_state = data.parse_state_table[state][terminal_id as usize];
            let (from, to) = if index < tokens.len() {
                (tokens[index].from, tokens[index].to)
            } else {
                (end_offset, end_offset)
            };
            states.push(next_state);
            trees.push(Tree::Leaf { terminal_id, from, to });
            index += 1;
        } else {
            let production = action as usize - 1;
            let item = &data.items[production];
            let body_len = item.body.len();
            let head = item.head;

            let mut children = Vec::with_capacity(body_len);
            for _ in 0..body_len {
                states.pop();
                children.push(trees.pop().expect("reduce pops fewer entries than pushed"));
            }
            children.reverse();

            if head == 0 {
                return Ok(Tree::Node { nonterminal_id: 0, children });
            }

            let top_state = *states.last().expect("parser stack is never empty") as usize;
            let goto_column = data.max_terminal as usize + 1 + head as usize;
            let goto_state = data.parse_state_table[top_state][goto_column];
            states.push(goto_state);
            trees.push(Tree::Node { nonterminal_id: head, children });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

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

    fn run(source: &str) -> Tree {
        let data = arithmetic_data();
        let tokens = tokenize(&data, source).unwrap();
        let mut eof_location = Location::start();
        eof_location.advance_past(source);
        parse(&data, &tokens, eof_location).unwrap()
    }

    #[test]
    fn trivial_arithmetic_tree_shape() {
        let tree = run("1+2");
        match tree {
            Tree::Node { nonterminal_id: 0, children } => {
                assert_eq!(children.len(), 2); // sum, $
                assert!(matches!(children[0], Tree::Node { .. }));
                assert_eq!(children[0].leaf_terminal_ids(), vec![1, 2, 1]);
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn whitespace_skip_produces_same_tree() {
        let with_ws = run("1 + 2");
        let without_ws = run("1+2");
        assert_eq!(with_ws, without_ws);
    }

    #[test]
    fn left_recursive_list_flattens() {
        let spec = lalrgen::GrammarSpec {
            tokens: vec![lalrgen::TokenDecl { name: "item".into(), pattern: "[a-z]".into(), skip: false }],
            rules: vec![lalrgen::RuleDecl {
                name: "list".into(),
                alternatives: vec![vec!["list".into(), "item".into()], vec!["item".into()]],
            }],
        };
        let data = lalrgen::compile(&spec).unwrap();
        let tokens = tokenize(&data, "abc").unwrap();
        let mut eof_location = Location::start();
        eof_location.advance_past("abc");
        let tree = parse(&data, &tokens, eof_location).unwrap();
        match tree {
            Tree::Node { children, .. } => assert_eq!(children[0].leaf_terminal_ids(), vec![1, 1, 1]),
            other => panic!("unexpected tree: {:?}", other),
        }
    }
}
