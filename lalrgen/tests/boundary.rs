//! End-to-end boundary scenarios, compiling through `lalrgen` and running
//! the result through `lalrgen-runtime`, matching the teacher's top-level
//! `tests/calc` integration-test convention.

use lalrgen::{CoreError, GrammarError, GrammarSpec, RuleDecl, TokenDecl};
use lalrgen_runtime::Tree;

fn token(name: &str, pattern: &str, skip: bool) -> TokenDecl {
    TokenDecl { name: name.into(), pattern: pattern.into(), skip }
}

fn rule(name: &str, alternatives: Vec<Vec<&str>>) -> RuleDecl {
    RuleDecl {
        name: name.into(),
        alternatives: alternatives
            .into_iter()
            .map(|alt| alt.into_iter().map(String::from).collect())
            .collect(),
    }
}

#[test]
fn trivial_arithmetic() {
    let spec = GrammarSpec {
        tokens: vec![token("num", "[0-9]+", false), token("plus", r"\+", false)],
        rules: vec![rule("sum", vec![vec!["num", "plus", "num"], vec!["num"]])],
    };
    let data = lalrgen::compile(&spec).unwrap();

    let tree = lalrgen_runtime::parse(&data, "1+2").unwrap();
    let sum = match &tree {
        Tree::Node { nonterminal_id: 0, children } => &children[0],
        other => panic!("unexpected tree: {:?}", other),
    };
    assert_eq!(sum.leaf_terminal_ids(), vec![1, 2, 1]);

    let tree = lalrgen_runtime::parse(&data, "3").unwrap();
    match &tree {
        Tree::Node { nonterminal_id: 0, children } => {
            assert_eq!(children[0].leaf_terminal_ids(), vec![1]);
        }
        other => panic!("unexpected tree: {:?}", other),
    }
}

#[test]
fn skip_whitespace_matches_without_it() {
    let spec = GrammarSpec {
        tokens: vec![
            token("num", "[0-9]+", false),
            token("plus", r"\+", false),
            token("ws", "[ \\t]+", true),
        ],
        rules: vec![rule("sum", vec![vec!["num", "plus", "num"], vec!["num"]])],
    };
    let data = lalrgen::compile(&spec).unwrap();

    let with_ws = lalrgen_runtime::parse(&data, "1 + 2").unwrap();
    let without_ws = lalrgen_runtime::parse(&data, "1+2").unwrap();
    assert_eq!(with_ws, without_ws);
}

#[test]
fn ambiguous_sum_reports_conflict_naming_e() {
    let spec = GrammarSpec {
        tokens: vec![token("num", "[0-9]+", false), token("plus", r"\+", false)],
        rules: vec![rule("e", vec![vec!["e", "plus", "e"], vec!["num"]])],
    };
    match lalrgen::compile(&spec) {
        Err(CoreError::Conflict(conflicts)) => {
            assert!(!conflicts.is_empty());
            for conflict in &conflicts {
                assert_eq!(conflict.nonterminals, vec!["e".to_string()]);
            }
        }
        other => panic!("expected a conflict, got {:?}", other),
    }
}

#[test]
fn longest_match_prefers_declaration_order_on_ties() {
    let spec = GrammarSpec {
        tokens: vec![token("if_", "if", false), token("ident", "[a-z]+", false)],
        rules: vec![rule("start", vec![vec!["if_"], vec!["ident"]])],
    };
    let data = lalrgen::compile(&spec).unwrap();

    let tree = lalrgen_runtime::parse(&data, "if").unwrap();
    match &tree {
        Tree::Node { children, .. } => assert_eq!(children[0].leaf_terminal_ids(), vec![1]),
        other => panic!("unexpected tree: {:?}", other),
    }

    let tree = lalrgen_runtime::parse(&data, "iff").unwrap();
    match &tree {
        Tree::Node { children, .. } => assert_eq!(children[0].leaf_terminal_ids(), vec![2]),
        other => panic!("unexpected tree: {:?}", other),
    }
}

#[test]
fn left_recursive_list_flattens_in_order() {
    let spec = GrammarSpec {
        tokens: vec![token("item", "[a-z]", false)],
        rules: vec![rule("list", vec![vec!["list", "item"], vec!["item"]])],
    };
    let data = lalrgen::compile(&spec).unwrap();

    let tree = lalrgen_runtime::parse(&data, "abc").unwrap();
    match &tree {
        Tree::Node { children, .. } => assert_eq!(children[0].leaf_terminal_ids(), vec![1, 1, 1]),
        other => panic!("unexpected tree: {:?}", other),
    }
}

#[test]
fn unknown_symbol_names_the_identifier() {
    let spec = GrammarSpec {
        tokens: vec![token("num", "[0-9]+", false)],
        rules: vec![rule("start", vec![vec!["num", "bogus"]])],
    };
    match lalrgen::compile(&spec) {
        Err(CoreError::Grammar(GrammarError::UndefinedSymbol { name })) => {
            assert_eq!(name, "bogus");
        }
        other => panic!("expected an undefined-symbol error, got {:?}", other),
    }
}

#[test]
fn language_data_round_trips_through_json() {
    let spec = GrammarSpec {
        tokens: vec![token("num", "[0-9]+", false), token("plus", r"\+", false)],
        rules: vec![rule("sum", vec![vec!["num", "plus", "num"], vec!["num"]])],
    };
    let data = lalrgen::compile(&spec).unwrap();
    let json = serde_json::to_string(&data).unwrap();
    let round_tripped: lalrgen::LanguageData = serde_json::from_str(&json).unwrap();
    assert_eq!(round_tripped.max_terminal, data.max_terminal);
    assert_eq!(round_tripped.parse_action_table, data.parse_action_table);
    assert_eq!(round_tripped.parse_state_table, data.parse_state_table);
}

#[test]
fn lexer_reject_sink_and_action_table_invariants_hold() {
    let spec = GrammarSpec {
        tokens: vec![token("num", "[0-9]+", false), token("plus", r"\+", false)],
        rules: vec![rule("sum", vec![vec!["num", "plus", "num"], vec!["num"]])],
    };
    let data = lalrgen::compile(&spec).unwrap();

    assert_eq!(data.lex_state_table[0], [0u32; 256]);
    assert_eq!(data.lex_final_table[0], 0);

    let num_productions = data.items.len() as i32;
    for row in &data.parse_action_table {
        for &cell in row {
            assert!(cell == -1 || (cell >= 0 && cell <= num_productions));
        }
    }
}
