/// A parse tree node: either a terminal carrying its token's byte bounds in
/// the source, or a nonterminal carrying its ordered list of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Leaf { terminal_id: u32, from: usize, to: usize },
    Node { nonterminal_id: u32, children: Vec<Tree> },
}

impl Tree {
    /// The terminal ids of every leaf in this tree, left to right.
    pub fn leaf_terminal_ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        self.collect_leaf_ids(&mut ids);
        ids
    }

    fn collect_leaf_ids(&self, out: &mut Vec<u32>) {
        match self {
            Tree::Leaf { terminal_id, .. } => out.push(*terminal_id),
            Tree::Node { children, .. } => {
                for child in children {
                    child.collect_leaf_ids(out);
                }
            }
        }
    }
}
