use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::TreeArena;

impl TreeArena {
    /// Render the subtree at `idx` as a printable tree of `name [weight]`
    /// labels. Expanded nodes are marked with `-`, collapsed internal nodes
    /// with `+`.
    #[instrument(level = "debug", skip(self))]
    pub fn to_tree_string(&self, idx: Index) -> Tree<String> {
        let Some(node) = self.get_node(idx) else {
            return Tree::new("Empty tree".to_string());
        };
        let marker = match (node.is_leaf(), node.data.expanded) {
            (true, _) => "",
            (false, true) => "- ",
            (false, false) => "+ ",
        };
        let label = format!("{}{}", marker, node.data);
        let leaves: Vec<Tree<String>> = node
            .children
            .iter()
            .map(|&child| self.to_tree_string(child))
            .collect();
        Tree::new(label).with_leaves(leaves)
    }
}
