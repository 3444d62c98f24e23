// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Text rendering of an index's shape, for debugging.
//!
//! Pre-order, one node per line, with the occurrence count:
//!
//! ```text
//! R-----3 (2 elements)
//!      L-----1 (1 elements)
//!      R-----5 (1 elements)
//! ```
//!
//! The root is drawn as a right child. Left children extend the indent
//! with a rail so their siblings line up underneath.

use std::fmt;

use crate::index::{Index, Node};

const RIGHT_INDENT: &str = "     ";
const LEFT_INDENT: &str = "|    ";

fn render<T: fmt::Display>(node: &Node<T>, indent: &str, is_right: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (branch, extra) = if is_right { ("R-----", RIGHT_INDENT) } else { ("L-----", LEFT_INDENT) };
    writeln!(f, "{}{}{} ({} elements)", indent, branch, node.key, node.chain.len())?;

    let child_indent = format!("{}{}", indent, extra);
    if let Some(left) = node.left.as_deref() {
        render(left, &child_indent, false, f)?;
    }
    if let Some(right) = node.right.as_deref() {
        render(right, &child_indent, true, f)?;
    }
    return Ok(());
}

impl<T: fmt::Display> fmt::Display for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self.root.as_deref() {
            Some(root) => render(root, "", true, f),
            None => Ok(()),
        };
    }
}

#[cfg(test)]
mod tests {
    use crate::index::Index;

    #[test]
    fn empty_index_renders_nothing() {
        let index: Index<i32> = Index::new();
        assert_eq!(index.to_string(), "");
    }

    #[test]
    fn renders_pre_order_with_counts() {
        let index: Index<i32> = [3, 1, 5, 3].into_iter().collect();
        let expected = "\
R-----3 (2 elements)
     L-----1 (1 elements)
     R-----5 (1 elements)
";
        assert_eq!(index.to_string(), expected);
    }

    #[test]
    fn left_subtrees_draw_a_rail() {
        let index: Index<i32> = [4, 2, 6, 1, 3].into_iter().collect();
        let expected = "\
R-----4 (1 elements)
     L-----2 (1 elements)
     |    L-----1 (1 elements)
     |    R-----3 (1 elements)
     R-----6 (1 elements)
";
        assert_eq!(index.to_string(), expected);
    }
}
