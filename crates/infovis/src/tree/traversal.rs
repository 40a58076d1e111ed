//! Depth-first traversal.
//!
//! Traversals are iterative, so deep trees cannot overflow the stack.
//! Children are visited in insertion order. A visitor's
//! [`pre_order`](DepthFirstVisitor::pre_order) may return `false` to skip a
//! node's subtree; [`post_order`](DepthFirstVisitor::post_order) runs for
//! every node whose `pre_order` returned `true`, after all its descendants.
//!
//! # Example
//!
//! ```
//! use infovis::{Tree, ROOT};
//! use infovis::traversal::{depth_first, FnVisitor};
//!
//! let tree = Tree::new();
//! let a = tree.add_node(ROOT).unwrap();
//! tree.add_node(a).unwrap();
//! tree.add_node(ROOT).unwrap();
//!
//! let mut seen = Vec::new();
//! let mut visitor = FnVisitor::from_pre_order(|node| {
//!     seen.push(node);
//!     node != a // do not descend below `a`
//! });
//! depth_first::visit(&tree, &mut visitor);
//! assert_eq!(seen, vec![ROOT, a, 3]);
//! ```

use super::{Tree, ROOT};

/// Callbacks invoked by a depth-first traversal.
pub trait DepthFirstVisitor {
    /// Called before the children of `node`. Return `false` to skip them.
    fn pre_order(&mut self, node: usize) -> bool {
        let _ = node;
        true
    }

    /// Called after the children of `node`.
    fn post_order(&mut self, node: usize) {
        let _ = node;
    }
}

/// A visitor built from closures.
pub struct FnVisitor<Pre, Post> {
    pre: Pre,
    post: Post,
}

impl<Pre, Post> FnVisitor<Pre, Post>
where
    Pre: FnMut(usize) -> bool,
    Post: FnMut(usize),
{
    /// Visitor with both callbacks.
    pub fn new(pre: Pre, post: Post) -> Self {
        Self { pre, post }
    }
}

impl<Pre> FnVisitor<Pre, fn(usize)>
where
    Pre: FnMut(usize) -> bool,
{
    /// Visitor with only a pre-order callback.
    pub fn from_pre_order(pre: Pre) -> Self {
        Self { pre, post: |_| {} }
    }
}

impl<Post> FnVisitor<fn(usize) -> bool, Post>
where
    Post: FnMut(usize),
{
    /// Visitor with only a post-order callback.
    pub fn from_post_order(post: Post) -> Self {
        Self { pre: |_| true, post }
    }
}

impl<Pre, Post> DepthFirstVisitor for FnVisitor<Pre, Post>
where
    Pre: FnMut(usize) -> bool,
    Post: FnMut(usize),
{
    fn pre_order(&mut self, node: usize) -> bool {
        (self.pre)(node)
    }

    fn post_order(&mut self, node: usize) {
        (self.post)(node)
    }
}

/// Depth-first walks.
pub mod depth_first {
    use super::{DepthFirstVisitor, Tree, ROOT};

    struct Frame {
        node: usize,
        children: Vec<usize>,
        cursor: usize,
    }

    /// Walk the whole tree from [`ROOT`].
    pub fn visit<V: DepthFirstVisitor + ?Sized>(tree: &Tree, visitor: &mut V) {
        visit_subtree(tree, ROOT, visitor);
    }

    /// Walk the subtree rooted at `root`. Does nothing if `root` is not live.
    pub fn visit_subtree<V: DepthFirstVisitor + ?Sized>(tree: &Tree, root: usize, visitor: &mut V) {
        if !tree.contains(root) || !visitor.pre_order(root) {
            return;
        }
        let mut stack = vec![Frame {
            node: root,
            children: tree.children(root),
            cursor: 0,
        }];
        while let Some(frame) = stack.last_mut() {
            match frame.children.get(frame.cursor).copied() {
                Some(child) => {
                    frame.cursor += 1;
                    if visitor.pre_order(child) {
                        stack.push(Frame {
                            node: child,
                            children: tree.children(child),
                            cursor: 0,
                        });
                    }
                }
                None => {
                    let node = frame.node;
                    stack.pop();
                    visitor.post_order(node);
                }
            }
        }
    }
}

/// Every live node in pre-order.
pub fn preorder(tree: &Tree) -> Vec<usize> {
    let mut nodes = Vec::with_capacity(tree.node_count());
    depth_first::visit(
        tree,
        &mut FnVisitor::from_pre_order(|node| {
            nodes.push(node);
            true
        }),
    );
    nodes
}

/// Every live node in post-order.
pub fn postorder(tree: &Tree) -> Vec<usize> {
    postorder_from(tree, ROOT)
}

/// The subtree rooted at `node` in post-order.
pub fn postorder_from(tree: &Tree, node: usize) -> Vec<usize> {
    let mut nodes = Vec::new();
    let mut visitor = FnVisitor::from_post_order(|node| nodes.push(node));
    depth_first::visit_subtree(tree, node, &mut visitor);
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ROOT -> 1 -> (2 -> 4, 3)
    fn sample() -> Tree {
        let tree = Tree::new();
        let a = tree.add_node(ROOT).unwrap();
        let b = tree.add_node(a).unwrap();
        tree.add_node(a).unwrap();
        tree.add_node(b).unwrap();
        tree
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip: Option<usize>,
    }

    impl DepthFirstVisitor for Recorder {
        fn pre_order(&mut self, node: usize) -> bool {
            self.events.push(format!("<{node}"));
            Some(node) != self.skip
        }

        fn post_order(&mut self, node: usize) {
            self.events.push(format!("{node}>"));
        }
    }

    #[test]
    fn test_orders() {
        let tree = sample();
        assert_eq!(preorder(&tree), vec![0, 1, 2, 4, 3]);
        assert_eq!(postorder(&tree), vec![4, 2, 3, 1, 0]);
        assert_eq!(postorder_from(&tree, 2), vec![4, 2]);
    }

    #[test]
    fn test_pre_and_post_callbacks() {
        let tree = sample();
        let mut recorder = Recorder::default();
        depth_first::visit_subtree(&tree, 1, &mut recorder);
        assert_eq!(
            recorder.events,
            vec!["<1", "<2", "<4", "4>", "2>", "<3", "3>", "1>"]
        );
    }

    #[test]
    fn test_pre_order_false_skips_subtree() {
        let tree = sample();
        let mut recorder = Recorder {
            skip: Some(2),
            ..Default::default()
        };
        depth_first::visit(&tree, &mut recorder);
        assert!(!recorder.events.contains(&"<4".to_string()));
        assert!(!recorder.events.contains(&"2>".to_string()));
        assert!(recorder.events.contains(&"3>".to_string()));
    }

    #[test]
    fn test_dead_root_visits_nothing() {
        let tree = sample();
        tree.remove_row(2).unwrap();
        assert!(postorder_from(&tree, 2).is_empty());
        assert_eq!(preorder(&tree), vec![0, 1, 4, 3]);
    }

    #[test]
    fn test_fn_visitor_both() {
        let tree = sample();
        let mut pre = Vec::new();
        let mut post = Vec::new();
        let mut visitor = FnVisitor::new(
            |node| {
                pre.push(node);
                true
            },
            |node| post.push(node),
        );
        depth_first::visit(&tree, &mut visitor);
        drop(visitor);
        assert_eq!(pre.len(), 5);
        assert_eq!(post.last(), Some(&ROOT));
    }
}
