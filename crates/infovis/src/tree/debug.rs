//! Text rendering of a tree for logs and tests.

use std::fmt::{self, Write};

use super::{Tree, ROOT};

/// Branch drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation only.
    Compact,
}

/// Configuration for [`TreeDebug`].
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// Branch drawing style.
    pub style: TreeStyle,
    /// Whether to print node indices.
    pub show_ids: bool,
    /// Column whose text labels each node.
    pub label_column: Option<String>,
    /// Maximum depth to print (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            label_column: None,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Label nodes with the text of `column`.
    pub fn labelled(column: impl Into<String>) -> Self {
        Self {
            label_column: Some(column.into()),
            ..Default::default()
        }
    }
}

/// A printable view of a [`Tree`], created by [`Tree::debug`].
///
/// ```
/// use infovis::{Tree, TreeStyle, ROOT};
///
/// let tree = Tree::new();
/// let a = tree.add_node(ROOT).unwrap();
/// tree.add_node(a).unwrap();
/// tree.add_node(ROOT).unwrap();
///
/// let text = tree.debug().style(TreeStyle::Ascii).to_string();
/// assert_eq!(text, "[0]\n+-- [1]\n|   `-- [2]\n`-- [3]\n");
/// ```
pub struct TreeDebug<'a> {
    tree: &'a Tree,
    options: TreeFormatOptions,
    root: usize,
}

impl<'a> TreeDebug<'a> {
    /// View of the whole tree with default options.
    pub fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            options: TreeFormatOptions::default(),
            root: ROOT,
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: TreeFormatOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the branch style.
    pub fn style(mut self, style: TreeStyle) -> Self {
        self.options.style = style;
        self
    }

    /// Only print the subtree rooted at `node`.
    pub fn subtree(mut self, node: usize) -> Self {
        self.root = node;
        self
    }

    fn write_label(&self, f: &mut fmt::Formatter<'_>, node: usize) -> fmt::Result {
        let label = self
            .options
            .label_column
            .as_deref()
            .and_then(|name| self.tree.column(name))
            .and_then(|column| column.value_at(node));
        match (label, self.options.show_ids) {
            (Some(label), true) => write!(f, "{label} [{node}]"),
            (Some(label), false) => f.write_str(&label),
            (None, _) => write!(f, "[{node}]"),
        }
    }

    fn connectors(&self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self.options.style {
            TreeStyle::Ascii => ("|   ", "    ", "+-- ", "`-- "),
            TreeStyle::Unicode => (
                "\u{2502}   ",
                "    ",
                "\u{251c}\u{2500}\u{2500} ",
                "\u{2514}\u{2500}\u{2500} ",
            ),
            TreeStyle::Compact => ("  ", "  ", "- ", "- "),
        }
    }
}

impl fmt::Display for TreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tree.contains(self.root) {
            return writeln!(f, "(empty)");
        }
        let (branch, space, corner, last_corner) = self.connectors();

        // (node, depth, prefix carried by its descendants, is last sibling)
        let mut stack = vec![(self.root, 0usize, String::new(), true)];
        while let Some((node, depth, prefix, is_last)) = stack.pop() {
            if depth > 0 {
                f.write_str(&prefix)?;
                f.write_str(if is_last { last_corner } else { corner })?;
            }
            self.write_label(f, node)?;
            f.write_char('\n')?;

            if self.options.max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            let child_prefix = if depth == 0 {
                String::new()
            } else {
                format!("{prefix}{}", if is_last { space } else { branch })
            };
            let children = self.tree.children(node);
            let count = children.len();
            for (index, child) in children.into_iter().enumerate().rev() {
                stack.push((child, depth + 1, child_prefix.clone(), index + 1 == count));
            }
        }
        Ok(())
    }
}
