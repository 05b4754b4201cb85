use locator_code_extractor::CodeDefinition;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Definitions of one file arranged by line-range containment
#[derive(Debug)]
pub(crate) struct FileTree<'a> {
    pub path: &'a str,
    pub nodes: Vec<TreeNode<'a>>,
    pub roots: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct TreeNode<'a> {
    pub definition: &'a CodeDefinition,
    pub children: Vec<usize>,
}

/// Group definitions by file (sorted by path) and nest them by containment.
///
/// Nodes are stored in sorted order, so iterating `roots` then `children`
/// visits definitions by ascending `start_line`.
pub(crate) fn build(definitions: &[CodeDefinition]) -> Vec<FileTree<'_>> {
    let mut by_file: BTreeMap<&str, Vec<&CodeDefinition>> = BTreeMap::new();
    for definition in definitions {
        by_file
            .entry(definition.file_path.as_str())
            .or_default()
            .push(definition);
    }

    by_file
        .into_iter()
        .map(|(path, mut defs)| {
            defs.sort_by(|a, b| {
                (a.start_line, Reverse(a.end_line), &a.name)
                    .cmp(&(b.start_line, Reverse(b.end_line), &b.name))
            });
            nest(path, defs)
        })
        .collect()
}

fn nest<'a>(path: &'a str, sorted: Vec<&'a CodeDefinition>) -> FileTree<'a> {
    let mut nodes: Vec<TreeNode<'a>> = Vec::with_capacity(sorted.len());
    let mut roots = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for definition in sorted {
        while let Some(&top) = open.last() {
            if contains(nodes[top].definition, definition) {
                break;
            }
            open.pop();
        }

        let index = nodes.len();
        nodes.push(TreeNode {
            definition,
            children: Vec::new(),
        });
        match open.last() {
            Some(&parent) => nodes[parent].children.push(index),
            None => roots.push(index),
        }
        open.push(index);
    }

    FileTree { path, nodes, roots }
}

/// Strict containment; identical ranges are siblings
fn contains(outer: &CodeDefinition, inner: &CodeDefinition) -> bool {
    outer.encloses(inner)
        && (outer.start_line, outer.end_line) != (inner.start_line, inner.end_line)
}
