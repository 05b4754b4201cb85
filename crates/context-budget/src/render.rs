use crate::chunk::{char_len, extract_header, split_lines, truncate_chars};
use crate::config::{BudgetConfig, HEADER_PREFIX_MAX_CHARS, MAX_RECURSION_DEPTH};
use crate::tree::{self, FileTree};
use locator_code_extractor::CodeDefinition;

pub(crate) const EMPTY_STRUCTURE: &str = "No code definitions found.";

/// Result of a budgeted rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Units emitted with their body
    pub full_units: usize,
    /// Units reduced to their header line
    pub degraded_units: usize,
}

enum Piece {
    File {
        text: String,
        len: usize,
    },
    Unit {
        header: String,
        header_len: usize,
        body: String,
        body_len: usize,
    },
}

impl Piece {
    fn file(text: String) -> Self {
        let len = char_len(&text);
        Self::File { text, len }
    }

    fn unit(header: String, body: String) -> Self {
        Self::Unit {
            header_len: char_len(&header),
            body_len: char_len(&body),
            header,
            body,
        }
    }

    /// Characters this piece costs when fully degraded
    fn floor_len(&self) -> usize {
        match self {
            Self::File { len, .. } => *len,
            Self::Unit { header_len, .. } => *header_len,
        }
    }
}

/// Render definitions under `config`'s budget
pub fn render(definitions: &[CodeDefinition], config: &BudgetConfig) -> Rendered {
    if definitions.is_empty() {
        return Rendered {
            text: EMPTY_STRUCTURE.to_string(),
            full_units: 0,
            degraded_units: 0,
        };
    }

    let trees = tree::build(definitions);
    let mut planner = Planner::new(config);
    for (i, file) in trees.iter().enumerate() {
        planner.plan_file(file, i == 0);
    }

    let rendered = assemble(&planner.pieces, config.max_total_chars);
    log::debug!(
        "Rendered {} definitions ({} full, {} degraded) in {} chars",
        definitions.len(),
        rendered.full_units,
        rendered.degraded_units,
        char_len(&rendered.text)
    );
    rendered
}

/// Emit pieces in order, degrading every unit from the first one that no longer fits.
///
/// A unit is kept in full only if the remaining pieces still fit at their
/// degraded size afterwards.
fn assemble(pieces: &[Piece], max_total_chars: usize) -> Rendered {
    let mut reserve = vec![0usize; pieces.len() + 1];
    for i in (0..pieces.len()).rev() {
        reserve[i] = reserve[i + 1] + pieces[i].floor_len();
    }

    let mut text = String::new();
    let mut used = 0usize;
    let mut exhausted = false;
    let mut full_units = 0usize;
    let mut degraded_units = 0usize;

    for (i, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::File { text: header, len } => {
                text.push_str(header);
                used += len;
            }
            Piece::Unit {
                header,
                header_len,
                body,
                body_len,
            } => {
                text.push_str(header);
                used += header_len;

                if !exhausted && used + body_len + reserve[i + 1] <= max_total_chars {
                    text.push_str(body);
                    used += body_len;
                    full_units += 1;
                } else {
                    exhausted = true;
                    degraded_units += 1;
                }
            }
        }
    }

    Rendered {
        text,
        full_units,
        degraded_units,
    }
}

struct Planner<'c> {
    config: &'c BudgetConfig,
    block: usize,
    depth_cap: usize,
    pieces: Vec<Piece>,
}

impl<'c> Planner<'c> {
    fn new(config: &'c BudgetConfig) -> Self {
        Self {
            config,
            block: config.max_block_chars.max(1),
            depth_cap: config.effective_depth(),
            pieces: Vec::new(),
        }
    }

    fn plan_file(&mut self, file: &FileTree<'_>, first: bool) {
        let separator = if first { "" } else { "\n" };
        self.pieces
            .push(Piece::file(format!("{separator}## {}\n", file.path)));
        for &root in &file.roots {
            self.plan_node(file, root, 0);
        }
    }

    /// Recursion stops at `depth_cap`; deeper nodes go through `plan_listing` or splitting
    fn plan_node(&mut self, file: &FileTree<'_>, index: usize, depth: usize) {
        let node = &file.nodes[index];
        let definition = node.definition;
        let header = self.header_line(definition, depth);

        if char_len(&definition.content) <= self.block {
            self.pieces
                .push(Piece::unit(header, format!("{}\n", definition.content)));
            for &child in &node.children {
                self.plan_listing(file, child, depth + 1);
            }
            return;
        }

        if depth < self.depth_cap && node.children.len() >= self.config.min_children_for_recursion
        {
            let body = format!(
                "{}\n{}\n",
                extract_header(&definition.content, self.block),
                self.config.truncation_marker
            );
            self.pieces.push(Piece::unit(header, body));
            for &child in &node.children {
                self.plan_node(file, child, depth + 1);
            }
            return;
        }

        let parts = split_lines(&definition.content, self.block);
        let count = parts.len();
        let indent = indent(depth);
        let body: String = parts
            .iter()
            .enumerate()
            .map(|(i, part)| format!("{indent}  part {}/{count}\n{part}\n", i + 1))
            .collect();
        self.pieces.push(Piece::unit(header, body));
        for &child in &node.children {
            self.plan_listing(file, child, depth + 1);
        }
    }

    /// Header-only units for a subtree whose source is already emitted by an ancestor
    fn plan_listing(&mut self, file: &FileTree<'_>, index: usize, depth: usize) {
        let mut stack = vec![(index, depth)];
        while let Some((index, depth)) = stack.pop() {
            let node = &file.nodes[index];
            let header = self.header_line(node.definition, depth);
            self.pieces.push(Piece::unit(header, String::new()));
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    fn header_line(&self, definition: &CodeDefinition, depth: usize) -> String {
        let prefix = format!(
            "{}- [{}] {} (lines {}-{})",
            indent(depth),
            definition.definition_type,
            definition.name,
            definition.start_line,
            definition.end_line
        );
        let mut line = truncate_chars(&prefix, HEADER_PREFIX_MAX_CHARS).replace('\n', " ");

        let signature = definition.signature.trim();
        if !signature.is_empty() {
            line.push_str(" | ");
            line.push_str(&truncate_chars(signature, self.config.signature_max_chars).replace('\n', " "));
        }
        line.push('\n');
        line
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth.min(MAX_RECURSION_DEPTH))
}
