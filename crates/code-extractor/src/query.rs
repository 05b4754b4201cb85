use crate::error::{ExtractorError, Result};
use crate::language::Grammar;
use crate::types::DefinitionKind;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

/// Role a capture plays inside a definition pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureRole {
    /// Span of the whole declaration
    Definition,
    /// Identifier nested inside the declaration
    Name,
}

/// Typed form of a `<kind>.<role>` capture label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureKind {
    pub kind: DefinitionKind,
    pub role: CaptureRole,
}

impl CaptureKind {
    /// Parse a label such as `method.name`; unknown labels yield `None`
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let (kind, role) = label.split_once('.')?;
        let kind = DefinitionKind::from_label(kind)?;
        let role = match role {
            "definition" => CaptureRole::Definition,
            "name" => CaptureRole::Name,
            _ => return None,
        };
        Some(Self { kind, role })
    }
}

const PYTHON_PATTERNS: &str = r"
(class_definition
    name: (identifier) @class.name) @class.definition

(function_definition
    name: (identifier) @function.name) @function.definition
";

const JAVASCRIPT_PATTERNS: &str = r"
(class_declaration
    name: (identifier) @class.name) @class.definition

(function_declaration
    name: (identifier) @function.name) @function.definition

(generator_function_declaration
    name: (identifier) @function.name) @function.definition

(lexical_declaration
    (variable_declarator
        name: (identifier) @function.name
        value: (arrow_function))) @function.definition

(method_definition
    name: (property_identifier) @method.name) @method.definition

(method_definition
    name: (private_property_identifier) @method.name) @method.definition
";

const TYPESCRIPT_PATTERNS: &str = r"
(class_declaration
    name: (type_identifier) @class.name) @class.definition

(abstract_class_declaration
    name: (type_identifier) @class.name) @class.definition

(function_declaration
    name: (identifier) @function.name) @function.definition

(generator_function_declaration
    name: (identifier) @function.name) @function.definition

(lexical_declaration
    (variable_declarator
        name: (identifier) @function.name
        value: (arrow_function))) @function.definition

(method_definition
    name: (property_identifier) @method.name) @method.definition

(method_definition
    name: (private_property_identifier) @method.name) @method.definition

(interface_declaration
    name: (type_identifier) @interface.name) @interface.definition
";

/// Pattern source for a grammar family; `None` routes the grammar to the fallback walk
#[must_use]
pub(crate) const fn patterns_for(grammar: Grammar) -> Option<&'static str> {
    match grammar {
        Grammar::Python => Some(PYTHON_PATTERNS),
        Grammar::JavaScript => Some(JAVASCRIPT_PATTERNS),
        Grammar::TypeScript | Grammar::Tsx => Some(TYPESCRIPT_PATTERNS),
        Grammar::Rust => None,
    }
}

/// A definition capture paired with its resolved name capture
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueryHit<'tree> {
    pub node: Node<'tree>,
    pub kind: DefinitionKind,
    pub name: Option<Node<'tree>>,
}

/// Compiled definition query with capture labels resolved to [`CaptureKind`]s
pub(crate) struct DefinitionQuery {
    query: Query,
    /// Indexed by capture index
    captures: Vec<Option<CaptureKind>>,
}

impl DefinitionQuery {
    /// Compile the query for a grammar (`Ok(None)` when the grammar has no patterns)
    pub fn compile(grammar: Grammar) -> Result<Option<Self>> {
        let Some(source) = patterns_for(grammar) else {
            return Ok(None);
        };

        let query = Query::new(&grammar.tree_sitter_language(), source).map_err(|e| {
            ExtractorError::query(format!("{} query failed to compile: {e}", grammar.as_str()))
        })?;
        let captures = query
            .capture_names()
            .iter()
            .map(|label| CaptureKind::parse(label))
            .collect();

        Ok(Some(Self { query, captures }))
    }

    /// Run the query over a tree and pair every definition capture with its name
    pub fn run<'tree>(
        &self,
        root: Node<'tree>,
        source: &[u8],
        match_limit: u32,
    ) -> Result<Vec<QueryHit<'tree>>> {
        let mut cursor = QueryCursor::new();
        cursor.set_match_limit(match_limit);

        let mut hits = Vec::new();
        let mut matches = cursor.matches(&self.query, root, source);
        while let Some(query_match) = matches.next() {
            let mut definitions = Vec::new();
            let mut names = Vec::new();

            for capture in query_match.captures {
                let Some(Some(kind)) = self.captures.get(capture.index as usize) else {
                    continue;
                };
                match kind.role {
                    CaptureRole::Definition => definitions.push((capture.node, kind.kind)),
                    CaptureRole::Name => names.push((capture.node, kind.kind)),
                }
            }

            for (node, kind) in definitions {
                let name = names
                    .iter()
                    .filter(|(_, name_kind)| *name_kind == kind)
                    .filter_map(|(name, _)| depth_below(node, *name).map(|depth| (depth, *name)))
                    .min_by_key(|(depth, name)| (*depth, name.start_byte()))
                    .map(|(_, name)| name);
                hits.push(QueryHit { node, kind, name });
            }
        }
        drop(matches);

        if cursor.did_exceed_match_limit() {
            return Err(ExtractorError::query(format!(
                "query exceeded match limit of {match_limit}"
            )));
        }

        Ok(hits)
    }
}

/// Number of parent steps from `descendant` up to `ancestor`, if it is one
fn depth_below(ancestor: Node, descendant: Node) -> Option<usize> {
    const MAX_STEPS: usize = 64;

    let mut current = descendant;
    for depth in 0..MAX_STEPS {
        if current.id() == ancestor.id() {
            return Some(depth);
        }
        current = current.parent()?;
    }
    None
}
