use crate::types::DefinitionKind;
use tree_sitter::Node;

/// Node kinds that carry a definition's identifier across the supported grammars
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "property_identifier",
    "private_property_identifier",
    "name",
];

/// Definition kind for a syntax node kind, if it is one of the known declarations
pub(crate) fn definition_kind_for(node_kind: &str) -> Option<DefinitionKind> {
    match node_kind {
        "function_declaration"
        | "generator_function_declaration"
        | "function_definition"
        | "function_item" => Some(DefinitionKind::Function),
        "class_declaration"
        | "abstract_class_declaration"
        | "class_definition"
        | "struct_item"
        | "enum_item" => Some(DefinitionKind::Class),
        "method_definition" => Some(DefinitionKind::Method),
        "interface_declaration" | "trait_item" => Some(DefinitionKind::Interface),
        _ => None,
    }
}

/// First immediate child that looks like an identifier
pub(crate) fn identifier_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| IDENTIFIER_KINDS.contains(&child.kind()));
    found
}

/// Whether a function node sits directly in a class-like body
pub(crate) fn is_class_member(node: Node<'_>) -> bool {
    let mut parent = node.parent();
    // Python decorators wrap the function one level deeper
    if parent.is_some_and(|p| p.kind() == "decorated_definition") {
        parent = parent.and_then(|p| p.parent());
    }
    let Some(body) = parent else {
        return false;
    };
    let Some(owner) = body.parent() else {
        return false;
    };

    matches!(
        (body.kind(), owner.kind()),
        ("block", "class_definition")
            | ("declaration_list", "impl_item")
            | ("declaration_list", "trait_item")
    )
}

/// Output of the fallback walk
pub(crate) struct Walk<'tree> {
    pub definitions: Vec<(Node<'tree>, DefinitionKind)>,
    /// Set when some subtree sat below the depth cap
    pub truncated: bool,
}

/// Pre-order walk over the whole tree collecting known definition nodes.
///
/// Uses an explicit worklist; children of nodes at `max_depth` are not visited.
pub(crate) fn walk_definitions(root: Node<'_>, max_depth: usize) -> Walk<'_> {
    let mut definitions = Vec::new();
    let mut truncated = false;
    let mut stack = vec![(root, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        if let Some(kind) = definition_kind_for(node.kind()) {
            definitions.push((node, kind));
        }

        if node.child_count() == 0 {
            continue;
        }
        if depth >= max_depth {
            truncated = true;
            continue;
        }

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    Walk {
        definitions,
        truncated,
    }
}
