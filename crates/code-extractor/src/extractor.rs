use crate::config::ExtractorConfig;
use crate::language::Grammar;
use crate::query::{DefinitionQuery, QueryHit};
use crate::traversal::{identifier_child, is_class_member, walk_definitions};
use crate::types::{CodeDefinition, DefinitionKind, FileOutcome, SourceFile};
use std::collections::{HashMap, HashSet};
use tree_sitter::{Node, Parser};

/// Turns source files into normalized code definitions.
///
/// Queries are compiled once at construction; parsers are created per call since
/// they are not shareable across threads.
pub struct Extractor {
    config: ExtractorConfig,
    queries: HashMap<Grammar, DefinitionQuery>,
}

impl Extractor {
    /// Create a new extractor with configuration
    #[must_use]
    pub fn new(config: ExtractorConfig) -> Self {
        let mut queries = HashMap::new();
        for grammar in Grammar::ALL {
            match DefinitionQuery::compile(grammar) {
                Ok(Some(query)) => {
                    queries.insert(grammar, query);
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("{e}; {} files will use the tree walk", grammar.as_str());
                }
            }
        }

        Self { config, queries }
    }

    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Whether a grammar is served by a pattern query (as opposed to the tree walk)
    #[must_use]
    pub fn has_query(&self, grammar: Grammar) -> bool {
        self.queries.contains_key(&grammar)
    }

    /// Extract definitions from every file, skipping files that cannot be handled.
    ///
    /// Output order follows input order but is not part of the contract.
    pub fn extract(&self, files: &[SourceFile]) -> Vec<CodeDefinition> {
        let mut parsers: HashMap<Grammar, Parser> = HashMap::new();
        let mut seen: HashSet<(String, String, usize)> = HashSet::new();
        let mut definitions = Vec::new();
        let mut skipped = 0usize;

        for file in files {
            let Some(grammar) = Grammar::from_path(&file.path) else {
                log::debug!("Skipping {} (no grammar for extension)", file.path);
                skipped += 1;
                continue;
            };

            let parser = match parsers.entry(grammar) {
                std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
                std::collections::hash_map::Entry::Vacant(entry) => match grammar.parser() {
                    Ok(parser) => entry.insert(parser),
                    Err(e) => {
                        log::warn!("Skipping {}: {e}", file.path);
                        skipped += 1;
                        continue;
                    }
                },
            };

            match self.extract_source(file, grammar, parser) {
                FileOutcome::Extracted(found) => {
                    for definition in found {
                        let key = (
                            definition.file_path.clone(),
                            definition.name.clone(),
                            definition.start_line,
                        );
                        if seen.insert(key) {
                            definitions.push(definition);
                        }
                    }
                }
                outcome => {
                    log::warn!("Skipping {}: {}", file.path, describe(&outcome));
                    skipped += 1;
                }
            }
        }

        log::info!(
            "Extracted {} definitions from {} files ({} skipped)",
            definitions.len(),
            files.len() - skipped,
            skipped
        );
        definitions
    }

    /// Extract definitions from a single file
    pub fn extract_file(&self, file: &SourceFile) -> FileOutcome {
        let Some(grammar) = Grammar::from_path(&file.path) else {
            return FileOutcome::Unsupported;
        };
        match grammar.parser() {
            Ok(mut parser) => self.extract_source(file, grammar, &mut parser),
            Err(e) => FileOutcome::ParseFailed(e.to_string()),
        }
    }

    fn extract_source(
        &self,
        file: &SourceFile,
        grammar: Grammar,
        parser: &mut Parser,
    ) -> FileOutcome {
        let limit = self.config.max_file_bytes;
        if file.content.len() > limit {
            return FileOutcome::TooLarge {
                bytes: file.content.len(),
                limit,
            };
        }

        let Some(tree) = parser.parse(&file.content, None) else {
            return FileOutcome::ParseFailed(format!(
                "{} parser produced no tree",
                grammar.as_str()
            ));
        };
        let root = tree.root_node();
        if root.has_error() {
            log::debug!("{} parsed with syntax errors", file.path);
        }

        let hits = self.find_definitions(&file.path, grammar, root, &file.content);

        let lines: Vec<&[u8]> = file.content.split(|b| *b == b'\n').collect();
        let mut seen = HashSet::new();
        let mut definitions = Vec::new();
        for hit in hits {
            let Some(definition) = Self::hit_to_definition(&file.path, &file.content, &lines, hit)
            else {
                continue;
            };
            if seen.insert((definition.name.clone(), definition.start_line)) {
                definitions.push(definition);
            }
        }
        // Document order, enclosing definitions before the ones they contain
        definitions.sort_by(|a, b| {
            a.start_line
                .cmp(&b.start_line)
                .then(b.end_line.cmp(&a.end_line))
        });

        FileOutcome::Extracted(definitions)
    }

    /// Query path first; the tree walk covers grammars without a query and query failures
    fn find_definitions<'tree>(
        &self,
        path: &str,
        grammar: Grammar,
        root: Node<'tree>,
        source: &[u8],
    ) -> Vec<QueryHit<'tree>> {
        if let Some(query) = self.queries.get(&grammar) {
            match query.run(root, source, self.config.query_match_limit) {
                Ok(hits) => return hits,
                Err(e) => log::warn!("{path}: {e}; falling back to tree walk"),
            }
        }

        let walk = walk_definitions(root, self.config.max_traversal_depth);
        if walk.truncated {
            log::debug!(
                "{path}: tree walk cut at depth {}",
                self.config.max_traversal_depth
            );
        }
        walk.definitions
            .into_iter()
            .map(|(node, kind)| QueryHit {
                node,
                kind,
                name: None,
            })
            .collect()
    }

    fn hit_to_definition(
        path: &str,
        source: &[u8],
        lines: &[&[u8]],
        hit: QueryHit<'_>,
    ) -> Option<CodeDefinition> {
        let name_node = hit.name.or_else(|| identifier_child(hit.node))?;
        let name = node_text(source, name_node).trim().to_string();
        if name.is_empty() {
            return None;
        }

        let kind = if hit.kind == DefinitionKind::Function && is_class_member(hit.node) {
            DefinitionKind::Method
        } else {
            hit.kind
        };

        let start_line = hit.node.start_position().row + 1;
        let end_line = (hit.node.end_position().row + 1).max(start_line);
        let signature = lines
            .get(start_line - 1)
            .map(|line| String::from_utf8_lossy(line).trim().to_string())
            .unwrap_or_default();

        Some(CodeDefinition {
            file_path: path.to_string(),
            name,
            definition_type: kind,
            start_line,
            end_line,
            content: node_text(source, hit.node),
            signature,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

fn node_text(source: &[u8], node: Node<'_>) -> String {
    let end = node.end_byte().min(source.len());
    let start = node.start_byte().min(end);
    String::from_utf8_lossy(&source[start..end]).into_owned()
}

fn describe(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Extracted(found) => format!("{} definitions", found.len()),
        FileOutcome::Unsupported => "unsupported extension".to_string(),
        FileOutcome::ParseFailed(reason) => format!("parse failed: {reason}"),
        FileOutcome::TooLarge { bytes, limit } => {
            format!("file too large ({bytes} bytes > {limit})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_one(path: &str, code: &str) -> Vec<CodeDefinition> {
        Extractor::default()
            .extract_file(&SourceFile::new(path, code))
            .into_definitions()
    }

    #[test]
    fn test_python_functions() {
        let code = "def create_channel():\n    pass\n\ndef list_messages():\n    return []\n";
        let defs = extract_one("service.py", code);

        assert_eq!(defs.len(), 2);
        assert!(defs.iter().all(|d| d.definition_type == DefinitionKind::Function));
        assert_eq!(defs[0].signature, "def create_channel():");
        assert_eq!(defs[1].signature, "def list_messages():");
        assert_eq!((defs[0].start_line, defs[0].end_line), (1, 2));
    }

    #[test]
    fn test_python_method_promotion() {
        let code = "class Repo:\n    def save(self):\n        pass\n";
        let defs = extract_one("repo.py", code);

        let save = defs.iter().find(|d| d.name == "save").unwrap();
        assert_eq!(save.definition_type, DefinitionKind::Method);
        let repo = defs.iter().find(|d| d.name == "Repo").unwrap();
        assert_eq!(repo.definition_type, DefinitionKind::Class);
    }

    #[test]
    fn test_unsupported_extension() {
        let outcome = Extractor::default().extract_file(&SourceFile::new("notes.md", "# hi"));
        assert_eq!(outcome, FileOutcome::Unsupported);
    }

    #[test]
    fn test_too_large_file_is_skipped() {
        let extractor = Extractor::new(ExtractorConfig {
            max_file_bytes: 8,
            ..ExtractorConfig::default()
        });
        let outcome = extractor.extract_file(&SourceFile::new("a.py", "def long_name(): pass\n"));
        assert!(matches!(outcome, FileOutcome::TooLarge { limit: 8, .. }));
    }

    #[test]
    fn test_content_is_exact_slice() {
        let code = "x = 1\n\nfunction add(a, b) {\n  return a + b;\n}\n";
        let defs = extract_one("math.js", code);

        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].content, "function add(a, b) {\n  return a + b;\n}");
        assert_eq!((defs[0].start_line, defs[0].end_line), (3, 5));
    }

    #[test]
    fn test_queries_compiled_for_query_grammars() {
        let extractor = Extractor::default();
        assert!(extractor.has_query(Grammar::Python));
        assert!(extractor.has_query(Grammar::TypeScript));
        assert!(!extractor.has_query(Grammar::Rust));
    }
}
