use crate::error::{ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grammar a source file is parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
}

impl Grammar {
    pub const ALL: [Grammar; 5] = [
        Grammar::Python,
        Grammar::JavaScript,
        Grammar::TypeScript,
        Grammar::Tsx,
        Grammar::Rust,
    ];

    /// Map a file extension to a grammar; `None` means the file is skipped
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "py" | "pyw" => Some(Grammar::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Grammar::JavaScript),
            "ts" | "mts" | "cts" => Some(Grammar::TypeScript),
            "tsx" => Some(Grammar::Tsx),
            "rs" => Some(Grammar::Rust),
            _ => None,
        }
    }

    /// Detect grammar from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get grammar identifier as string
    pub fn as_str(self) -> &'static str {
        match self {
            Grammar::Python => "python",
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
            Grammar::Tsx => "tsx",
            Grammar::Rust => "rust",
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Grammar::Python => tree_sitter_python::LANGUAGE.into(),
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Grammar::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    /// Build a parser bound to this grammar
    pub fn parser(self) -> Result<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.tree_sitter_language())
            .map_err(|e| {
                ExtractorError::tree_sitter(format!(
                    "Failed to set language {}: {e}",
                    self.as_str()
                ))
            })?;
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Grammar::from_extension("py"), Some(Grammar::Python));
        assert_eq!(Grammar::from_extension("PY"), Some(Grammar::Python));
        assert_eq!(Grammar::from_extension(".ts"), Some(Grammar::TypeScript));
        assert_eq!(Grammar::from_extension("tsx"), Some(Grammar::Tsx));
        assert_eq!(Grammar::from_extension("jsx"), Some(Grammar::JavaScript));
        assert_eq!(Grammar::from_extension("rs"), Some(Grammar::Rust));
        assert_eq!(Grammar::from_extension("md"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Grammar::from_path("src/service.py"), Some(Grammar::Python));
        assert_eq!(Grammar::from_path("web/app.tsx"), Some(Grammar::Tsx));
        assert_eq!(Grammar::from_path("Makefile"), None);
        assert_eq!(Grammar::from_path("README.md"), None);
    }

    #[test]
    fn test_every_grammar_builds_a_parser() {
        for grammar in Grammar::ALL {
            assert!(grammar.parser().is_ok(), "{} parser", grammar.as_str());
        }
    }
}
