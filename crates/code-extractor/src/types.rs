use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, located unit of source code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeDefinition {
    /// Project-relative source path
    pub file_path: String,

    /// Identifier of the definition
    pub name: String,

    /// Function, class, method or interface
    pub definition_type: DefinitionKind,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Exact source slice of the definition
    pub content: String,

    /// Trimmed first line of the definition
    pub signature: String,
}

impl CodeDefinition {
    /// Deduplication key, unique within one extraction run
    #[must_use]
    pub fn key(&self) -> (&str, &str, usize) {
        (&self.file_path, &self.name, self.start_line)
    }

    /// Get the number of lines in this definition
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check whether `other` lies inside this definition's line range
    #[must_use]
    pub fn encloses(&self, other: &CodeDefinition) -> bool {
        self.file_path == other.file_path
            && self.start_line <= other.start_line
            && other.end_line <= self.end_line
    }
}

/// Kind of a code definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Function,
    Class,
    Method,
    Interface,
}

impl DefinitionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Interface => "interface",
        }
    }

    /// Parse the `<kind>` prefix of a capture label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "function" => Some(Self::Function),
            "class" => Some(Self::Class),
            "method" => Some(Self::Method),
            "interface" => Some(Self::Interface),
            _ => None,
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw file handed to the extractor
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Project-relative path, also used for grammar detection
    pub path: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Per-file extraction result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Extracted(Vec<CodeDefinition>),
    /// Extension has no grammar mapping
    Unsupported,
    ParseFailed(String),
    TooLarge { bytes: usize, limit: usize },
}

impl FileOutcome {
    /// Definitions carried by this outcome (empty for skipped files)
    #[must_use]
    pub fn into_definitions(self) -> Vec<CodeDefinition> {
        match self {
            Self::Extracted(definitions) => definitions,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, start: usize, end: usize) -> CodeDefinition {
        CodeDefinition {
            file_path: "svc.py".to_string(),
            name: name.to_string(),
            definition_type: DefinitionKind::Function,
            start_line: start,
            end_line: end,
            content: String::new(),
            signature: String::new(),
        }
    }

    #[test]
    fn test_line_count() {
        assert_eq!(definition("a", 10, 15).line_count(), 6);
        assert_eq!(definition("a", 3, 3).line_count(), 1);
    }

    #[test]
    fn test_encloses() {
        let class = definition("Service", 1, 20);
        let method = definition("run", 4, 8);
        assert!(class.encloses(&method));
        assert!(!method.encloses(&class));

        let mut elsewhere = definition("run", 4, 8);
        elsewhere.file_path = "other.py".to_string();
        assert!(!class.encloses(&elsewhere));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&DefinitionKind::Interface).unwrap();
        assert_eq!(json, "\"interface\"");
        assert_eq!(DefinitionKind::from_label("method"), Some(DefinitionKind::Method));
        assert_eq!(DefinitionKind::from_label("module"), None);
    }
}
