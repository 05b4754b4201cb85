use locator_code_extractor::{CodeDefinition, DefinitionKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Longest content excerpt stored with a point
pub const PAYLOAD_CONTENT_MAX_CHARS: usize = 2000;

/// Isolation scope for one project's definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Definition data stored alongside a vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPayload {
    pub file_path: String,
    pub name: String,
    pub definition_type: DefinitionKind,
    pub start_line: usize,
    pub end_line: usize,
    pub signature: String,
    /// Content capped at [`PAYLOAD_CONTENT_MAX_CHARS`]
    pub content: String,
}

impl From<&CodeDefinition> for IndexPayload {
    fn from(definition: &CodeDefinition) -> Self {
        Self {
            file_path: definition.file_path.clone(),
            name: definition.name.clone(),
            definition_type: definition.definition_type,
            start_line: definition.start_line,
            end_line: definition.end_line,
            signature: definition.signature.clone(),
            content: definition
                .content
                .chars()
                .take(PAYLOAD_CONTENT_MAX_CHARS)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: IndexPayload,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub payload: IndexPayload,
    pub score: f32,
}
