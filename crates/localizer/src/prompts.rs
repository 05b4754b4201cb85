//! Prompt templates for reasoning calls.

use crate::provider::ChatMessage;

pub const EXTRACT_FEATURES_SYSTEM: &str = r#"You are a requirements analyst. Extract the user-facing business features from the requirement description.

Rules:
1. Only extract important modules and features.
2. Ignore technical details such as project layout, error handling, logging, containerization and test strategy.
3. Ignore data model definitions (for example a Channel model or a Message model).
4. Describe each feature as "Implement the <X> feature".

Example input:
"Create a multi-channel forum api. Channel Model: { id, name }. Feature: create a channel, write messages in a channel, list messages in a channel"

Example output:
["Implement the create channel feature", "Implement the send message feature", "Implement the list messages feature"]

Output only the JSON array, nothing else."#;

pub const LOCALIZE_FEATURE_SYSTEM: &str = r#"You are a code analysis expert. Your task is to analyze a code structure and locate the code that implements a specific feature.

Answer with JSON in this format:
{
  "feature_description": "feature description",
  "implementation_location": [
    {
      "file": "file path",
      "function": "function or method name",
      "lines": "start-end",
      "reason": "why this code implements the feature"
    }
  ]
}

Output only the JSON, no other text."#;

pub const EXECUTION_PLAN_SYSTEM: &str = "You are a deployment expert. Based on the code structure, suggest how to run this project.\nAnswer with concise steps, at most 100 words.";

pub const RELEVANT_CODE_HEADING: &str = "\n\n### Relevant Code (by semantic search):\n";

#[must_use]
pub fn extract_features(problem: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(EXTRACT_FEATURES_SYSTEM),
        ChatMessage::user(format!("Requirement description:\n{problem}")),
    ]
}

#[must_use]
pub fn localize_feature(feature: &str, structure: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(LOCALIZE_FEATURE_SYSTEM),
        ChatMessage::user(format!(
            "Feature: {feature}\n\nCode structure:\n{structure}\n\nLocate the code that implements this feature."
        )),
    ]
}

#[must_use]
pub fn execution_plan(structure: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(EXECUTION_PLAN_SYSTEM),
        ChatMessage::user(format!("Code structure:\n{structure}")),
    ]
}
