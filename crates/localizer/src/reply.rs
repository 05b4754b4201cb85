use crate::report::ImplementationLocation;
use serde::{Deserialize, Deserializer};

/// Remove a surrounding ```` ```json ```` / ```` ``` ```` fence from a reply.
///
/// Text before the first fence is dropped as well.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if !text.starts_with("```") {
        if let Some(start) = text.find("```") {
            text = &text[start..];
        }
    }
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Feature extraction reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureListReply {
    Parsed(Vec<String>),
    /// Reply was not a JSON string array
    Fallback(String),
}

impl FeatureListReply {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(strip_fences(raw)) {
            Ok(features) => Self::Parsed(
                features
                    .into_iter()
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect(),
            ),
            Err(_) => Self::Fallback(raw.to_string()),
        }
    }

    /// Feature list to localize; never empty
    pub fn into_features(self, problem: &str) -> Vec<String> {
        match self {
            Self::Parsed(features) if !features.is_empty() => features,
            _ => vec![problem.to_string()],
        }
    }
}

/// Localization reply for one feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalizationReply {
    Ok(Vec<ImplementationLocation>),
    ParseFailed(String),
}

#[derive(Deserialize)]
struct LocalizationBody {
    #[serde(default)]
    implementation_location: Vec<RawLocation>,
}

#[derive(Deserialize)]
struct RawLocation {
    #[serde(default)]
    file: String,
    #[serde(default)]
    function: String,
    #[serde(default, deserialize_with = "lines_text")]
    lines: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinesField {
    Text(String),
    Number(u64),
}

fn lines_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LinesField>::deserialize(deserializer)? {
        Some(LinesField::Text(text)) => text,
        Some(LinesField::Number(line)) => line.to_string(),
        None => String::new(),
    })
}

impl From<RawLocation> for ImplementationLocation {
    fn from(raw: RawLocation) -> Self {
        Self {
            file: raw.file,
            function: raw.function,
            lines: raw.lines,
            reason: raw.reason.filter(|r| !r.trim().is_empty()),
        }
    }
}

impl LocalizationReply {
    /// Accepts the documented object or a bare location array
    pub fn parse(raw: &str) -> Self {
        let text = strip_fences(raw);
        let locations = serde_json::from_str::<LocalizationBody>(text)
            .map(|body| body.implementation_location)
            .or_else(|_| serde_json::from_str::<Vec<RawLocation>>(text));

        match locations {
            Ok(locations) => Self::Ok(
                locations
                    .into_iter()
                    .map(ImplementationLocation::from)
                    .collect(),
            ),
            Err(_) => Self::ParseFailed(raw.to_string()),
        }
    }

    pub fn into_locations(self) -> Vec<ImplementationLocation> {
        match self {
            Self::Ok(locations) => locations,
            Self::ParseFailed(_) => Vec::new(),
        }
    }
}
