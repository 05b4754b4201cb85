use serde::{Deserialize, Serialize};

/// Where a feature is implemented
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationLocation {
    pub file: String,
    pub function: String,
    /// Range text such as `12-40`
    pub lines: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureAnalysis {
    pub feature_description: String,
    /// Empty when the feature could not be located
    pub implementation_location: Vec<ImplementationLocation>,
}

impl FeatureAnalysis {
    pub fn empty(feature: impl Into<String>) -> Self {
        Self {
            feature_description: feature.into(),
            implementation_location: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_located(&self) -> bool {
        !self.implementation_location.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// One entry per feature, in feature extraction order
    pub feature_analysis: Vec<FeatureAnalysis>,
    pub execution_plan_suggestion: String,
    /// Produced by an external verification step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional_verification: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_analysis_is_not_located() {
        let mut analysis = FeatureAnalysis::empty("list messages");
        assert!(!analysis.is_located());

        analysis.implementation_location.push(ImplementationLocation {
            file: "src/messages.py".to_string(),
            function: "list_messages".to_string(),
            lines: "1-2".to_string(),
            reason: None,
        });
        assert!(analysis.is_located());
    }

    #[test]
    fn test_report_json_shape() {
        let report = AnalysisReport {
            feature_analysis: vec![FeatureAnalysis {
                feature_description: "create channel".to_string(),
                implementation_location: vec![ImplementationLocation {
                    file: "src/channels.ts".to_string(),
                    function: "createChannel".to_string(),
                    lines: "10-24".to_string(),
                    reason: None,
                }],
            }],
            execution_plan_suggestion: "npm start".to_string(),
            functional_verification: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "feature_analysis": [{
                    "feature_description": "create channel",
                    "implementation_location": [{
                        "file": "src/channels.ts",
                        "function": "createChannel",
                        "lines": "10-24"
                    }]
                }],
                "execution_plan_suggestion": "npm start"
            })
        );
    }
}
