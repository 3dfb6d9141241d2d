use serde::{Deserialize, Serialize};

use crate::core::Severity;

/// Narrows a check down to part of the audited object, e.g. type `Container`
/// with value `nginx`, or type `JSONPath` with an expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckScope {
    #[serde(rename = "type")]
    pub scope_type: String,
    pub value: String,
}

impl CheckScope {
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            scope_type: "Container".to_string(),
            value: name.into(),
        }
    }
}

/// Result of a single audit step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    #[serde(rename = "checkID")]
    pub id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    pub success: bool,
    pub severity: Severity,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<CheckScope>,
}

impl Check {
    pub fn new(id: impl Into<String>, severity: Severity, success: bool) -> Self {
        Self {
            id: id.into(),
            severity,
            success,
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    pub fn with_scope(mut self, scope: CheckScope) -> Self {
        self.scope = Some(scope);
        self
    }
}
