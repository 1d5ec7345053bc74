//! Vulnerability alerts
//!
//! Findings accumulated by the engine's passive and active scanners.
//! The facade treats the alert set as opaque and append-only; the only
//! mutation it offers is an explicit clear. Deduplication by
//! (url, plugin id) is an engine guarantee and is not re-checked here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Risk level assigned by the engine's rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Risk {
    Informational,
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn name(&self) -> &'static str {
        match self {
            Risk::Informational => "Informational",
            Risk::Low => "Low",
            Risk::Medium => "Medium",
            Risk::High => "High",
        }
    }
}

/// Engine confidence in a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(rename = "False Positive")]
    FalsePositive,
    Low,
    Medium,
    High,
    Confirmed,
}

/// One finding reported by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// URL where the issue was observed
    pub url: String,

    /// Finding name (the engine emits this as "alert")
    #[serde(alias = "alert")]
    pub name: String,

    pub risk: Risk,

    pub confidence: Confidence,

    #[serde(default)]
    pub description: String,

    /// Identifier of the rule that raised the finding
    #[serde(default)]
    pub plugin_id: String,

    /// Affected parameter, when the rule pinpoints one
    #[serde(default)]
    pub param: String,

    #[serde(default)]
    pub evidence: String,

    #[serde(default)]
    pub solution: String,
}

impl Alert {
    pub fn new(name: &str, risk: Risk, url: &str) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
            risk,
            confidence: Confidence::Medium,
            description: String::new(),
            plugin_id: String::new(),
            param: String::new(),
            evidence: String::new(),
            solution: String::new(),
        }
    }

    pub fn with_plugin_id(mut self, plugin_id: &str) -> Self {
        self.plugin_id = plugin_id.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Group alerts by the host of their URL.
///
/// Alerts with unparseable URLs are skipped with a warning rather than
/// failing the whole grouping.
pub fn group_by_host(alerts: &[Alert]) -> HashMap<String, Vec<Alert>> {
    let mut by_host: HashMap<String, Vec<Alert>> = HashMap::new();

    for alert in alerts {
        match url::Url::parse(&alert.url).ok().and_then(|u| {
            u.host_str().map(|h| h.to_string())
        }) {
            Some(host) => by_host.entry(host).or_default().push(alert.clone()),
            None => {
                tracing::warn!(url = %alert.url, "Skipping alert with malformed URL");
            }
        }
    }

    by_host
}
