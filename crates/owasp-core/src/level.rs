use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// One vulnerability-teaching challenge. Levels 1-10 come from the static
/// catalog; level 11 is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: u32,
    pub title: String,
    /// One-sentence description. Its first word doubles as the class label.
    pub vulnerability: String,
    pub tool: String,
    pub description: String,
    /// Ground truth for validation and the text shown by "solution".
    pub expected_command: String,
    pub hint: String,
}

impl Level {
    /// Short classification label: the first whitespace-delimited token of
    /// `vulnerability`.
    pub fn vulnerability_class(&self) -> &str {
        self.vulnerability.split_whitespace().next().unwrap_or("")
    }

    /// Console prompt for this level's tool, e.g. `"sqlmap-lite> "`.
    pub fn console_prompt(&self) -> String {
        format!("{}> ", self.tool)
    }

    /// Every field non-empty and a single-line expected command.
    pub fn is_well_formed(&self) -> bool {
        self.id > 0
            && [
                &self.title,
                &self.vulnerability,
                &self.tool,
                &self.description,
                &self.expected_command,
                &self.hint,
            ]
            .iter()
            .all(|f| !f.trim().is_empty())
            && !self.expected_command.contains(['\n', '\r'])
    }
}
