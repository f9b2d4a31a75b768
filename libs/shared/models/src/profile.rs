use serde::{Deserialize, Serialize};

/// Two-line postal address stored on doctor and patient profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}
