//! Scroll scripts: a timed sequence of feed operations.
//!
//! ```toml
//! [[items]]
//! id = "sermon"
//! kind = "video"
//! content = "Sunday sermon"
//!
//! [[steps]]
//! at_ms = 0
//! action = "register"
//! id = "sermon"
//!
//! [[steps]]
//! at_ms = 16
//! action = "report"
//! id = "sermon"
//! ratio = 0.8
//! top = 0.0
//! height = 420.0
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FlockError, Result};
use crate::feed::MediaKind;

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptItem {
    pub id: String,
    #[serde(default)]
    pub kind: MediaKind,
    pub content: Option<String>,
    pub media_url: Option<String>,
    /// Whether the item gets a playback capability (default: videos only)
    pub playable: Option<bool>,
}

impl ScriptItem {
    pub fn is_playable(&self) -> bool {
        self.playable.unwrap_or(self.kind == MediaKind::Video)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Register {
        id: String,
    },
    Unregister {
        id: String,
    },
    Report {
        id: String,
        ratio: f64,
        #[serde(default)]
        top: f64,
        #[serde(default)]
        height: f64,
    },
    Viewport {
        height: f64,
    },
    /// Extends the timeline without touching the engine.
    Wait,
}

impl Action {
    fn item_id(&self) -> Option<&str> {
        match self {
            Action::Register { id } | Action::Unregister { id } | Action::Report { id, .. } => {
                Some(id.as_str())
            }
            Action::Viewport { .. } | Action::Wait => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub items: Vec<ScriptItem>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut script: Script =
            toml::from_str(content).map_err(|e| FlockError::Script(e.to_string()))?;
        script.validate()?;
        // Stable sort keeps same-instant steps in file order.
        script.steps.sort_by_key(|step| step.at_ms);
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn item(&self, id: &str) -> Option<&ScriptItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Offset of the last step.
    pub fn duration_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.at_ms).max().unwrap_or(0)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(FlockError::Script(format!("duplicate item id '{}'", item.id)));
            }
        }

        for (idx, step) in self.steps.iter().enumerate() {
            if let Some(id) = step.action.item_id() {
                if !seen.contains(id) {
                    return Err(FlockError::Script(format!(
                        "step {} references unknown item '{}'",
                        idx + 1,
                        id
                    )));
                }
            }
        }
        Ok(())
    }
}
