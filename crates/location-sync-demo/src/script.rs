//! Scripted scenarios for the demo.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One scenario step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    /// The user navigates the router.
    Navigate { path: String },
    /// The store is rewound to a recorded location, as devtools replay would.
    Replay { location: String },
    /// Let the synchronizer run for a while.
    Pause { millis: u64 },
}

/// Load a JSON array of steps.
pub fn load(path: &Path) -> Result<Vec<Step>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse(&raw).with_context(|| format!("Invalid script {}", path.display()))
}

pub fn parse(raw: &str) -> Result<Vec<Step>> {
    Ok(serde_json::from_str(raw)?)
}

/// Scenario used when no script is given.
pub fn builtin() -> Vec<Step> {
    vec![
        Step::Navigate {
            path: "/docs".into(),
        },
        Step::Navigate {
            path: "/docs/install".into(),
        },
        Step::Replay {
            location: "/docs".into(),
        },
        Step::Navigate {
            path: "/settings".into(),
        },
        Step::Replay {
            location: "/".into(),
        },
    ]
}
