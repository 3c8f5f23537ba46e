//! Simulated water condition of a grid cell.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition class driving the band value ranges of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "polluted")]
    Polluted,
    #[serde(rename = "clean_water")]
    Clean,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Polluted => "polluted",
            Label::Clean => "clean_water",
        }
    }

    pub fn is_polluted(&self) -> bool {
        matches!(self, Label::Polluted)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
