//! Taxation domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// Category of a valuation change. Taxation depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaKind {
    Goal,
    Good,
    Bad,
    Addiction,
    Buy,
    Decay,
}

impl DeltaKind {
    pub const ALL: [DeltaKind; 6] = [
        DeltaKind::Goal,
        DeltaKind::Good,
        DeltaKind::Bad,
        DeltaKind::Addiction,
        DeltaKind::Buy,
        DeltaKind::Decay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaKind::Goal => "goal",
            DeltaKind::Good => "good",
            DeltaKind::Bad => "bad",
            DeltaKind::Addiction => "addiction",
            DeltaKind::Buy => "buy",
            DeltaKind::Decay => "decay",
        }
    }
}

impl fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeltaKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeltaKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownDeltaKind(s.to_string()))
    }
}

/// Result of running a proposed delta through the tax rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxOutcome {
    pub effective_delta: i64,
    pub was_taxed: bool,
}
