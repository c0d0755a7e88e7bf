use serde::{Deserialize, Serialize};

use crate::values::Notional;

/// A named minimum-notional threshold (e.g. "50k" at 50 000)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThresholdTier {
    pub name: String,
    pub min_notional: Notional,
}

impl ThresholdTier {
    pub fn new(name: impl Into<String>, min_notional: Notional) -> Self {
        Self {
            name: name.into(),
            min_notional,
        }
    }

    /// Whether `value` meets or exceeds this tier
    pub fn is_met_by(&self, value: Notional) -> bool {
        value >= self.min_notional
    }
}
