use liqwatch_core::MarketEvent;
use serde_json::Value;

use crate::error::{NormalizeError, NormalizeResult};

/// Port for turning raw exchange frames into canonical events
///
/// Implementations are exchange specific (wire field names, envelopes).
/// They must tolerate unknown extra fields and never panic on bad input.
pub trait EventNormalizer: Send + Sync {
    /// Normalize an already-decoded JSON frame
    fn normalize(&self, frame: &Value) -> NormalizeResult<MarketEvent>;

    /// Decode and normalize a text frame. Invalid JSON is malformed.
    fn normalize_text(&self, text: &str) -> NormalizeResult<MarketEvent> {
        let frame: Value = serde_json::from_str(text)
            .map_err(|e| NormalizeError::malformed("frame", e.to_string()))?;
        self.normalize(&frame)
    }

    /// Name of the exchange/wire format for logging
    fn name(&self) -> &str {
        "EventNormalizer"
    }
}
