mod alert;
mod market_event;
mod side;
mod tier;

pub use alert::{Alert, AlertId};
pub use market_event::{EventKind, MarketEvent};
pub use side::{Side, UnknownSide};
pub use tier::ThresholdTier;
