//! liqwatch Gateway
//!
//! Gateway layer for the liqwatch monitor. Provides:
//! - Binance USDⓈ-M futures normalization (`forceOrder`, `aggTrade`)
//! - Wire message type for alerts handed to delivery collaborators
//! - Transport abstraction (tokio channels, with traits for future transports)
//!
//! ## Architecture
//!
//! ```text
//! Binance websocket frames
//!         │
//!    ┌────▼──────────┐
//!    │  Normalizer   │  forceOrder / aggTrade → MarketEvent
//!    └────┬──────────┘
//!         │
//!    ┌────▼──────────┐
//!    │ liqwatch      │
//!    │ engine        │
//!    └────┬──────────┘
//!         │ Alert
//!    ┌────▼──────────┐
//!    │ Alert Gateway │  Alert → AlertMessage
//!    └────┬──────────┘
//!         │ Channels: alerts.{instrument}
//!    ┌────▼──────────┐
//!    │ Dashboard /   │
//!    │ log consumers │
//!    └───────────────┘
//! ```

pub mod adapters;
pub mod error;
pub mod messages;
pub mod transport;

// Re-export commonly used types
pub use adapters::{AlertGateway, BinanceNormalizer};
pub use error::{GatewayError, TransportError};
pub use messages::AlertMessage;
pub use transport::{
    Publisher, Subjects, Subscriber,
    channel::{ChannelPublisher, ChannelSubscriber},
};
