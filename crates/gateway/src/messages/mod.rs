//! Wire message types for gateway communication
//!
//! These represent the normalized, display-ready format handed to the
//! delivery side (dashboard sockets, log consumers).

pub mod alert;

pub use alert::AlertMessage;
