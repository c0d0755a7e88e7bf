use rust_decimal::{Decimal, RoundingStrategy};

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
pub type Quantity = Decimal;

/// Notional value (quantity * price), denominated in the quote asset
pub type Notional = Decimal;

/// Exchange event time, milliseconds since the Unix epoch
pub type TimestampMs = i64;

/// Symbol identifier for a tradeable instrument
pub type Symbol = String;

/// Exact notional of `quantity` at `price`.
///
/// Returns `None` when the product does not fit in a `Decimal`; callers
/// treat that the same as an unparseable amount.
pub fn notional(quantity: Quantity, price: Price) -> Option<Notional> {
    quantity.checked_mul(price)
}

/// Render a monetary amount with a fixed number of decimal places.
///
/// Midpoints round away from zero, so `1.005` renders as `1.01`.
pub fn format_amount(value: Decimal, decimal_places: u32) -> String {
    let rounded =
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimal_places as usize, rounded)
}
