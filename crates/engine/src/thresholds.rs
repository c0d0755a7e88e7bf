//! Threshold Table
//!
//! Named notional tiers evaluated strictly from the highest minimum down.
//! The first tier the value meets is the only one reported, so every event
//! maps to exactly one tier or to none.

use std::collections::HashSet;

use liqwatch_core::{Notional, ThresholdTier};

use crate::error::{ConfigError, Result};

/// Immutable, validated set of tiers, stored highest minimum first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdTable {
    tiers: Vec<ThresholdTier>,
}

impl ThresholdTable {
    /// Validate and build a table.
    ///
    /// `tiers` must be strictly ascending or strictly descending by minimum
    /// notional, with unique non-empty names and no negative minimums.
    pub fn new(tiers: Vec<ThresholdTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(ConfigError::EmptyTiers);
        }

        let mut names = HashSet::with_capacity(tiers.len());
        for tier in &tiers {
            if tier.name.trim().is_empty() {
                return Err(ConfigError::EmptyTierName);
            }
            if !names.insert(tier.name.as_str()) {
                return Err(ConfigError::DuplicateTierName(tier.name.clone()));
            }
            if tier.min_notional.is_sign_negative() && !tier.min_notional.is_zero() {
                return Err(ConfigError::NegativeThreshold {
                    name: tier.name.clone(),
                    min_notional: tier.min_notional,
                });
            }
        }

        let mut sorted = tiers.clone();
        sorted.sort_by(|a, b| b.min_notional.cmp(&a.min_notional));
        if let Some(pair) = sorted
            .windows(2)
            .find(|w| w[0].min_notional == w[1].min_notional)
        {
            return Err(ConfigError::DuplicateThreshold {
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
                min_notional: pair[0].min_notional,
            });
        }

        // No equal neighbours remain, so the given order is either the
        // sorted order, its reverse, or broken somewhere.
        let ascending = tiers
            .windows(2)
            .all(|w| w[0].min_notional < w[1].min_notional);
        let descending = tiers
            .windows(2)
            .all(|w| w[0].min_notional > w[1].min_notional);
        if !ascending && !descending {
            let offender = first_order_break(&tiers);
            return Err(ConfigError::NonMonotonic {
                name: offender.name.clone(),
                min_notional: offender.min_notional,
            });
        }

        Ok(Self { tiers: sorted })
    }

    /// Highest tier whose minimum the value meets or exceeds
    pub fn classify(&self, value: Notional) -> Option<&ThresholdTier> {
        self.tiers.iter().find(|tier| tier.is_met_by(value))
    }

    /// Minimum notional an event needs to be kept for future lookbacks
    pub fn retention_threshold(&self) -> Notional {
        self.lowest().min_notional
    }

    /// Whether an event of this value should enter the window store
    pub fn should_retain(&self, value: Notional) -> bool {
        value >= self.retention_threshold()
    }

    pub fn lowest(&self) -> &ThresholdTier {
        // Non-empty by construction
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn highest(&self) -> &ThresholdTier {
        &self.tiers[0]
    }

    /// Tiers, highest minimum first
    pub fn tiers(&self) -> &[ThresholdTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// The tier where the order established by the first pair stops holding
fn first_order_break(tiers: &[ThresholdTier]) -> &ThresholdTier {
    let rising = tiers[0].min_notional < tiers[1].min_notional;
    tiers
        .windows(2)
        .find(|w| (w[0].min_notional < w[1].min_notional) != rising)
        .map(|w| &w[1])
        .unwrap_or(&tiers[tiers.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tier(name: &str, min: Notional) -> ThresholdTier {
        ThresholdTier::new(name, min)
    }

    fn table() -> ThresholdTable {
        ThresholdTable::new(vec![
            tier("10k", dec!(10000)),
            tier("50k", dec!(50000)),
            tier("100k", dec!(100000)),
        ])
        .unwrap()
    }

    #[test]
    fn test_stored_highest_first() {
        let names: Vec<_> = table().tiers().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["100k", "50k", "10k"]);
    }

    #[test]
    fn test_classify_picks_single_highest_tier() {
        let table = table();
        assert_eq!(table.classify(dec!(9999.99)), None);
        assert_eq!(table.classify(dec!(10000)).unwrap().name, "10k");
        assert_eq!(table.classify(dec!(49999.99)).unwrap().name, "10k");
        assert_eq!(table.classify(dec!(50000)).unwrap().name, "50k");
        assert_eq!(table.classify(dec!(60000)).unwrap().name, "50k");
        assert_eq!(table.classify(dec!(100000)).unwrap().name, "100k");
        assert_eq!(table.classify(dec!(5000000)).unwrap().name, "100k");
    }

    #[test]
    fn test_classify_matches_brute_force() {
        let table = table();
        let values = [
            dec!(0),
            dec!(1),
            dec!(9999.999999),
            dec!(10000),
            dec!(10000.0000001),
            dec!(49999),
            dec!(50000),
            dec!(99999.99),
            dec!(100000),
            dec!(1000000000),
        ];

        for v in values {
            let expected = table
                .tiers()
                .iter()
                .filter(|t| t.min_notional <= v)
                .max_by(|a, b| a.min_notional.cmp(&b.min_notional));
            assert_eq!(table.classify(v), expected, "value {}", v);
        }
    }

    #[test]
    fn test_descending_input_accepted() {
        let table = ThresholdTable::new(vec![tier("50k", dec!(50000)), tier("10k", dec!(10000))])
            .unwrap();
        assert_eq!(table.highest().name, "50k");
        assert_eq!(table.retention_threshold(), dec!(10000));
    }

    #[test]
    fn test_retention_threshold_is_lowest_tier() {
        let table = table();
        assert_eq!(table.retention_threshold(), dec!(10000));
        assert!(table.should_retain(dec!(10000)));
        assert!(!table.should_retain(dec!(9000)));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(ThresholdTable::new(vec![]), Err(ConfigError::EmptyTiers));
    }

    #[test]
    fn test_rejects_equal_thresholds_with_distinct_names() {
        let err = ThresholdTable::new(vec![tier("a", dec!(10000)), tier("b", dec!(10000.00))])
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateThreshold { .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = ThresholdTable::new(vec![tier("big", dec!(1)), tier("big", dec!(2))]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateTierName("big".to_string()));
    }

    #[test]
    fn test_rejects_non_monotonic() {
        let err = ThresholdTable::new(vec![
            tier("10k", dec!(10000)),
            tier("100k", dec!(100000)),
            tier("50k", dec!(50000)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonMonotonic {
                name: "50k".to_string(),
                min_notional: dec!(50000),
            }
        );
    }

    #[test]
    fn test_rejects_negative_and_blank() {
        assert!(matches!(
            ThresholdTable::new(vec![tier("neg", dec!(-1))]),
            Err(ConfigError::NegativeThreshold { .. })
        ));
        assert_eq!(
            ThresholdTable::new(vec![tier("  ", dec!(1))]),
            Err(ConfigError::EmptyTierName)
        );
    }
}
