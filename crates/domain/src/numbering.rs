//! Sequential document numbers
//!
//! Every quote, service order, contract and invoice carries a human-readable
//! number of the form `<prefix><year><seq>` where `seq` is a zero-padded
//! four-digit counter that restarts each calendar year (`ORC20260001`,
//! `OS20260012`, ...). The store looks up the highest existing number for the
//! series and year and the next number is derived from it here.

use crate::errors::{OficinaError, Result};

/// Width of the zero-padded sequence suffix.
pub const SEQUENCE_WIDTH: usize = 4;

/// Document families that receive sequential numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSeries {
    Quote,
    ServiceOrder,
    Contract,
    Invoice,
}

impl DocumentSeries {
    /// Number prefix for this series.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Quote => "ORC",
            Self::ServiceOrder => "OS",
            Self::Contract => "CT",
            Self::Invoice => "NF",
        }
    }

    /// SQL `LIKE` pattern selecting every number of this series in `year`.
    pub fn like_pattern(self, year: i32) -> String {
        format!("{}{year}%", self.prefix())
    }

    /// Formats the number for `year` and sequence `seq`.
    pub fn format(self, year: i32, seq: u32) -> String {
        format!("{}{year}{seq:04}", self.prefix())
    }

    /// Extracts the trailing sequence from an existing number of this series.
    pub fn parse_sequence(self, number: &str) -> Result<u32> {
        let malformed = || OficinaError::Internal(format!("malformed document number: {number}"));
        let suffix = number
            .len()
            .checked_sub(SEQUENCE_WIDTH)
            .and_then(|start| number.get(start..))
            .ok_or_else(malformed)?;
        suffix.parse::<u32>().map_err(|_| malformed())
    }

    /// Sequence to assign next, given the highest existing number (if any).
    pub fn next_sequence(self, last: Option<&str>) -> Result<u32> {
        match last {
            Some(number) => Ok(self.parse_sequence(number)? + 1),
            None => Ok(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_match_series() {
        assert_eq!(DocumentSeries::Quote.prefix(), "ORC");
        assert_eq!(DocumentSeries::ServiceOrder.prefix(), "OS");
        assert_eq!(DocumentSeries::Contract.prefix(), "CT");
        assert_eq!(DocumentSeries::Invoice.prefix(), "NF");
    }

    #[test]
    fn format_pads_sequence_to_four_digits() {
        assert_eq!(DocumentSeries::Quote.format(2026, 1), "ORC20260001");
        assert_eq!(DocumentSeries::ServiceOrder.format(2026, 123), "OS20260123");
        assert_eq!(DocumentSeries::Invoice.format(2024, 9999), "NF20249999");
    }

    #[test]
    fn parse_sequence_reads_trailing_digits() {
        assert_eq!(DocumentSeries::Quote.parse_sequence("ORC20260001").unwrap(), 1);
        assert_eq!(DocumentSeries::Contract.parse_sequence("CT20261042").unwrap(), 1042);
    }

    #[test]
    fn parse_sequence_rejects_garbage() {
        assert!(DocumentSeries::Quote.parse_sequence("ORC").is_err());
        assert!(DocumentSeries::Quote.parse_sequence("ORC2026abcd").is_err());
    }

    #[test]
    fn next_sequence_starts_at_one() {
        assert_eq!(DocumentSeries::Quote.next_sequence(None).unwrap(), 1);
    }

    #[test]
    fn next_sequence_is_dense() {
        let series = DocumentSeries::ServiceOrder;
        let mut last: Option<String> = None;
        for expected in 1..=5 {
            let seq = series.next_sequence(last.as_deref()).unwrap();
            assert_eq!(seq, expected);
            last = Some(series.format(2026, seq));
        }
        assert_eq!(last.as_deref(), Some("OS20260005"));
    }

    #[test]
    fn like_pattern_scopes_by_year() {
        assert_eq!(DocumentSeries::Invoice.like_pattern(2026), "NF2026%");
    }
}
