//! Sequential transaction identifier generation.
//!
//! Identifiers are `TX` followed by a zero-padded 4-digit sequence number
//! (`TX0001`, `TX0002`, ...). The next number is the maximum numeric suffix
//! found among existing `TX<digits>` identifiers plus one; identifiers that do
//! not match the pattern are ignored. Past 9999 the padding degrades to the
//! natural width of the number.
//!
//! Computing the next number from a scan is only safe when it happens in the
//! same database transaction as the insert; the insert path retries with the
//! next candidate on a unique-key conflict (see `ops::transactions`).

/// Formats a sequence number as a transaction identifier.
#[must_use]
pub(crate) fn format_id(sequence: u64) -> String {
    format!("TX{sequence:04}")
}

/// Computes the next sequence number from the existing identifiers.
pub(crate) fn next_sequence<'a>(ids: impl Iterator<Item = &'a str>) -> u64 {
    ids.filter_map(|id| id.strip_prefix("TX"))
        .filter(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_starts_at_one() {
        assert_eq!(next_sequence([].into_iter()), 1);
        assert_eq!(format_id(1), "TX0001");
    }

    #[test]
    fn increments_past_the_maximum() {
        let ids = ["TX0001", "TX0007", "TX0003"];
        assert_eq!(next_sequence(ids.iter().copied()), 8);
        assert_eq!(format_id(8), "TX0008");
    }

    #[test]
    fn ignores_foreign_identifiers() {
        let ids = ["TX0002", "INV-9", "TXabc", "TX"];
        assert_eq!(next_sequence(ids.iter().copied()), 3);
    }

    #[test]
    fn padding_degrades_past_9999() {
        assert_eq!(format_id(9999), "TX9999");
        assert_eq!(format_id(10000), "TX10000");
        assert_eq!(next_sequence(["TX10000"].into_iter()), 10001);
    }
}
