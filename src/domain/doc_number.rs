// src/domain/doc_number.rs

/// Human-facing document numbers: `<PREFIX>-<year>-<seq>` zero-padded to
/// three digits, with the sequence restarting each calendar year.
pub fn document_number(prefix: &str, year: i32, sequence: u64) -> String {
    format!("{prefix}-{year}-{sequence:03}")
}

pub const QUOTATION_PREFIX: &str = "Q";
pub const ORDER_PREFIX: &str = "O";
pub const SHIPMENT_PREFIX: &str = "SHIP";
pub const CLEARANCE_PREFIX: &str = "CLR";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_three_digits() {
        assert_eq!(document_number(QUOTATION_PREFIX, 2026, 1), "Q-2026-001");
        assert_eq!(document_number(ORDER_PREFIX, 2026, 14), "O-2026-014");
        assert_eq!(document_number(SHIPMENT_PREFIX, 2024, 45), "SHIP-2024-045");
    }

    #[test]
    fn four_digit_sequences_keep_growing() {
        assert_eq!(document_number(CLEARANCE_PREFIX, 2026, 1234), "CLR-2026-1234");
    }
}
