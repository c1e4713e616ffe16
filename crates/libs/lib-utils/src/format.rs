//! # Display Formatting
//!
//! Helpers for rendering addresses and token amounts in human-readable form.

/// Shorten a base58 address for display: first four and last four characters.
///
/// Addresses of eight characters or fewer are returned unchanged.
pub fn short_address(address: &str) -> String {
    if address.len() <= 8 {
        return address.to_string();
    }
    format!("{}...{}", &address[..4], &address[address.len() - 4..])
}

/// Format a UI token amount with the mint's full decimal precision.
pub fn format_token_amount(ui_amount: f64, decimals: u8) -> String {
    format!("{:.*}", decimals as usize, ui_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            "EPjF...Dt1v"
        );
        assert_eq!(short_address("short"), "short");
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_token_amount(1.5, 2), "1.50");
        assert_eq!(format_token_amount(0.000000001, 9), "0.000000001");
        assert_eq!(format_token_amount(42.0, 0), "42");
    }
}
