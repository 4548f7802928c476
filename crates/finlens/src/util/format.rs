//! Number formatting for text reports

/// Group the integer part in thousands: 1234567 -> "1,234,567"
fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format an amount with thousands separators and two decimals
pub fn format_amount(value: f64) -> String {
    let cents_total = (value.abs() * 100.0).round() as u64;
    let whole = cents_total / 100;
    let cents = cents_total % 100;
    let sign = if value < 0.0 && cents_total > 0 { "-" } else { "" };
    format!("{sign}{}.{cents:02}", group_thousands(whole))
}

/// Format an amount without decimals (for tables)
pub fn format_amount_short(value: f64) -> String {
    let whole = value.abs().round() as u64;
    let sign = if value < 0.0 && whole > 0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(whole))
}

/// Format a value that is already expressed in percent
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Format an amount in compact form (e.g., 2.1M, 450K, 50)
pub fn format_compact(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{sign}{:.1}M", abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{sign}{:.0}K", abs_value / 1_000.0)
    } else {
        format!("{sign}{abs_value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-950.5), "-950.50");
        assert_eq!(format_amount(999.999), "1,000.00");
    }

    #[test]
    fn test_format_amount_short() {
        assert_eq!(format_amount_short(183353.02), "183,353");
        assert_eq!(format_amount_short(-420000.0), "-420,000");
    }

    #[test]
    fn test_format_percent_and_compact() {
        assert_eq!(format_percent(44.117647), "44.12%");
        assert_eq!(format_compact(2_100_000.0), "2.1M");
        assert_eq!(format_compact(-450_000.0), "-450K");
        assert_eq!(format_compact(50.0), "50");
    }
}
