// 💰 Money Codec
// pt-BR monetary strings: "." groups thousands, "," separates decimals.
// Parsing is deliberately lenient: the upstream dataset is assumed
// well-formed, so anything unparseable degrades to zero instead of
// aborting a whole-dataset load over one bad cell.

use num_format::{Locale, ToFormattedString};

/// Parse a pt-BR formatted monetary string into a float.
///
/// Accepts raw values ("1.234,56"), display values ("R$ 1.234,56") and
/// negatives. Empty or malformed input parses to 0.0 — this is a
/// documented lenient-parse contract, not silent data loss.
pub fn parse_money(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    // Keep digits, separators and sign; drops "R$" and stray spaces
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    // "1.234,56" -> "1234.56"
    let normalized = cleaned.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Format a float as a pt-BR currency string: `R$ 1.234,56`.
///
/// Values are rounded to two decimal places. `format_money(0.0)` yields
/// the zero-currency string `R$ 0,00`. Inverse of [`parse_money`] for
/// every value representable with two fraction digits.
pub fn format_money(value: f64) -> String {
    // Round in cents to avoid drifting on the fraction digits
    let cents = (value.abs() * 100.0).round() as i64;
    let integer = cents / 100;
    let fraction = cents % 100;

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    let grouped = integer.to_formatted_string(&Locale::pt);

    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

// ============================================================================
// TESTS
// ============================================================================
