//! Price text normalization

use unicode_general_category::{get_general_category, GeneralCategory};

use super::SENTINEL;

/// Decimal digit in any script (general category Nd)
fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || matches!(get_general_category(c), GeneralCategory::DecimalNumber)
}

/// Strip everything except decimal digits, `.` and `,` from a price.
///
/// Grouping and decimal separators are kept as the site wrote them; the
/// result is not parsed into a number. Returns the sentinel when no digit
/// or separator survives.
pub fn normalize_price(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| is_decimal_digit(*c) || *c == '.' || *c == ',')
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        SENTINEL.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_symbols_removed() {
        assert_eq!(normalize_price("£51.77"), "51.77");
        assert_eq!(normalize_price("$1,234.56"), "1,234.56");
        assert_eq!(normalize_price("12,99 €"), "12,99");
        assert_eq!(normalize_price("  USD 7 "), "7");
    }

    #[test]
    fn test_unit_text_is_discarded() {
        // lossy: the per-kg unit disappears along with the symbol
        assert_eq!(normalize_price("€1.50/kg"), "1.50");
    }

    #[test]
    fn test_no_digits_yields_sentinel() {
        assert_eq!(normalize_price("Free"), "N/A");
        assert_eq!(normalize_price(""), "N/A");
        assert_eq!(normalize_price("   "), "N/A");
    }

    #[test]
    fn test_non_ascii_digits_kept() {
        assert_eq!(normalize_price("￥５１.７７"), "５１.７７");
        assert_eq!(normalize_price("٥١.٧٧ ر.س"), "٥١.٧٧.");
        assert_eq!(normalize_price("₹ ४९९"), "४९९");
    }

    #[test]
    fn test_other_numeric_chars_dropped() {
        // numeric but not decimal digits
        assert_eq!(normalize_price("½"), "N/A");
        assert_eq!(normalize_price("Ⅻ 3"), "3");
        assert_eq!(normalize_price("²5"), "5");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["£51.77", "$1,234.56", "Free", "", "1.2.3", "N/A", "￥５１.７７"] {
            let once = normalize_price(raw);
            assert_eq!(normalize_price(&once), once, "input {:?}", raw);
        }
    }
}
