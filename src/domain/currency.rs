//! Currency conversion and price formatting
//!
//! All catalog prices are whole USD units. Conversion applies a static
//! rate table fixed at compile time; there is no refresh from a live
//! source. Rounding is to the nearest whole unit, never truncation.

use serde::{Deserialize, Serialize};

/// Whole-unit price amount. Prices carry no sub-unit precision.
pub type Amount = u64;

/// Supported display currencies. USD is the canonical base currency;
/// every stored price is USD-denominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Gbp,
    Cad,
    Aud,
    Eur,
}

struct CurrencyInfo {
    code: &'static str,
    symbol: &'static str,
    /// USD amount x rate = converted amount. USD is exactly 1.
    rate: f64,
    label: &'static str,
}

// Indexed by the enum discriminant - keep the order in sync with Currency.
const CURRENCIES: [CurrencyInfo; 5] = [
    CurrencyInfo { code: "USD", symbol: "$", rate: 1.0, label: "US Dollar" },
    CurrencyInfo { code: "GBP", symbol: "£", rate: 0.79, label: "British Pound" },
    CurrencyInfo { code: "CAD", symbol: "C$", rate: 1.36, label: "Canadian Dollar" },
    CurrencyInfo { code: "AUD", symbol: "A$", rate: 1.52, label: "Australian Dollar" },
    CurrencyInfo { code: "EUR", symbol: "€", rate: 0.92, label: "Euro" },
];

impl Currency {
    pub const ALL: [Currency; 5] =
        [Currency::Usd, Currency::Gbp, Currency::Cad, Currency::Aud, Currency::Eur];

    /// Parse an ISO-style code, case-insensitive. Unknown codes do not parse.
    pub fn from_code(code: &str) -> Option<Currency> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "GBP" => Some(Currency::Gbp),
            "CAD" => Some(Currency::Cad),
            "AUD" => Some(Currency::Aud),
            "EUR" => Some(Currency::Eur),
            _ => None,
        }
    }

    #[inline]
    fn info(&self) -> &'static CurrencyInfo {
        &CURRENCIES[*self as usize]
    }

    pub fn code(&self) -> &'static str {
        self.info().code
    }

    pub fn symbol(&self) -> &'static str {
        self.info().symbol
    }

    pub fn rate(&self) -> f64 {
        self.info().rate
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Convert a USD amount into the target currency, rounded to the nearest
/// whole unit (half away from zero).
///
/// USD bypasses the float path entirely so the identity `convert(x, Usd) == x`
/// holds for every representable amount.
pub fn convert(amount_usd: Amount, currency: Currency) -> Amount {
    match currency {
        Currency::Usd => amount_usd,
        _ => (amount_usd as f64 * currency.rate()).round() as Amount,
    }
}

/// Format a USD amount for display in the target currency:
/// `<symbol><converted amount with thousands separators>`, no space.
pub fn format(amount_usd: Amount, currency: Currency) -> String {
    std::format!("{}{}", currency.symbol(), with_thousands(convert(amount_usd, currency)))
}

/// Display symbol for a raw currency code. The currency set is closed,
/// but an unrecognized code must not fail - it falls back to "$".
pub fn symbol_for(code: &str) -> &'static str {
    Currency::from_code(code).map(|c| c.symbol()).unwrap_or("$")
}

/// Group digits with commas: 1000 -> "1,000".
fn with_thousands(n: Amount) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_converts_to_zero_in_every_currency() {
        for currency in Currency::ALL {
            assert_eq!(convert(0, currency), 0);
        }
    }

    #[test]
    fn test_usd_identity() {
        for amount in [0, 1, 999, 1000, 123_456, u64::MAX] {
            assert_eq!(convert(amount, Currency::Usd), amount);
        }
    }

    #[test]
    fn test_convert_rounds_to_nearest() {
        // 1 * 0.79 = 0.79 -> 1, not 0
        assert_eq!(convert(1, Currency::Gbp), 1);
        assert_eq!(convert(1000, Currency::Gbp), 790);
        assert_eq!(convert(1000, Currency::Cad), 1360);
        assert_eq!(convert(1000, Currency::Aud), 1520);
        assert_eq!(convert(1000, Currency::Eur), 920);
    }

    #[test]
    fn test_format_thousands_separators() {
        assert_eq!(format(1000, Currency::Usd), "$1,000");
        assert_eq!(format(10000, Currency::Usd), "$10,000");
        assert_eq!(format(999, Currency::Usd), "$999");
        assert_eq!(format(1_234_567, Currency::Usd), "$1,234,567");
    }

    #[test]
    fn test_format_converted() {
        assert_eq!(format(1000, Currency::Gbp), "£790");
        assert_eq!(format(1000, Currency::Cad), "C$1,360");
    }

    #[test]
    fn test_symbol_fallback_for_unknown_code() {
        assert_eq!(symbol_for("XYZ"), "$");
        assert_eq!(symbol_for(""), "$");
        assert_eq!(symbol_for("GBP"), "£");
        assert_eq!(symbol_for("gbp"), "£");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::Usd));
        assert_eq!(Currency::from_code("EUR"), Some(Currency::Eur));
        assert_eq!(Currency::from_code("JPY"), None);
    }

    #[test]
    fn test_usd_rate_is_exactly_one() {
        assert_eq!(Currency::Usd.rate(), 1.0);
    }

    #[test]
    fn test_serde_codes() {
        let json = serde_json::to_string(&Currency::Gbp).unwrap();
        assert_eq!(json, "\"GBP\"");
        let parsed: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(parsed, Currency::Eur);
    }
}
