use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use tracing::trace;

use crate::config::ClassifierConfig;

/// Amount with optional Chilean thousand separators: 990, 1990, 1.990, 12.350
const AMOUNT: &str = r"\d+(?:\.\d{3})*";

/// `$1.990`, `2 x $4.000`, `$2.750 c/u`, `Antes: $2.590`, `Lleva 2 por $3.000`
static CURRENCY_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?:regular|antes|ahora|ahorra|oferta|promo|precio|lleva\s+\d+\s+por)\s*:?\s*)?(?:\d+\s*x\s*)?\$\s*{AMOUNT}(?:\s*c/u)?$"
    ))
    .expect("currency symbol pattern")
});

/// `1190 c/u`, `2 x 1.890 c/u`
static PER_UNIT_WITHOUT_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?:\d+\s*x\s*)?{AMOUNT}\s*c/u$")).expect("per-unit pattern")
});

/// A sign and amount anywhere in a longer label, e.g. `Precio Club $1.590 hasta agotar stock`
static EMBEDDED_CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*\d").expect("embedded currency pattern"));

/// `1500 CLP`, `$990 pesos`, `CLP 1.500`
static CURRENCY_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:\$\s*{AMOUNT}|{AMOUNT})\s*(?:pesos?|clp)$|^(?:pesos?|clp)\s*\$?\s*{AMOUNT}$"
    ))
    .expect("currency word pattern")
});

static BARE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{AMOUNT}$")).expect("bare amount pattern"));

/// Which heuristic accepted a text as a price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRule {
    CurrencySymbol,
    CurrencyWord,
    BareNumber,
}

/// Decides whether a single on-screen text denotes a price.
///
/// Tuned for recall: anything that could be a price is accepted, and the
/// parser and grouper discard what turns out not to be one.
#[derive(Debug, Clone)]
pub struct PriceClassifier {
    bare_range: RangeInclusive<u64>,
}

impl PriceClassifier {
    pub fn new() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            bare_range: config.bare_price_min..=config.bare_price_max,
        }
    }

    pub fn looks_like_price(&self, text: &str) -> bool {
        self.classify(text).is_some()
    }

    pub fn classify(&self, text: &str) -> Option<PriceRule> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let rule = if CURRENCY_SYMBOL.is_match(text)
            || PER_UNIT_WITHOUT_SYMBOL.is_match(text)
            || EMBEDDED_CURRENCY.is_match(text)
        {
            Some(PriceRule::CurrencySymbol)
        } else if CURRENCY_WORD.is_match(text) {
            Some(PriceRule::CurrencyWord)
        } else if self.is_plausible_bare_price(text) {
            Some(PriceRule::BareNumber)
        } else {
            None
        };

        if let Some(rule) = rule {
            trace!("Price text {:?} matched {:?}", text, rule);
        }

        rule
    }

    fn is_plausible_bare_price(&self, text: &str) -> bool {
        if !BARE_AMOUNT.is_match(text) {
            return false;
        }

        text.replace('.', "")
            .parse::<u64>()
            .map(|value| self.bare_range.contains(&value))
            .unwrap_or(false)
    }
}

impl Default for PriceClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_price_texts() {
        let classifier = PriceClassifier::new();

        for text in ["$1.990", "2 x $1.890", "1190 c/u", "Ahorra $1.800", "1500 CLP", "1890"] {
            assert!(classifier.looks_like_price(text), "expected price: {:?}", text);
        }
    }

    #[test]
    fn test_negative_texts() {
        let classifier = PriceClassifier::new();

        for text in ["", "   ", "Coca Cola", "12", "abc123"] {
            assert!(!classifier.looks_like_price(text), "expected non-price: {:?}", text);
        }
    }

    #[test]
    fn test_rule_order() {
        let classifier = PriceClassifier::new();

        assert_eq!(classifier.classify("$2.750 c/u"), Some(PriceRule::CurrencySymbol));
        assert_eq!(classifier.classify("Antes: $2.590"), Some(PriceRule::CurrencySymbol));
        assert_eq!(classifier.classify("Lleva 2 por $3.000"), Some(PriceRule::CurrencySymbol));
        assert_eq!(classifier.classify("$990 pesos"), Some(PriceRule::CurrencySymbol));
        assert_eq!(classifier.classify("990 pesos"), Some(PriceRule::CurrencyWord));
        assert_eq!(classifier.classify("clp 1.500"), Some(PriceRule::CurrencyWord));
        assert_eq!(classifier.classify("12.350"), Some(PriceRule::BareNumber));
    }

    #[test]
    fn test_bare_number_range() {
        let classifier = PriceClassifier::new();

        assert!(!classifier.looks_like_price("99"));
        assert!(classifier.looks_like_price("100"));
        assert!(!classifier.looks_like_price("7801234567890"));

        let narrow = PriceClassifier::from_config(&ClassifierConfig {
            bare_price_min: 500,
            bare_price_max: 5_000,
        });
        assert!(!narrow.looks_like_price("450"));
        assert!(narrow.looks_like_price("4.990"));
        assert!(!narrow.looks_like_price("5.001"));
    }
}
