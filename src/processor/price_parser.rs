use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::ParsedPrice;

/// Digits with any periods between them; every period is dropped when parsing
const AMOUNT: &str = r"\d+(?:\.\d+)*";

/// `2 x $4.000`: the amount is the total for all units
static PROMOTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(\d+)\s*x\s*\$\s*({AMOUNT})")).expect("promotion pattern")
});

/// `$2.750 c/u`, also seen without the sign
static PER_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:\$\s*)?({AMOUNT})\s*c/u")).expect("per-unit pattern")
});

static PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\$\s*({AMOUNT})")).expect("plain pattern"));

/// `1500 CLP`, `990 pesos`, `CLP 1.500`
static CURRENCY_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)({AMOUNT})\s*(?:pesos?|clp)\b|\b(?:pesos?|clp)\s*({AMOUNT})"
    ))
    .expect("currency word pattern")
});

static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({AMOUNT})$")).expect("bare pattern"));

/// Parses Chilean peso price texts.
///
/// Periods are always thousand separators; pesos have no decimal subunit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChileanPriceParser;

impl ChileanPriceParser {
    /// Never fails: unparseable text yields `ParsedPrice::zero()`
    pub fn parse(&self, text: &str) -> ParsedPrice {
        let text = text.trim();
        if text.is_empty() {
            return ParsedPrice::zero();
        }

        if let Some(parsed) = self.parse_promotion(text) {
            debug!(
                "Promotion {:?}: {} units for ${} (${} each)",
                text, parsed.quantity, parsed.total_price, parsed.unit_price
            );
            return parsed;
        }

        let single = [&*PER_UNIT, &*PLAIN, &*CURRENCY_WORD, &*BARE]
            .into_iter()
            .find_map(|pattern| self.first_amount(pattern, text));

        match single {
            Some(amount) => ParsedPrice::single(amount),
            None => {
                debug!("No price found in {:?}", text);
                ParsedPrice::zero()
            }
        }
    }

    fn parse_promotion(&self, text: &str) -> Option<ParsedPrice> {
        let captures = PROMOTION.captures(text)?;
        let quantity = captures.get(1)?.as_str().parse::<u32>().ok()?;
        if quantity == 0 {
            return None;
        }

        let total = parse_amount(captures.get(2)?.as_str())?;
        Some(ParsedPrice::promotion(quantity, total))
    }

    /// First captured amount of `pattern`, from whichever group participated
    fn first_amount(&self, pattern: &Regex, text: &str) -> Option<f64> {
        let captures = pattern.captures(text)?;
        captures
            .iter()
            .skip(1)
            .flatten()
            .next()
            .and_then(|m| parse_amount(m.as_str()))
    }
}

/// `"12.350"` -> `12350.0`; periods stripped before the numeric parse
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace('.', "").parse::<u64>().ok().map(|value| value as f64)
}
