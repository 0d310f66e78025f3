use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Size token: `1L`, `2.5L`, `1,5 lts`, `500ml`, `350 cc`, `3 litros`, `800g`, `1 kg`, `6x1.5L`.
/// The amount must not continue a longer number; the trailing `\b` rejects `12 Latas`.
static SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^\d.,])(\d+(?:[.,]\d+)?)\s*(ml|cc|litros?|lts?|l|kilos?|kg|gramos|grs|gr|g)\b")
        .expect("size token pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureUnit {
    Milliliters,
    Liters,
    Grams,
    Kilograms,
}

/// Package size read from a product text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub amount: f64,
    pub unit: MeasureUnit,
}

impl Measure {
    /// First size token in `text` with its matched substring
    pub fn find(text: &str) -> Option<(String, Measure)> {
        SIZE_TOKEN.captures_iter(text).find_map(|captures| {
            let amount_match = captures.get(1)?;
            let unit_match = captures.get(2)?;
            let token = text[amount_match.start()..unit_match.end()].to_string();
            let amount = amount_match.as_str().replace(',', ".").parse::<f64>().ok()?;
            let unit = unit_from_suffix(unit_match.as_str())?;
            (amount > 0.0).then_some((token, Measure { amount, unit }))
        })
    }

    pub fn liters(&self) -> Option<f64> {
        match self.unit {
            MeasureUnit::Milliliters => Some(self.amount / 1000.0),
            MeasureUnit::Liters => Some(self.amount),
            _ => None,
        }
    }

    fn kilograms(&self) -> Option<f64> {
        match self.unit {
            MeasureUnit::Grams => Some(self.amount / 1000.0),
            MeasureUnit::Kilograms => Some(self.amount),
            _ => None,
        }
    }

    /// Liters or kilograms, whichever applies
    pub fn standard_amount(&self) -> f64 {
        self.liters().or_else(|| self.kilograms()).unwrap_or(0.0)
    }
}

fn unit_from_suffix(suffix: &str) -> Option<MeasureUnit> {
    match suffix.to_lowercase().as_str() {
        "ml" | "cc" => Some(MeasureUnit::Milliliters),
        "l" | "lt" | "lts" | "litro" | "litros" => Some(MeasureUnit::Liters),
        "g" | "gr" | "grs" | "gramos" => Some(MeasureUnit::Grams),
        "kg" | "kilo" | "kilos" => Some(MeasureUnit::Kilograms),
        _ => None,
    }
}

/// Price of one standard unit (liter or kilogram) across all `quantity` packages
pub fn price_per_standard_unit(total_price: f64, measure: &Measure, quantity: u32) -> f64 {
    let amount = measure.standard_amount() * quantity.max(1) as f64;
    if amount > 0.0 { total_price / amount } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<Measure> {
        Measure::find(text).map(|(_, measure)| measure)
    }

    #[test]
    fn test_volume_tokens() {
        assert_eq!(
            Measure::find("Leche Soprole 1L"),
            Some(("1L".to_string(), Measure { amount: 1.0, unit: MeasureUnit::Liters }))
        );
        assert_eq!(parse("Bebida Cola 2.5L").unwrap().liters(), Some(2.5));
        assert_eq!(parse("Jugo 1,5 lts").unwrap().liters(), Some(1.5));
        assert_eq!(parse("Agua 500ml").unwrap().liters(), Some(0.5));
        assert_eq!(parse("Lata 350 cc").unwrap().liters(), Some(0.35));
        assert_eq!(parse("Aceite 3 litros").unwrap().liters(), Some(3.0));
    }

    #[test]
    fn test_multipack_tokens() {
        assert_eq!(
            Measure::find("Bebida Cola Pack 6x1.5L"),
            Some(("1.5L".to_string(), Measure { amount: 1.5, unit: MeasureUnit::Liters }))
        );
        assert_eq!(
            Measure::find("Agua Mineral 6x500ml"),
            Some(("500ml".to_string(), Measure { amount: 500.0, unit: MeasureUnit::Milliliters }))
        );
        assert_eq!(Measure::find("Cerveza 12 Latas"), None);
    }

    #[test]
    fn test_weight_tokens() {
        let measure = parse("Arroz Grado 1 1 kg").unwrap();
        assert_eq!(measure.kilograms(), Some(1.0));
        assert_eq!(measure.liters(), None);

        assert_eq!(parse("Galletas 800g").unwrap().kilograms(), Some(0.8));
    }

    #[test]
    fn test_words_are_not_units() {
        assert_eq!(parse("Galletas 6 Grandes"), None);
        assert_eq!(parse("Pack 3 Limones"), None);
        assert_eq!(parse("Coca Cola"), None);
        assert_eq!(parse("0 ml"), None);
    }

    #[test]
    fn test_price_per_standard_unit() {
        let bottle = Measure { amount: 2.5, unit: MeasureUnit::Liters };
        assert_eq!(price_per_standard_unit(4000.0, &bottle, 2), 800.0);

        let can = Measure { amount: 350.0, unit: MeasureUnit::Milliliters };
        assert!((price_per_standard_unit(700.0, &can, 1) - 2000.0).abs() < 1e-9);
    }
}
