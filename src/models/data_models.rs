use serde::{Deserialize, Serialize};
use std::fmt;

/// Grocery apps whose search results are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    Jumbo,
    Lider,
}

impl Store {
    pub const ALL: [Store; 2] = [Store::Jumbo, Store::Lider];

    pub fn as_str(&self) -> &'static str {
        match self {
            Store::Jumbo => "jumbo",
            Store::Lider => "lider",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Store::Jumbo => "Jumbo",
            Store::Lider => "Lider",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "jumbo" => Some(Store::Jumbo),
            "lider" | "líder" => Some(Store::Lider),
            _ => None,
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Top-left screen coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when both axes differ by less than `tolerance` pixels
    pub fn is_near(&self, other: &Location, tolerance: u32) -> bool {
        self.x.abs_diff(other.x) < tolerance && self.y.abs_diff(other.y) < tolerance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// One text node read from a single screen capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementRecord", into = "ElementRecord")]
pub struct ScreenElement {
    pub text: String,
    pub location: Location,
    pub size: Option<Size>,
}

impl ScreenElement {
    pub fn new(text: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            text: text.into(),
            location: Location::new(x, y),
            size: None,
        }
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = Some(Size { width, height });
        self
    }

    /// Elements without a size are assumed visible
    pub fn is_visible(&self) -> bool {
        self.size
            .map(|size| size.width > 0 && size.height > 0)
            .unwrap_or(true)
    }
}

/// Flat wire shape of a screen element: `{text, x, y, width?, height?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ElementRecord {
    #[serde(default)]
    text: String,
    x: i32,
    y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<i32>,
}

impl From<ElementRecord> for ScreenElement {
    fn from(record: ElementRecord) -> Self {
        let size = match (record.width, record.height) {
            (Some(width), Some(height)) => Some(Size { width, height }),
            _ => None,
        };

        Self {
            text: record.text,
            location: Location::new(record.x, record.y),
            size,
        }
    }
}

impl From<ScreenElement> for ElementRecord {
    fn from(element: ScreenElement) -> Self {
        Self {
            text: element.text,
            x: element.location.x,
            y: element.location.y,
            width: element.size.map(|s| s.width),
            height: element.size.map(|s| s.height),
        }
    }
}

/// Structured reading of a price text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedPrice {
    /// Amount paid for `quantity` units
    pub total_price: f64,
    pub unit_price: f64,
    pub quantity: u32,
    pub is_promotion: bool,
}

impl ParsedPrice {
    pub fn zero() -> Self {
        Self {
            total_price: 0.0,
            unit_price: 0.0,
            quantity: 1,
            is_promotion: false,
        }
    }

    pub fn single(amount: f64) -> Self {
        Self {
            total_price: amount,
            unit_price: amount,
            quantity: 1,
            is_promotion: false,
        }
    }

    pub fn promotion(quantity: u32, total_price: f64) -> Self {
        Self {
            total_price,
            unit_price: total_price / quantity as f64,
            quantity,
            is_promotion: true,
        }
    }
}

impl Default for ParsedPrice {
    fn default() -> Self {
        Self::zero()
    }
}

/// Texts gathered around one price anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    pub anchor_price_text: String,
    pub anchor_location: Location,
    /// Starts with the anchor text
    pub member_texts: Vec<String>,
}

impl ProductGroup {
    /// Member texts other than the leading anchor
    pub fn neighbor_texts(&self) -> impl Iterator<Item = &str> {
        self.member_texts.iter().skip(1).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub size: String,
    pub price: f64,
    pub unit_price: f64,
    pub quantity: u32,
    pub is_promotion: bool,
    pub price_per_liter: f64,
    /// Price per liter for volumes, per kilogram for weights
    pub price_per_unit: f64,
    pub store: Option<Store>,
}

impl ProductRecord {
    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }
}
