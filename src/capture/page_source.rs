use anyhow::{Result, anyhow};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use crate::models::ScreenElement;

/// uiautomator bounds attribute: `[x1,y1][x2,y2]`
static BOUNDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(-?\d+),(-?\d+)\]\[(-?\d+),(-?\d+)\]$").expect("bounds pattern")
});

/// Reads the text nodes of a uiautomator page-source dump.
///
/// Every node carrying `bounds` becomes one element. Text comes from `text`,
/// or from `content-desc` when the app leaves `text` empty.
pub fn parse_page_source(xml: &str) -> Result<Vec<ScreenElement>> {
    let document = Html::parse_document(xml);
    let selector =
        Selector::parse("[bounds]").map_err(|e| anyhow!("Invalid node selector: {:?}", e))?;

    let mut elements = Vec::new();

    for node in document.select(&selector) {
        let attributes = node.value();
        let bounds = attributes.attr("bounds").unwrap_or_default();
        let (x1, y1, x2, y2) = parse_bounds(bounds)?;

        let text = attributes
            .attr("text")
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .or_else(|| attributes.attr("content-desc").map(str::trim))
            .unwrap_or_default();

        elements.push(ScreenElement::new(text, x1, y1).with_size(x2 - x1, y2 - y1));
    }

    debug!("Parsed {} nodes from page source", elements.len());
    Ok(elements)
}

pub fn parse_bounds(bounds: &str) -> Result<(i32, i32, i32, i32)> {
    let captures = BOUNDS
        .captures(bounds.trim())
        .ok_or_else(|| anyhow!("Malformed node bounds: {:?}", bounds))?;

    let coordinate = |index: usize| -> Result<i32> {
        captures[index]
            .parse::<i32>()
            .map_err(|e| anyhow!("Bad coordinate in bounds {:?}: {}", bounds, e))
    };

    Ok((coordinate(1)?, coordinate(2)?, coordinate(3)?, coordinate(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Size};

    const DUMP: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<hierarchy rotation="0">
  <node index="0" text="" class="android.widget.FrameLayout" content-desc="" bounds="[0,0][1080,2340]">
    <node index="0" text="Leche Soprole Entera 1L" class="android.widget.TextView" content-desc="" bounds="[40,470][700,520]" />
    <node index="1" text="$1.990" class="android.widget.TextView" content-desc="" bounds="[40,500][300,560]" />
    <node index="2" text="" class="android.view.View" content-desc="Agregar al carro" bounds="[800,500][1040,580]" />
    <node index="3" text="Aceite &amp; Vinagre" class="android.widget.TextView" bounds="[40,900][700,950]" />
  </node>
</hierarchy>"#;

    #[test]
    fn test_page_source_nodes() {
        let elements = parse_page_source(DUMP).unwrap();

        assert_eq!(elements.len(), 5);
        assert_eq!(elements[0].text, "");
        assert_eq!(elements[1].text, "Leche Soprole Entera 1L");
        assert_eq!(elements[1].location, Location::new(40, 470));
        assert_eq!(elements[1].size, Some(Size { width: 660, height: 50 }));
        assert_eq!(elements[2].text, "$1.990");
        assert_eq!(elements[3].text, "Agregar al carro");
        assert_eq!(elements[4].text, "Aceite & Vinagre");
    }

    #[test]
    fn test_malformed_bounds_is_an_error() {
        let dump = r#"<hierarchy><node text="$990" bounds="[0,0]" /></hierarchy>"#;
        assert!(parse_page_source(dump).is_err());
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(parse_bounds("[0,-12][1080,40]").unwrap(), (0, -12, 1080, 40));
        assert!(parse_bounds("0,0,10,10").is_err());
    }
}
