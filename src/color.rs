// @file color.rs
// @brief color parsing and conversions shared by the scale, the legend and the map

use anyhow::{Result, anyhow};
use hex_color::HexColor;
use plotters::prelude::RGBColor;

/// Reserved fill for regions without a result. Never produced by a scale.
pub const NO_DATA_COLOR: HexColor = HexColor::rgb(0xc0, 0xc0, 0xc0);

pub fn parse_color(s: &str) -> Result<HexColor> {
    HexColor::parse_rgb(s.trim()).map_err(|e| anyhow!("invalid color {s:?}: {e}"))
}

pub fn parse_colors<S: AsRef<str>>(v: &[S]) -> Result<Vec<HexColor>> {
    v.iter().map(|s| parse_color(s.as_ref())).collect()
}

/// `#RRGGBB`, the form written into `fill` attributes.
pub fn to_css(color: HexColor) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

pub fn to_rgb(color: HexColor) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format() {
        let c = parse_color("#fee5d9").unwrap();
        assert_eq!((c.r, c.g, c.b), (0xfe, 0xe5, 0xd9));
        assert_eq!(to_css(c), "#FEE5D9");
        assert_eq!(to_css(parse_color(" #0087DC ").unwrap()), "#0087DC");
        assert_eq!(to_css(NO_DATA_COLOR), "#C0C0C0");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_color("red").is_err());
        assert!(parse_color("#12345").is_err());
        assert!(parse_colors(&["#FFFFFF", "nope"]).is_err());
    }

    #[test]
    fn converts_to_plotters() {
        let RGBColor(r, g, b) = to_rgb(parse_color("#D50000").unwrap());
        assert_eq!((r, g, b), (0xd5, 0, 0));
    }
}
