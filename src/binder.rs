// @file binder.rs
// @brief result records to (region key, fill) paint instructions

use crate::color::NO_DATA_COLOR;
use crate::dataset::ResultRecord;
use crate::scale::QuantizeScale;
use crate::slug::normalize;
use hex_color::HexColor;

#[derive(Clone, Debug, PartialEq)]
pub struct PaintInstruction {
    pub region_key: String,
    pub color: HexColor,
}

/// Paint for one record. A percentage of exactly zero is how the results feed marks a
/// region without data, so it gets the no-data color rather than the lowest bucket.
pub fn paint_color(percentage: f64, scale: &QuantizeScale) -> HexColor {
    if percentage == 0.0 { NO_DATA_COLOR } else { scale.map(percentage) }
}

/// One instruction per record, in record order. Whether a key exists on the map is
/// for the render surface to decide.
pub fn bind(records: &[ResultRecord], scale: &QuantizeScale) -> Vec<PaintInstruction> {
    records
        .iter()
        .filter_map(|r| {
            if r.percentage.is_nan() {
                log::warn!("skip {r}: percentage is not a number");
                return None;
            }
            Some(PaintInstruction {
                region_key: normalize(&r.region_name),
                color: paint_color(r.percentage, scale),
            })
        })
        .collect()
}
