// @file scale.rs
// @brief quantized color scale over [0, max]

use anyhow::{Result, anyhow};
use hex_color::HexColor;

/// Splits `[0, max]` into one equal-width bucket per color stop; bucket `i` is painted
/// with `stops[i]`.
///
/// The lower bound is pinned to zero whatever the data looks like. A `max` of zero
/// collapses every bucket onto a single point; the scale stays usable in that case
/// (`map(0.0)` is `stops[0]`) and never divides by zero.
#[derive(Clone, Debug)]
pub struct QuantizeScale {
    stops: Vec<HexColor>,
    max: f64,
}

impl QuantizeScale {
    pub fn new(stops: &[HexColor], max: f64) -> Result<QuantizeScale> {
        if stops.is_empty() {
            return Err(anyhow!("color scale needs at least one stop"));
        }
        log::debug!("quantize scale: {} stops over [0, {max}]", stops.len());
        Ok(QuantizeScale {
            stops: stops.to_vec(),
            max,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (0.0, self.max)
    }

    /// Bucket index for `value`, clamped into `0..stops.len()`. Bucket `i` holds
    /// `extent(i).0 <= value < extent(i).1`, compared against the same edges `extent`
    /// reports.
    pub fn bucket(&self, value: f64) -> usize {
        let last = self.stops.len() - 1;
        if value >= self.max && value > 0.0 {
            return last;
        }
        if self.max <= 0.0 {
            return 0;
        }
        let pos = (self.stops.len() as f64 * value / self.max).floor();
        // f64::max drops NaN, sending it to the first bucket
        let mut i = (pos.max(0.0) as usize).min(last);
        // the estimate can be one off either way near an edge
        while i > 0 && value < self.extent(i).0 {
            i -= 1;
        }
        while i < last && value >= self.extent(i + 1).0 {
            i += 1;
        }
        i
    }

    pub fn map(&self, value: f64) -> HexColor {
        self.stops[self.bucket(value)]
    }

    /// Bounds `(low, high)` of the bucket painted with `color`. The first matching stop
    /// wins when a palette repeats a color; `None` if `color` is not a stop.
    pub fn invert_extent(&self, color: HexColor) -> Option<(f64, f64)> {
        let i = self.stops.iter().position(|&c| c == color)?;
        Some(self.extent(i))
    }

    pub fn extent(&self, bucket: usize) -> (f64, f64) {
        let n = self.stops.len() as f64;
        let low = bucket as f64 * self.max / n;
        let high = (bucket + 1) as f64 * self.max / n;
        (low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_colors;

    fn traffic_light() -> Vec<HexColor> {
        parse_colors(&["#FFFFFF", "#FFFF00", "#FF0000"]).unwrap()
    }

    fn labour() -> Vec<HexColor> {
        parse_colors(&["#FFFFFF", "#fee5d9", "#fcbba1", "#fc9272", "#fb6a4a", "#D50000"]).unwrap()
    }

    #[test]
    fn bucket_boundaries() {
        let stops = traffic_light();
        let scale = QuantizeScale::new(&stops, 60.0).unwrap();
        assert_eq!(scale.map(0.0), stops[0]);
        assert_eq!(scale.map(19.9), stops[0]);
        assert_eq!(scale.map(20.0), stops[1]);
        assert_eq!(scale.map(39.9), stops[1]);
        assert_eq!(scale.map(40.0), stops[2]);
        assert_eq!(scale.map(45.0), stops[2]);
        assert_eq!(scale.map(60.0), stops[2]);
    }

    #[test]
    fn ends_of_the_domain() {
        let stops = labour();
        for max in [0.5, 1.0, 37.3, 60.0, 100.0] {
            let scale = QuantizeScale::new(&stops, max).unwrap();
            assert_eq!(scale.map(0.0), stops[0]);
            assert_eq!(scale.map(max), *stops.last().unwrap());
        }
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let stops = traffic_light();
        let scale = QuantizeScale::new(&stops, 60.0).unwrap();
        assert_eq!(scale.map(-5.0), stops[0]);
        assert_eq!(scale.map(75.0), stops[2]);
        assert_eq!(scale.map(f64::INFINITY), stops[2]);
        assert_eq!(scale.map(f64::NAN), stops[0]);
    }

    #[test]
    fn invert_extent_matches_map() {
        let stops = labour();
        let scale = QuantizeScale::new(&stops, 53.7).unwrap();
        for &stop in &stops {
            let (low, high) = scale.invert_extent(stop).unwrap();
            assert!(low < high);
            assert_eq!(scale.map((low + high) / 2.0), stop);
        }
        let (low, high) = scale.invert_extent(stops[3]).unwrap();
        assert!((low - 3.0 * 53.7 / 6.0).abs() < 1e-9);
        assert!((high - 4.0 * 53.7 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn lower_edges_belong_to_their_bucket() {
        let stops = labour();
        for k in 1..2000 {
            let max = k as f64 * 0.1;
            let scale = QuantizeScale::new(&stops, max).unwrap();
            for (i, &stop) in stops.iter().enumerate() {
                let (low, high) = scale.extent(i);
                assert_eq!(scale.map(low), stop, "max={max} bucket={i} low={low}");
                assert_eq!(scale.invert_extent(stop), Some((low, high)));
                if i > 0 {
                    assert_eq!(scale.extent(i - 1).1, low);
                }
            }
        }
    }

    #[test]
    fn invert_extent_unknown_color() {
        let scale = QuantizeScale::new(&traffic_light(), 60.0).unwrap();
        assert_eq!(scale.invert_extent(HexColor::rgb(1, 2, 3)), None);
    }

    #[test]
    fn repeated_stop_resolves_to_first_bucket() {
        let stops = parse_colors(&["#FFFFFF", "#FF0000", "#FF0000"]).unwrap();
        let scale = QuantizeScale::new(&stops, 30.0).unwrap();
        assert_eq!(scale.invert_extent(stops[2]), Some((10.0, 20.0)));
    }

    #[test]
    fn degenerate_domain() {
        let stops = traffic_light();
        let scale = QuantizeScale::new(&stops, 0.0).unwrap();
        assert_eq!(scale.domain(), (0.0, 0.0));
        assert_eq!(scale.map(0.0), stops[0]);
        assert_eq!(scale.map(12.0), stops[2]);
        for &stop in &stops {
            assert_eq!(scale.invert_extent(stop), Some((0.0, 0.0)));
        }
    }

    #[test]
    fn single_stop() {
        let stops = parse_colors(&["#123456"]).unwrap();
        let scale = QuantizeScale::new(&stops, 10.0).unwrap();
        assert_eq!(scale.map(0.0), stops[0]);
        assert_eq!(scale.map(10.0), stops[0]);
        assert_eq!(scale.invert_extent(stops[0]), Some((0.0, 10.0)));
    }

    #[test]
    fn empty_stops_rejected() {
        assert!(QuantizeScale::new(&[], 10.0).is_err());
    }
}
