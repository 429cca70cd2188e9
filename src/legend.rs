// @file legend.rs
// @brief legend entries derived from a quantize scale, and their SVG rendering

use crate::color::{NO_DATA_COLOR, to_rgb};
use crate::layout::{Layout, LayoutElem, LayoutMargin, RectAnchor, StructuredDrawingArea};
use crate::scale::QuantizeScale;
use anyhow::Result;
use hex_color::HexColor;
use plotters::element::{Drawable, PointCollection};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_backend::{BackendStyle, DrawingErrorKind};

pub const NO_DATA_LABEL: &str = "No data";

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub color: HexColor,
    pub label: String,
}

fn percent(v: f64) -> String {
    // f64::round is half away from zero; format the already-integral value
    format!("{:.0}", v.round())
}

/// One entry per stop, highest bucket first, then the "No data" entry.
///
/// The bucket that starts at zero is labeled with its upper bound only (`<20%`), the
/// others with both bounds (`20-40%`).
pub fn build(scale: &QuantizeScale, stops: &[HexColor]) -> Vec<LegendEntry> {
    let mut v = Vec::with_capacity(stops.len() + 1);
    for &stop in stops.iter().rev() {
        let Some((low, high)) = scale.invert_extent(stop) else {
            log::warn!("legend stop {stop:?} is not part of the scale");
            continue;
        };
        let label = if low == 0.0 {
            format!("<{}%", percent(high))
        } else {
            format!("{}-{}%", percent(low), percent(high))
        };
        v.push(LegendEntry { color: stop, label });
    }
    v.push(LegendEntry {
        color: NO_DATA_COLOR,
        label: NO_DATA_LABEL.to_string(),
    });
    v
}

#[derive(Clone)]
pub struct LegendAppearance<'a> {
    pub row_height: u32,
    pub row_spacing: u32,
    pub swatch_width: u32,
    pub label_setback: u32,
    pub label_width: u32,
    pub label_style: TextStyle<'a>,
    pub title_height: u32,
    pub title_style: TextStyle<'a>,
    pub margin: u32,
}

impl Default for LegendAppearance<'_> {
    fn default() -> Self {
        LegendAppearance {
            row_height: 18,
            row_spacing: 4,
            swatch_width: 28,
            label_setback: 8,
            label_width: 72,
            label_style: TextStyle::from(("sans-serif", 13).into_font()).color(&BLACK),
            title_height: 24,
            title_style: TextStyle::from(("sans-serif", 15).into_font()).color(&BLACK),
            margin: 10,
        }
    }
}

/// Swatch-and-label rows, one per legend entry, top to bottom.
#[derive(Clone)]
pub struct LegendTable<'a> {
    entries: &'a [LegendEntry],
    app: &'a LegendAppearance<'a>,
}

impl<'a> LegendTable<'a> {
    pub fn new(entries: &'a [LegendEntry], appearance: &'a LegendAppearance<'a>) -> LegendTable<'a> {
        LegendTable { entries, app: appearance }
    }

    fn build_layout(&self) -> Layout {
        let rows = (0..self.entries.len())
            .map(|i| LayoutElem::Margined {
                margin: LayoutMargin::new(0, 0, 0, self.app.row_spacing),
                center: Box::new(LayoutElem::Horizontal(vec![
                    LayoutElem::Rect {
                        id: Some(format!("swatch.{i}")),
                        width: self.app.swatch_width,
                        height: self.app.row_height,
                    },
                    LayoutElem::Margined {
                        margin: LayoutMargin::new(self.app.label_setback, 0, 0, 0),
                        center: Box::new(LayoutElem::Rect {
                            id: Some(format!("label.{i}")),
                            width: self.app.label_width,
                            height: self.app.row_height,
                        }),
                    },
                ])),
            })
            .collect::<Vec<_>>();
        Layout(LayoutElem::Vertical(rows))
    }

    pub fn get_dim(&self) -> (u32, u32) {
        self.build_layout().get_dim()
    }
}

impl<'a> PointCollection<'a, (i32, i32)> for &'a LegendTable<'_> {
    type Point = &'a (i32, i32);
    type IntoIter = std::iter::Once<&'a (i32, i32)>;

    fn point_iter(self) -> Self::IntoIter {
        std::iter::once(&(0, 0))
    }
}

impl<DB> Drawable<DB> for LegendTable<'_>
where
    DB: DrawingBackend,
{
    fn draw<I>(&self, pos: I, backend: &mut DB, _: (u32, u32)) -> Result<(), DrawingErrorKind<DB::ErrorType>>
    where
        I: Iterator<Item = (i32, i32)>,
    {
        let mut pos = pos;
        let Some(pos) = pos.next() else {
            return Ok(());
        };
        let shift = |(x, y): (i32, i32)| (pos.0 + x, pos.1 + y);

        let layout = self.build_layout();
        let label_style = self.app.label_style.pos(Pos::new(HPos::Left, VPos::Center));
        for (i, entry) in self.entries.iter().enumerate() {
            if let Some(range) = layout.get_range(&format!("swatch.{i}")) {
                let top_left = shift(range.get_relative_pos(RectAnchor::TopLeft, RectAnchor::TopLeft));
                let bottom_right = shift(range.get_relative_pos(RectAnchor::TopLeft, RectAnchor::BottomRight));
                backend.draw_rect(top_left, bottom_right, &to_rgb(entry.color).color(), true)?;
                backend.draw_rect(top_left, bottom_right, &BLACK.color(), false)?;
            }
            if let Some(range) = layout.get_range(&format!("label.{i}")) {
                let (x, y) = range.get_relative_pos(RectAnchor::TopLeft, RectAnchor::TopLeft);
                let pos = shift((x, y + self.app.row_height as i32 / 2));
                backend.draw_text(&entry.label, &label_style, pos)?;
            }
        }
        Ok(())
    }
}

/// Renders the legend (with an optional title row) into a standalone SVG document.
pub fn render_svg(entries: &[LegendEntry], title: Option<&str>, appearance: &LegendAppearance) -> Result<String> {
    let table = LegendTable::new(entries, appearance);
    let (table_width, table_height) = table.get_dim();

    let mut rows = Vec::new();
    if title.is_some() {
        rows.push(LayoutElem::Rect {
            id: Some("title".to_string()),
            width: table_width,
            height: appearance.title_height,
        });
    }
    rows.push(LayoutElem::Rect {
        id: Some("table".to_string()),
        width: table_width,
        height: table_height,
    });
    let layout = Layout(LayoutElem::Margined {
        margin: LayoutMargin::uniform(appearance.margin),
        center: Box::new(LayoutElem::Vertical(rows)),
    });

    let mut buf = String::new();
    {
        let areas = StructuredDrawingArea::from_layout(&layout, &mut buf)?;
        if let (Some(title), Some(area)) = (title, areas.get_area("title")) {
            let style = appearance.title_style.pos(Pos::new(HPos::Left, VPos::Top));
            area.draw_text(title, &style, (0, 0))?;
        }
        if let Some(area) = areas.get_area("table") {
            area.draw(&table)?;
        }
        areas.present()?;
    }
    log::debug!("legend rendered: {} entries", entries.len());
    Ok(buf)
}
