// @file layout.rs
// @brief box layout builder on top of plotters' SVG backend

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::HashMap;
use std::ops::Range;

#[derive(Copy, Clone, Debug, Default)]
pub struct LayoutMargin {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl LayoutMargin {
    pub fn new(left: u32, right: u32, top: u32, bottom: u32) -> LayoutMargin {
        LayoutMargin { left, right, top, bottom }
    }

    pub fn uniform(margin: u32) -> LayoutMargin {
        LayoutMargin {
            left: margin,
            right: margin,
            top: margin,
            bottom: margin,
        }
    }
}

#[derive(Clone, Debug)]
pub enum LayoutElem {
    Rect { id: Option<String>, width: u32, height: u32 },
    Horizontal(Vec<LayoutElem>),
    Vertical(Vec<LayoutElem>),
    Margined { margin: LayoutMargin, center: Box<LayoutElem> },
}

/// A rectangle placed inside a background of `bg_dim`.
#[derive(Clone, Debug)]
pub struct RectPosition {
    bg_dim: (u32, u32),
    x_range: Range<u32>,
    y_range: Range<u32>,
}

#[derive(Copy, Clone, Debug)]
pub enum RectAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl RectPosition {
    pub fn get_relative_pos(&self, root: RectAnchor, target: RectAnchor) -> (i32, i32) {
        let x_adj = match root {
            RectAnchor::TopLeft | RectAnchor::BottomLeft => 0,
            RectAnchor::TopRight | RectAnchor::BottomRight => self.bg_dim.0 as i32,
        };
        let y_adj = match root {
            RectAnchor::TopLeft | RectAnchor::TopRight => 0,
            RectAnchor::BottomLeft | RectAnchor::BottomRight => self.bg_dim.1 as i32,
        };
        let x_pos = match target {
            RectAnchor::TopLeft | RectAnchor::BottomLeft => self.x_range.start as i32,
            RectAnchor::TopRight | RectAnchor::BottomRight => self.x_range.end as i32,
        };
        let y_pos = match target {
            RectAnchor::TopLeft | RectAnchor::TopRight => self.y_range.start as i32,
            RectAnchor::BottomLeft | RectAnchor::BottomRight => self.y_range.end as i32,
        };
        (x_pos - x_adj, y_pos - y_adj)
    }

    pub fn add_margin(&self, margin: &LayoutMargin) -> RectPosition {
        RectPosition {
            bg_dim: (
                margin.left + self.bg_dim.0 + margin.right,
                margin.top + self.bg_dim.1 + margin.bottom,
            ),
            x_range: self.x_range.start + margin.left..self.x_range.end + margin.left,
            y_range: self.y_range.start + margin.top..self.y_range.end + margin.top,
        }
    }
}

impl LayoutElem {
    pub fn get_dim(&self) -> (u32, u32) {
        match self {
            LayoutElem::Rect { width, height, .. } => (*width, *height),
            LayoutElem::Horizontal(inner) => inner
                .iter()
                .map(|x| x.get_dim())
                .fold((0, 0), |acc, (w, h)| (acc.0 + w, acc.1.max(h))),
            LayoutElem::Vertical(inner) => inner
                .iter()
                .map(|x| x.get_dim())
                .fold((0, 0), |acc, (w, h)| (acc.0.max(w), acc.1 + h)),
            LayoutElem::Margined { margin, center } => {
                let (w, h) = center.get_dim();
                (w + margin.left + margin.right, h + margin.top + margin.bottom)
            }
        }
    }

    /// Position of the rect tagged `id`, relative to this element.
    pub fn get_range(&self, id: &str) -> Option<RectPosition> {
        match self {
            LayoutElem::Rect { id: rect_id, .. } => {
                if rect_id.as_deref() == Some(id) {
                    let (w, h) = self.get_dim();
                    Some(RectPosition {
                        bg_dim: (w, h),
                        x_range: 0..w,
                        y_range: 0..h,
                    })
                } else {
                    None
                }
            }
            LayoutElem::Horizontal(inner) | LayoutElem::Vertical(inner) => {
                let (index, range) = inner
                    .iter()
                    .enumerate()
                    .find_map(|(i, node)| node.get_range(id).map(|r| (i, r)))?;

                let mut range = if matches!(self, LayoutElem::Horizontal(_)) {
                    let before = inner[..index].iter().map(|node| node.get_dim().0).sum::<u32>();
                    let after = inner[index + 1..].iter().map(|node| node.get_dim().0).sum::<u32>();
                    range.add_margin(&LayoutMargin::new(before, after, 0, 0))
                } else {
                    let before = inner[..index].iter().map(|node| node.get_dim().1).sum::<u32>();
                    let after = inner[index + 1..].iter().map(|node| node.get_dim().1).sum::<u32>();
                    range.add_margin(&LayoutMargin::new(0, 0, before, after))
                };
                // children sit at the top-left of their cell; widen to the whole box
                range.bg_dim = self.get_dim();
                Some(range)
            }
            LayoutElem::Margined { margin, center } => Some(center.get_range(id)?.add_margin(margin)),
        }
    }

    /// Ids of every tagged rect, in tree order.
    pub fn rect_ids(&self) -> Vec<&str> {
        match self {
            LayoutElem::Rect { id, .. } => id.as_deref().into_iter().collect(),
            LayoutElem::Horizontal(inner) | LayoutElem::Vertical(inner) => {
                inner.iter().flat_map(|node| node.rect_ids()).collect()
            }
            LayoutElem::Margined { center, .. } => center.rect_ids(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Layout(pub LayoutElem);

impl std::ops::Deref for Layout {
    type Target = LayoutElem;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Drawing areas of a layout, one per tagged rect, addressable by rect id.
pub struct StructuredDrawingArea<'a> {
    root: DrawingArea<SVGBackend<'a>, Shift>,
    index: HashMap<String, DrawingArea<SVGBackend<'a>, Shift>>,
}

impl<'a> StructuredDrawingArea<'a> {
    /// Lays `layout` out over an SVG document written into `buf` once presented.
    pub fn from_layout(layout: &Layout, buf: &'a mut String) -> Result<StructuredDrawingArea<'a>> {
        let root = SVGBackend::with_string(buf, layout.get_dim()).into_drawing_area();
        root.fill(&WHITE)?;

        let mut index = HashMap::new();
        for id in layout.rect_ids() {
            if index.contains_key(id) {
                return Err(anyhow!("duplicate rect id: {id}"));
            }
            let Some(range) = layout.get_range(id) else {
                continue;
            };
            let (x0, y0) = range.get_relative_pos(RectAnchor::TopLeft, RectAnchor::TopLeft);
            let (x1, y1) = range.get_relative_pos(RectAnchor::TopLeft, RectAnchor::BottomRight);
            let area = root.clone().shrink((x0, y0), (x1 - x0, y1 - y0));
            index.insert(id.to_string(), area);
        }
        Ok(StructuredDrawingArea { root, index })
    }

    pub fn get_area(&self, id: &str) -> Option<&DrawingArea<SVGBackend<'a>, Shift>> {
        self.index.get(id)
    }

    pub fn present(&self) -> Result<()> {
        self.root.present()?;
        Ok(())
    }
}
