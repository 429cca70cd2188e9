// @file surface.rs
// @brief render surfaces: region lookup table and the static SVG map

use crate::binder::PaintInstruction;
use crate::color::to_css;
use hex_color::HexColor;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

static START_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[A-Za-z][\w:.\-]*(?:\s[^>]*)?>").unwrap());
static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Anything paint instructions can be applied to.
pub trait PaintSurface {
    /// Fills the region registered under `key`. Returns false, painting nothing, when
    /// the surface has no such region.
    fn paint(&mut self, key: &str, color: HexColor) -> bool;

    fn apply(&mut self, paints: &[PaintInstruction]) -> PaintReport {
        let mut report = PaintReport::default();
        for p in paints {
            if self.paint(&p.region_key, p.color) {
                report.painted += 1;
            } else {
                log::debug!("no region for key {:?}", p.region_key);
                report.unresolved += 1;
            }
        }
        report
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PaintReport {
    pub painted: usize,
    pub unresolved: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionHandle(usize);

/// Region key to element, built once per surface. When several elements carry the
/// same key the first one in document order owns it.
#[derive(Clone, Debug, Default)]
pub struct RegionTable {
    map: HashMap<String, RegionHandle>,
}

impl RegionTable {
    pub fn insert(&mut self, key: &str, handle: RegionHandle) {
        self.map.entry(key.to_string()).or_insert(handle);
    }

    pub fn get(&self, key: &str) -> Option<RegionHandle> {
        self.map.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A pre-rendered SVG map whose region elements are tagged with their key as a class,
/// e.g. `<path class="constituency cardiff-central" d="..."/>`.
#[derive(Clone, Debug)]
pub struct SvgMap {
    source: String,
    tags: Vec<Range<usize>>,
    regions: RegionTable,
    fills: HashMap<RegionHandle, HexColor>,
}

impl SvgMap {
    pub fn parse(svg: &str) -> SvgMap {
        let mut tags = Vec::new();
        let mut regions = RegionTable::default();
        for m in START_TAG.find_iter(svg) {
            let Some(caps) = CLASS_ATTR.captures(m.as_str()) else {
                continue;
            };
            let classes = caps.get(1).or_else(|| caps.get(2)).map_or("", |c| c.as_str());
            let handle = RegionHandle(tags.len());
            tags.push(m.range());
            for class in classes.split_ascii_whitespace() {
                regions.insert(class, handle);
            }
        }
        log::debug!("svg map: {} tagged elements, {} region keys", tags.len(), regions.len());
        SvgMap {
            source: svg.to_string(),
            tags,
            regions,
            fills: HashMap::new(),
        }
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    pub fn fill_of(&self, key: &str) -> Option<HexColor> {
        self.regions.get(key).and_then(|h| self.fills.get(&h).copied())
    }

    /// Drops all paint, back to the document as loaded.
    pub fn clear(&mut self) {
        self.fills.clear();
    }

    /// The document with every painted element's fill set.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut last = 0;
        for (i, range) in self.tags.iter().enumerate() {
            let Some(&color) = self.fills.get(&RegionHandle(i)) else {
                continue;
            };
            out.push_str(&self.source[last..range.start]);
            out.push_str(&with_fill(&self.source[range.clone()], color));
            last = range.end;
        }
        out.push_str(&self.source[last..]);
        out
    }
}

impl PaintSurface for SvgMap {
    fn paint(&mut self, key: &str, color: HexColor) -> bool {
        match self.regions.get(key) {
            Some(handle) => {
                self.fills.insert(handle, color);
                true
            }
            None => false,
        }
    }
}

// sets `fill` in the style attribute of a start tag, keeping other declarations
fn with_fill(tag: &str, color: HexColor) -> String {
    let fill = format!("fill:{}", to_css(color));
    if let Some(caps) = STYLE_ATTR.captures(tag) {
        let range = caps.get(0).map_or(0..0, |m| m.range());
        // keep the attribute's own quote, its value may hold the other kind
        let (quote, style) = match (caps.get(1), caps.get(2)) {
            (Some(v), _) => ('"', v.as_str()),
            (None, Some(v)) => ('\'', v.as_str()),
            (None, None) => ('"', ""),
        };
        let decls = style
            .split(';')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .filter(|d| !d.split(':').next().unwrap_or("").trim().eq_ignore_ascii_case("fill"));
        let style = std::iter::once(fill.as_str()).chain(decls).collect::<Vec<_>>().join(";");
        format!("{} style={quote}{style}{quote}{}", &tag[..range.start], &tag[range.end..])
    } else {
        let end = if tag.ends_with("/>") { tag.len() - 2 } else { tag.len() - 1 };
        let head = tag[..end].trim_end();
        format!("{} style=\"{}\"{}", head, fill, &tag[end..])
    }
}
