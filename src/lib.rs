//! Election-result choropleths: a quantized color scale built from a party's results,
//! the legend that describes it, and the paint applied to each region of a map.

pub mod binder;
pub mod catalog;
pub mod color;
pub mod dataset;
pub mod engine;
pub mod file;
pub mod layout;
pub mod legend;
pub mod scale;
pub mod selection;
pub mod slug;
pub mod surface;

pub use binder::{PaintInstruction, bind};
pub use catalog::{Party, PartyCatalog};
pub use color::NO_DATA_COLOR;
pub use dataset::{DataSource, Dataset, JsonDirSource, ResultRecord, parse_dataset};
pub use engine::{Choropleth, Outcome, Rendering};
pub use legend::{LegendAppearance, LegendEntry};
pub use scale::QuantizeScale;
pub use selection::{SelectionClock, SelectionTicket};
pub use slug::normalize;
pub use surface::{PaintReport, PaintSurface, RegionHandle, RegionTable, SvgMap};
