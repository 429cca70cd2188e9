// @file engine.rs
// @brief one party selection: fetch, scale, legend, bind, paint

use crate::binder::{PaintInstruction, bind};
use crate::catalog::{Party, PartyCatalog};
use crate::dataset::{DataSource, Dataset};
use crate::legend::{self, LegendEntry};
use crate::scale::QuantizeScale;
use crate::selection::SelectionTicket;
use crate::surface::{PaintReport, PaintSurface};
use anyhow::Result;

/// Everything derived from one party's dataset.
#[derive(Clone, Debug)]
pub struct Rendering {
    pub slug: String,
    pub scale: QuantizeScale,
    pub legend: Vec<LegendEntry>,
    pub paints: Vec<PaintInstruction>,
}

#[derive(Debug)]
pub enum Outcome {
    Rendered(Rendering, PaintReport),
    UnknownParty,
    /// A newer selection started while this one was in flight; nothing was painted.
    Stale,
}

pub struct Choropleth {
    catalog: PartyCatalog,
}

impl Choropleth {
    pub fn new(catalog: PartyCatalog) -> Choropleth {
        Choropleth { catalog }
    }

    pub fn catalog(&self) -> &PartyCatalog {
        &self.catalog
    }

    pub fn compute(&self, party: &Party, dataset: &Dataset) -> Result<Rendering> {
        let scale = QuantizeScale::new(&party.stops, dataset.max_percentage())?;
        let legend = legend::build(&scale, &party.stops);
        let paints = bind(&dataset.records, &scale);
        Ok(Rendering {
            slug: party.slug.clone(),
            scale,
            legend,
            paints,
        })
    }

    /// Runs a full cycle for `slug`. The ticket is checked once the data is in, before
    /// the surface is touched.
    pub fn select<S, P>(&self, ticket: &SelectionTicket, slug: &str, source: &S, surface: &mut P) -> Result<Outcome>
    where
        S: DataSource + ?Sized,
        P: PaintSurface + ?Sized,
    {
        let Some(party) = self.catalog.lookup(slug) else {
            log::warn!("unknown party: {slug:?}");
            return Ok(Outcome::UnknownParty);
        };
        if !ticket.is_current() {
            return Ok(Outcome::Stale);
        }

        let dataset = source.fetch(&party.slug)?;
        if dataset.skipped > 0 {
            log::warn!("{}: {} malformed records skipped", party.slug, dataset.skipped);
        }
        let rendering = self.compute(party, &dataset)?;

        if !ticket.is_current() {
            log::info!("selection #{} ({}) superseded; dropping results", ticket.epoch(), party.slug);
            return Ok(Outcome::Stale);
        }
        let report = surface.apply(&rendering.paints);
        log::info!(
            "{}: {} records, {} regions painted, {} unresolved",
            party.name,
            dataset.len(),
            report.painted,
            report.unresolved
        );
        Ok(Outcome::Rendered(rendering, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{NO_DATA_COLOR, parse_color};
    use crate::dataset::ResultRecord;
    use crate::selection::SelectionClock;
    use crate::surface::SvgMap;
    use anyhow::anyhow;
    use std::cell::RefCell;

    const MAP: &str = r#"<svg><path class="arfon"/><path class="gower"/><path class="cardiff-central"/></svg>"#;

    struct FixedSource(Vec<ResultRecord>);

    impl DataSource for FixedSource {
        fn fetch(&self, _slug: &str) -> Result<Dataset> {
            Ok(Dataset::new(self.0.clone()))
        }
    }

    // starts another selection while "fetching", like a second click landing first
    struct RacingSource<'a> {
        clock: &'a SelectionClock,
        records: Vec<ResultRecord>,
        fetched: RefCell<Vec<String>>,
    }

    impl DataSource for RacingSource<'_> {
        fn fetch(&self, slug: &str) -> Result<Dataset> {
            self.fetched.borrow_mut().push(slug.to_string());
            self.clock.begin();
            Ok(Dataset::new(self.records.clone()))
        }
    }

    struct FailingSource;

    impl DataSource for FailingSource {
        fn fetch(&self, slug: &str) -> Result<Dataset> {
            Err(anyhow!("no results for {slug}"))
        }
    }

    fn records() -> Vec<ResultRecord> {
        vec![
            ResultRecord::new("Arfon", 0.0),
            ResultRecord::new("Gower", 60.0),
            ResultRecord::new("Cardiff Central", 45.0),
            ResultRecord::new("Somewhere Else", 12.0),
        ]
    }

    #[test]
    fn full_cycle() {
        let engine = Choropleth::new(PartyCatalog::builtin());
        let clock = SelectionClock::new();
        let mut map = SvgMap::parse(MAP);

        let outcome = engine
            .select(&clock.begin(), "labour", &FixedSource(records()), &mut map)
            .unwrap();
        let (rendering, report) = match outcome {
            Outcome::Rendered(rendering, report) => (rendering, report),
            other => panic!("expected a rendering, got {other:?}"),
        };
        assert_eq!(report, PaintReport { painted: 3, unresolved: 1 });
        assert_eq!(rendering.slug, "labour");
        assert_eq!(rendering.legend.len(), 7);
        assert_eq!(rendering.legend[0].label, "50-60%");
        assert_eq!(rendering.legend[5].label, "<10%");

        let labour = engine.catalog().lookup("labour").unwrap();
        assert_eq!(map.fill_of("arfon"), Some(NO_DATA_COLOR));
        assert_eq!(map.fill_of("gower"), Some(labour.stops[5]));
        assert_eq!(map.fill_of("cardiff-central"), Some(labour.stops[4]));
    }

    #[test]
    fn unknown_party_paints_nothing() {
        let engine = Choropleth::new(PartyCatalog::builtin());
        let clock = SelectionClock::new();
        let mut map = SvgMap::parse(MAP);
        let outcome = engine
            .select(&clock.begin(), "whigs", &FailingSource, &mut map)
            .unwrap();
        assert!(matches!(outcome, Outcome::UnknownParty));
        assert_eq!(map.render(), MAP);
    }

    #[test]
    fn superseded_selection_is_dropped() {
        let engine = Choropleth::new(PartyCatalog::builtin());
        let clock = SelectionClock::new();
        let source = RacingSource {
            clock: &clock,
            records: records(),
            fetched: RefCell::new(Vec::new()),
        };
        let mut map = SvgMap::parse(MAP);
        let outcome = engine.select(&clock.begin(), "ukip", &source, &mut map).unwrap();
        assert!(matches!(outcome, Outcome::Stale));
        assert_eq!(source.fetched.borrow().as_slice(), ["ukip"]);
        assert_eq!(map.render(), MAP);
    }

    #[test]
    fn cancelled_before_fetch() {
        let engine = Choropleth::new(PartyCatalog::builtin());
        let clock = SelectionClock::new();
        let ticket = clock.begin();
        ticket.cancel();
        let mut map = SvgMap::parse(MAP);
        let outcome = engine.select(&ticket, "labour", &FailingSource, &mut map).unwrap();
        assert!(matches!(outcome, Outcome::Stale));
    }

    #[test]
    fn fetch_errors_propagate() {
        let engine = Choropleth::new(PartyCatalog::builtin());
        let clock = SelectionClock::new();
        let mut map = SvgMap::parse(MAP);
        assert!(engine.select(&clock.begin(), "labour", &FailingSource, &mut map).is_err());
    }

    #[test]
    fn demo_files() {
        let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
        let catalog = PartyCatalog::from_yaml(&demos.join("parties.yaml")).unwrap();
        let engine = Choropleth::new(catalog);
        let source = crate::dataset::JsonDirSource::new(demos.join("json/mock_data"));
        let svg = std::fs::read_to_string(demos.join("map.svg")).unwrap();
        let clock = SelectionClock::new();

        let mut map = SvgMap::parse(&svg);
        let outcome = engine.select(&clock.begin(), "plaid-cymru", &source, &mut map).unwrap();
        let Outcome::Rendered(rendering, report) = outcome else {
            panic!("plaid-cymru did not render");
        };
        // Newport East has no percentage and is skipped
        assert_eq!(report, PaintReport { painted: 4, unresolved: 0 });
        assert_eq!(rendering.legend.len(), 5);
        let plaid = engine.catalog().lookup("plaid-cymru").unwrap();
        assert_eq!(map.fill_of("arfon"), Some(plaid.stops[3]));
        assert_eq!(map.fill_of("newport-east"), None);

        let mut map = SvgMap::parse(&svg);
        engine.select(&clock.begin(), "labour", &source, &mut map).unwrap();
        assert_eq!(map.fill_of("newport-east"), Some(NO_DATA_COLOR));
        assert!(map.render().contains("style=\"fill:#C0C0C0\""));
    }

    #[test]
    fn empty_dataset() {
        let engine = Choropleth::new(PartyCatalog::builtin());
        let party = engine.catalog().lookup("green-party").unwrap();
        let rendering = engine.compute(party, &Dataset::default()).unwrap();
        assert_eq!(rendering.scale.domain(), (0.0, 0.0));
        assert!(rendering.paints.is_empty());
        assert_eq!(rendering.legend.len(), party.stops.len() + 1);
        assert!(rendering.legend[..party.stops.len()].iter().all(|e| e.label == "<0%"));
        assert_eq!(rendering.legend.last().unwrap().color, parse_color("#C0C0C0").unwrap());
    }
}
