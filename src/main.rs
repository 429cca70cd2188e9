use anyhow::{Context, Result, anyhow};
use choropleth::color::to_css;
use choropleth::file::write_atomic;
use choropleth::legend::{self, LegendAppearance};
use choropleth::{Choropleth, JsonDirSource, Outcome, PartyCatalog, SelectionClock, SvgMap};
use clap::Parser;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "paint election results onto an SVG constituency map")]
pub struct Args {
    #[clap(help = "party slug, e.g. \"labour\"", required_unless_present = "list")]
    pub party: Option<String>,

    #[clap(short = 'd', long, help = "directory holding <slug>_mock_data.json files", default_value = "json/mock_data")]
    pub data: PathBuf,

    #[clap(short = 'm', long, help = "blank SVG map with regions tagged by class", required_unless_present = "list")]
    pub map: Option<PathBuf>,

    #[clap(short = 'o', long, help = "output filename of the painted map", default_value = "out.svg")]
    pub output: PathBuf,

    #[clap(short = 'l', long, help = "also render the legend to this SVG file")]
    pub legend: Option<PathBuf>,

    #[clap(short = 'c', long, help = "party catalog in YAML, replacing the builtin one")]
    pub catalog: Option<PathBuf>,

    #[clap(short = 'f', long, help = "create directory if missing")]
    pub create_missing_dir: bool,

    #[clap(long, help = "print the party catalog and exit")]
    pub list: bool,
}

fn print_args(args: &[String]) {
    let args = args
        .iter()
        .map(|x| if x.contains(' ') { format!("\"{x}\"") } else { x.to_string() })
        .collect::<Vec<_>>();
    let args = args.join(" ");
    log::info!("args: {args}");
}

fn print_catalog(catalog: &PartyCatalog) {
    for party in catalog.parties() {
        let stops = party.stops.iter().map(|&c| to_css(c)).collect::<Vec<_>>();
        println!("{}\t{}\t{}\t{}", party.slug, party.name, to_css(party.color), stops.join(","));
    }
}

fn run(args: &Args) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => PartyCatalog::from_yaml(path)?,
        None => PartyCatalog::builtin(),
    };
    if args.list {
        print_catalog(&catalog);
        return Ok(());
    }
    let (Some(slug), Some(map_path)) = (&args.party, &args.map) else {
        return Err(anyhow!("party and map are required"));
    };

    let svg = std::fs::read_to_string(map_path).with_context(|| format!("failed to read {}", map_path.display()))?;
    let mut map = SvgMap::parse(&svg);
    let source = JsonDirSource::new(&args.data);
    let engine = Choropleth::new(catalog);
    let clock = SelectionClock::new();

    match engine.select(&clock.begin(), slug, &source, &mut map)? {
        Outcome::Rendered(rendering, _) => {
            write_atomic(&args.output, &map.render(), args.create_missing_dir)?;
            if let Some(path) = &args.legend {
                let title = engine.catalog().lookup(&rendering.slug).map(|p| p.name.as_str());
                let svg = legend::render_svg(&rendering.legend, title, &LegendAppearance::default())?;
                write_atomic(path, &svg, args.create_missing_dir)?;
            }
            for entry in &rendering.legend {
                log::info!("legend: {} {}", to_css(entry.color), entry.label);
            }
            Ok(())
        }
        Outcome::UnknownParty => Err(anyhow!("unknown party {slug:?}; see --list")),
        Outcome::Stale => Err(anyhow!("selection of {slug:?} was superseded")),
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    print_args(&std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
