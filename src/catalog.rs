// @file catalog.rs
// @brief registry of parties, their brand colors and choropleth color stops

use crate::color::{parse_color, parse_colors};
use anyhow::{Context, Result, anyhow};
use hex_color::HexColor;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct Party {
    pub name: String,
    pub slug: String,
    pub color: HexColor,
    /// Low end first.
    pub stops: Vec<HexColor>,
}

// YAML form: colors as hex strings
#[derive(Debug, Deserialize)]
struct PartyConfig {
    name: String,
    slug: String,
    color: String,
    stops: Vec<String>,
}

impl PartyConfig {
    fn to_party(&self) -> Result<Party> {
        let stops = parse_colors(&self.stops).with_context(|| format!("in stops of {}", self.slug))?;
        if stops.is_empty() {
            return Err(anyhow!("party {} has no color stops", self.slug));
        }
        Ok(Party {
            name: self.name.clone(),
            slug: self.slug.clone(),
            color: parse_color(&self.color).with_context(|| format!("in brand color of {}", self.slug))?,
            stops,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CatalogConfig {
    parties: Vec<PartyConfig>,
}

const BUILTIN: [(&str, &str, &str, [&str; 6]); 7] = [
    (
        "Conservatives",
        "conservatives",
        "#0087DC",
        ["#FFFFFF", "#F8E7C6", "#CEF190", "#9BED76", "#2DE3AE", "#0087DC"],
    ),
    (
        "Green Party",
        "green-party",
        "#75A92D",
        ["#FFFFFF", "#EDD4CA", "#DCC09B", "#CBBE71", "#ABBA4C", "#75A92D"],
    ),
    (
        "Labour",
        "labour",
        "#D50000",
        ["#FFFFFF", "#fee5d9", "#fcbba1", "#fc9272", "#fb6a4a", "#D50000"],
    ),
    (
        "Liberal Democrats",
        "liberal-democrats",
        "#FE8300",
        ["#FFFFFF", "#B4B5FE", "#87EFFE", "#5AFE83", "#ADFE2D", "#FE8300"],
    ),
    (
        "Plaid Cymru",
        "plaid-cymru",
        "#3E8424",
        ["#FFFFFF", "#E6D0C4", "#CDBB91", "#B2B566", "#799C41", "#3E8424"],
    ),
    (
        "Scottish National Party",
        "scottish-national-party",
        "#EBC31C",
        ["#FFFFFF", "#FBD5CE", "#F7BC9F", "#F3B072", "#EFB346", "#EBC31C"],
    ),
    (
        "UK Independence Party",
        "ukip",
        "#800080",
        ["#FFFFFF", "#E5E5B7", "#7ACC7A", "#47B2B2", "#316BA6", "#800080"],
    ),
];

/// Read-only party table, in definition order, looked up by slug.
#[derive(Clone, Debug)]
pub struct PartyCatalog {
    parties: Vec<Party>,
    index: HashMap<String, usize>,
}

impl PartyCatalog {
    pub fn new(parties: Vec<Party>) -> Result<PartyCatalog> {
        let mut index = HashMap::new();
        for (i, party) in parties.iter().enumerate() {
            if party.stops.is_empty() {
                return Err(anyhow!("party {} has no color stops", party.slug));
            }
            if index.insert(party.slug.clone(), i).is_some() {
                return Err(anyhow!("duplicate party slug: {}", party.slug));
            }
        }
        Ok(PartyCatalog { parties, index })
    }

    /// The parties of the 2015 general election results site.
    pub fn builtin() -> PartyCatalog {
        let parties = BUILTIN
            .iter()
            .map(|(name, slug, color, stops)| PartyConfig {
                name: name.to_string(),
                slug: slug.to_string(),
                color: color.to_string(),
                stops: stops.iter().map(|s| s.to_string()).collect(),
            })
            .map(|config| config.to_party())
            .collect::<Result<Vec<_>>>();
        // the table above is fixed; a failure here is a typo in it
        PartyCatalog::new(parties.expect("builtin party table is valid")).expect("builtin party slugs are unique")
    }

    pub fn from_yaml_str(yaml: &str) -> Result<PartyCatalog> {
        let config: CatalogConfig = serde_yaml::from_str(yaml).context("failed to parse party catalog")?;
        let parties = config.parties.iter().map(|p| p.to_party()).collect::<Result<Vec<_>>>()?;
        PartyCatalog::new(parties)
    }

    pub fn from_yaml(path: &Path) -> Result<PartyCatalog> {
        let yaml = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let catalog = Self::from_yaml_str(&yaml).with_context(|| format!("in {}", path.display()))?;
        log::info!("loaded {} parties from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// `None` for a slug that is not in the table.
    pub fn lookup(&self, slug: &str) -> Option<&Party> {
        self.index.get(slug).map(|&i| &self.parties[i])
    }

    pub fn parties(&self) -> impl Iterator<Item = &Party> {
        self.parties.iter()
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}
