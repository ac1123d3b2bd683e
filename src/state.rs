//! Application state - single source of truth

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::api;
use crate::config::Config;
use crate::format;
use crate::sprite::SpriteData;

/// Rows from the end of the list at which the next page is requested.
pub const LOAD_MORE_THRESHOLD: usize = 3;

/// Spinner cadence for loading indicators.
pub const SPINNER_TICK_MS: u64 = 120;

/// One `(name, detail_url)` pair from the listing endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageEntry {
    pub name: String,
    pub url: String,
    pub id: Option<u32>,
}

impl PageEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            id: api::pokemon_id_from_url(&url),
            url,
        }
    }

    /// Navigation target for the detail screen.
    pub fn target(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => self.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CollectionPage {
    pub results: Vec<PageEntry>,
    pub next: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonStat {
    pub name: String,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub moves: Vec<String>,
    pub sprite_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Species {
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Detail screen fetch pipeline: the species request only starts once the
/// primary resource has arrived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum DetailLoad {
    Loading,
    Loaded(Pokemon),
    Complete(Pokemon, Species),
    Failed(String),
}

impl DetailLoad {
    pub fn pokemon(&self) -> Option<&Pokemon> {
        match self {
            DetailLoad::Loaded(pokemon) | DetailLoad::Complete(pokemon, _) => Some(pokemon),
            DetailLoad::Loading | DetailLoad::Failed(_) => None,
        }
    }

    pub fn species(&self) -> Option<&Species> {
        match self {
            DetailLoad::Complete(_, species) => Some(species),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailLoad::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DetailLoad::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DetailTab {
    #[default]
    About,
    Stats,
}

impl DetailTab {
    pub fn toggle(self) -> Self {
        match self {
            DetailTab::About => DetailTab::Stats,
            DetailTab::Stats => DetailTab::About,
        }
    }

    pub fn index(self) -> usize {
        match self {
            DetailTab::About => 0,
            DetailTab::Stats => 1,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::About => "About",
            DetailTab::Stats => "Stats",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailState {
    /// Identifier the screen was opened with (numeric id or name).
    pub target: String,
    pub load: DetailLoad,
    pub tab: DetailTab,
    /// First visible row of the tab body.
    #[serde(default)]
    pub scroll: u16,
    pub species_error: Option<String>,
}

impl DetailState {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            load: DetailLoad::Loading,
            tab: DetailTab::default(),
            scroll: 0,
            species_error: None,
        }
    }

    /// Species fields are blank rather than missing while this holds.
    pub fn species_pending(&self) -> bool {
        matches!(self.load, DetailLoad::Loaded(_)) && self.species_error.is_none()
    }

    /// Rows in the active tab body before wrapping.
    pub fn body_lines(&self) -> usize {
        let Some(pokemon) = self.load.pokemon() else {
            return 0;
        };
        match self.tab {
            DetailTab::About => {
                let described = self
                    .load
                    .species()
                    .and_then(|species| species.description.as_deref())
                    .is_some_and(|text| !text.is_empty());
                if described {
                    6
                } else {
                    4
                }
            }
            DetailTab::Stats => {
                let (moves, hidden) = format::visible_moves(&pokemon.moves);
                // stats, total, blank, heading, moves, overflow
                pokemon.stats.len() + 3 + moves.len().max(1) + usize::from(hidden > 0)
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListState {
    pub entries: Vec<PageEntry>,
    /// Continuation URL; `None` once the collection is exhausted.
    pub next: Option<String>,
    pub loading: bool,
    pub selected: usize,
}

impl ListState {
    pub fn selected_entry(&self) -> Option<&PageEntry> {
        self.entries.get(self.selected)
    }

    pub fn near_end(&self) -> bool {
        self.selected + LOAD_MORE_THRESHOLD >= self.entries.len()
    }

    pub fn can_load_more(&self) -> bool {
        !self.loading && self.next.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub api_base: String,
    pub page_size: u16,

    pub list: ListState,
    /// Card summaries keyed by detail URL.
    pub cards: HashMap<String, DataResource<Pokemon>>,
    /// Decoded sprites keyed by sprite URL.
    pub sprites: HashMap<String, DataResource<SpriteData>>,
    /// Present while the detail screen is shown.
    pub detail: Option<DetailState>,

    pub tick: u64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            list: ListState::default(),
            cards: HashMap::new(),
            sprites: HashMap::new(),
            detail: config.start_pokemon.clone().map(DetailState::new),
            tick: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.detail.is_some() {
            Screen::Detail
        } else {
            Screen::List
        }
    }

    pub fn card(&self, url: &str) -> Option<&Pokemon> {
        self.cards.get(url).and_then(|card| card.data())
    }

    pub fn selected_card(&self) -> Option<&Pokemon> {
        let entry = self.list.selected_entry()?;
        self.card(&entry.url)
    }

    pub fn sprite(&self, url: Option<&str>) -> Option<&SpriteData> {
        url.and_then(|url| self.sprites.get(url))
            .and_then(|sprite| sprite.data())
    }

    pub fn is_busy(&self) -> bool {
        self.list.loading
            || self.cards.values().any(DataResource::is_loading)
            || self.sprites.values().any(DataResource::is_loading)
            || self
                .detail
                .as_ref()
                .map(|detail| detail.load.is_loading() || detail.species_pending())
                .unwrap_or(false)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let detail_status = self.detail.as_ref().map(|detail| match &detail.load {
            DetailLoad::Loading => "loading".to_string(),
            DetailLoad::Loaded(_) => "loaded (species pending)".to_string(),
            DetailLoad::Complete(_, _) => "complete".to_string(),
            DetailLoad::Failed(reason) => format!("failed: {reason}"),
        });
        let cards_loaded = self.cards.values().filter(|card| card.is_loaded()).count();
        vec![
            DebugSection::new("List")
                .entry("entries", ron_string(&self.list.entries.len()))
                .entry("selected", ron_string(&self.list.selected))
                .entry("next", ron_string(&self.list.next))
                .entry("loading", ron_string(&self.list.loading)),
            DebugSection::new("Cards")
                .entry("requested", ron_string(&self.cards.len()))
                .entry("loaded", ron_string(&cards_loaded))
                .entry("sprites", ron_string(&self.sprites.len())),
            DebugSection::new("Detail")
                .entry(
                    "target",
                    ron_string(&self.detail.as_ref().map(|detail| detail.target.clone())),
                )
                .entry("status", ron_string(&detail_status))
                .entry(
                    "tab",
                    ron_string(&self.detail.as_ref().map(|detail| detail.tab)),
                ),
        ]
    }
}
