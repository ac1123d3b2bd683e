//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{CollectionPage, DetailTab, Pokemon, Species};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Request the first page (and the start-up detail screen, if any)
    Init,

    // ===== List =====
    /// Result: a collection page arrived; `append` is false for the first page
    PageDidLoad { page: CollectionPage, append: bool },
    PageDidError { url: String, error: String },
    /// The list view reached its end
    ListLoadMore,
    ListSelect(usize),
    ListScroll(i16),

    // ===== Cards =====
    CardDidLoad { url: String, pokemon: Pokemon },
    CardDidError { url: String, error: String },
    SpriteDidLoad { url: String, sprite: SpriteData },
    SpriteDidError { url: String, error: String },

    // ===== Detail =====
    /// Navigate to the detail screen for an id or name
    DetailOpen(String),
    DetailClose,
    DetailTabSet(DetailTab),
    DetailTabToggle,
    /// Move the tab body by this many rows
    DetailScroll(i16),
    PokemonDidLoad { target: String, pokemon: Pokemon },
    PokemonDidError { target: String, error: String },
    SpeciesDidLoad { id: u32, species: Species },
    SpeciesDidError { id: u32, error: String },

    /// Spinner frame
    Tick,
    Quit,
}
