//! Effects - side effects declared by the reducer

/// Task key for the detail screen's primary resource request.
pub const DETAIL_TASK: &str = "detail_pokemon";
/// Task key for the detail screen's species request.
pub const SPECIES_TASK: &str = "detail_species";

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadPage { url: String, append: bool },
    LoadCard { url: String },
    LoadSprite { url: String },
    LoadPokemon { target: String, url: String },
    LoadSpecies { id: u32, url: String },
    /// Drop in-flight detail requests when the screen goes away
    CancelDetail,
}
