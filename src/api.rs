//! PokeAPI client

use std::sync::OnceLock;

use serde::Deserialize;

use crate::cache::RequestCache;
use crate::state::{CollectionPage, PageEntry, Pokemon, PokemonStat, Species};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

/// Every failure collapses into a "fetch failed" condition for the UI; the
/// variants only exist so the log says which stage broke.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("fetch failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("fetch failed: {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("fetch failed: malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    results: Vec<NamedResource>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    moves: Vec<PokemonMoveSlot>,
    sprites: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

#[derive(Debug, Deserialize)]
struct SpeciesResponse {
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextEntry>,
    color: Option<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
}

// ============================================================================
// Endpoints
// ============================================================================

pub fn first_page_url(base: &str, limit: u16) -> String {
    format!("{}/pokemon?limit={limit}&offset=0", base.trim_end_matches('/'))
}

/// Resource URL for a numeric id or a name. The trailing slash matches the
/// URLs the listing endpoint hands out, so both share a cache slot.
pub fn pokemon_url(base: &str, target: &str) -> String {
    format!(
        "{}/pokemon/{}/",
        base.trim_end_matches('/'),
        target.trim().to_lowercase()
    )
}

pub fn species_url(base: &str, id: u32) -> String {
    format!("{}/pokemon-species/{id}/", base.trim_end_matches('/'))
}

/// Numeric identifier from the trailing path segment of a detail URL.
pub fn pokemon_id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

// ============================================================================
// Parsing
// ============================================================================

pub fn parse_page(bytes: &[u8]) -> Result<CollectionPage, ApiError> {
    let response: PageResponse = serde_json::from_slice(bytes)?;
    Ok(CollectionPage {
        results: response
            .results
            .into_iter()
            .map(|entry| PageEntry::new(entry.name, entry.url))
            .collect(),
        next: response.next.filter(|next| !next.is_empty()),
    })
}

pub fn parse_pokemon(bytes: &[u8]) -> Result<Pokemon, ApiError> {
    let response: PokemonResponse = serde_json::from_slice(bytes)?;
    let sprite_url = pointer_string(
        &response.sprites,
        "/versions/generation-i/red-blue/front_default",
    )
    .or_else(|| pointer_string(&response.sprites, "/front_default"));

    Ok(Pokemon {
        id: response.id,
        name: response.name,
        height: response.height,
        weight: response.weight,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| PokemonStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        moves: response
            .moves
            .into_iter()
            .map(|slot| slot.move_info.name)
            .collect(),
        sprite_url,
    })
}

pub fn parse_species(bytes: &[u8]) -> Result<Species, ApiError> {
    let response: SpeciesResponse = serde_json::from_slice(bytes)?;
    let description = response
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| sanitize_text(&entry.flavor_text));
    Ok(Species {
        description,
        color: response.color.map(|color| color.name),
    })
}

fn sanitize_text(text: &str) -> String {
    text.replace(['\n', '\u{000C}'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

// ============================================================================
// Fetching
// ============================================================================

pub async fn fetch_page(url: &str) -> Result<CollectionPage, ApiError> {
    let bytes = fetch_bytes(url).await?;
    parse_page(&bytes)
}

/// Resource fetches are shared: concurrent cards and the detail screen asking
/// for the same URL resolve from a single request.
pub async fn fetch_pokemon(url: &str) -> Result<Pokemon, ApiError> {
    pokemon_cache()
        .get_or_fetch(url, || async {
            let bytes = fetch_bytes(url).await?;
            parse_pokemon(&bytes)
        })
        .await
}

pub async fn fetch_species(url: &str) -> Result<Species, ApiError> {
    let bytes = fetch_bytes(url).await?;
    parse_species(&bytes)
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ApiError> {
    let response = http_client().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn pokemon_cache() -> &'static RequestCache<Pokemon> {
    static CACHE: OnceLock<RequestCache<Pokemon>> = OnceLock::new();
    CACHE.get_or_init(RequestCache::new)
}
