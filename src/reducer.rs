//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::api;
use crate::effect::Effect;
use crate::state::{AppState, CollectionPage, DetailLoad, DetailState};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let mut effects = Vec::new();
            if state.list.entries.is_empty() && !state.list.loading {
                state.list.loading = true;
                effects.push(Effect::LoadPage {
                    url: api::first_page_url(&state.api_base, state.page_size),
                    append: false,
                });
            }
            if let Some(detail) = state.detail.as_ref() {
                if detail.load.is_loading() {
                    effects.push(Effect::LoadPokemon {
                        target: detail.target.clone(),
                        url: api::pokemon_url(&state.api_base, &detail.target),
                    });
                }
            }
            changed_with(effects)
        }

        // ===== List =====
        Action::PageDidLoad { page, append } => {
            let CollectionPage { results, next } = page;
            state.list.loading = false;
            if append {
                state.list.entries.extend(results);
            } else {
                state.list.entries = results;
                state.list.selected = 0;
            }
            state.list.next = next;

            let mut effects = card_effects(state);
            effects.extend(selected_sprite_effect(state));
            changed_with(effects)
        }

        Action::PageDidError { .. } => {
            if !state.list.loading {
                return DispatchResult::unchanged();
            }
            state.list.loading = false;
            DispatchResult::changed()
        }

        Action::ListLoadMore => match load_more_effect(state) {
            Some(effect) => DispatchResult::changed_with(effect),
            None => DispatchResult::unchanged(),
        },

        Action::ListSelect(index) => select_index(state, index),

        Action::ListScroll(delta) => {
            let index = (state.list.selected as i64 + delta as i64).max(0) as usize;
            select_index(state, index)
        }

        // ===== Cards =====
        Action::CardDidLoad { url, pokemon } => {
            let Some(card) = state.cards.get_mut(&url) else {
                return DispatchResult::unchanged();
            };
            *card = DataResource::Loaded(pokemon);
            let selected = state
                .list
                .selected_entry()
                .map(|entry| entry.url == url)
                .unwrap_or(false);
            if selected {
                if let Some(effect) = selected_sprite_effect(state) {
                    return DispatchResult::changed_with(effect);
                }
            }
            DispatchResult::changed()
        }

        Action::CardDidError { url, error } => {
            let Some(card) = state.cards.get_mut(&url) else {
                return DispatchResult::unchanged();
            };
            *card = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { url, sprite } => {
            state.sprites.insert(url, DataResource::Loaded(sprite));
            DispatchResult::changed()
        }

        Action::SpriteDidError { url, error } => {
            state.sprites.insert(url, DataResource::Failed(error));
            DispatchResult::changed()
        }

        // ===== Detail =====
        Action::DetailOpen(target) => {
            let target = target.trim().to_string();
            if target.is_empty() {
                return DispatchResult::unchanged();
            }
            if let Some(detail) = state.detail.as_ref() {
                if detail.target == target && detail.load.error().is_none() {
                    return DispatchResult::unchanged();
                }
            }
            let mut effects = Vec::new();
            if state.detail.is_some() {
                effects.push(Effect::CancelDetail);
            }
            effects.push(Effect::LoadPokemon {
                target: target.clone(),
                url: api::pokemon_url(&state.api_base, &target),
            });
            state.detail = Some(DetailState::new(target));
            changed_with(effects)
        }

        Action::DetailClose => {
            if state.detail.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(Effect::CancelDetail)
        }

        Action::DetailTabSet(tab) => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if detail.tab == tab {
                return DispatchResult::unchanged();
            }
            detail.tab = tab;
            detail.scroll = 0;
            DispatchResult::changed()
        }

        Action::DetailTabToggle => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            detail.tab = detail.tab.toggle();
            detail.scroll = 0;
            DispatchResult::changed()
        }

        Action::DetailScroll(delta) => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            let max = detail.body_lines().saturating_sub(1) as i64;
            let scroll = (i64::from(detail.scroll) + i64::from(delta)).clamp(0, max) as u16;
            if scroll == detail.scroll {
                return DispatchResult::unchanged();
            }
            detail.scroll = scroll;
            DispatchResult::changed()
        }

        Action::PokemonDidLoad { target, pokemon } => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if detail.target != target || !detail.load.is_loading() {
                return DispatchResult::unchanged();
            }
            let id = pokemon.id;
            let sprite_url = pokemon.sprite_url.clone();
            detail.load = DetailLoad::Loaded(pokemon);

            let mut effects = vec![Effect::LoadSpecies {
                id,
                url: api::species_url(&state.api_base, id),
            }];
            effects.extend(sprite_effect(state, sprite_url));
            DispatchResult::changed_with_many(effects)
        }

        Action::PokemonDidError { target, error } => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if detail.target != target || !detail.load.is_loading() {
                return DispatchResult::unchanged();
            }
            detail.load = DetailLoad::Failed(error);
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad { id, species } => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if !awaiting_species(&detail.load, id) {
                return DispatchResult::unchanged();
            }
            if let DetailLoad::Loaded(pokemon) =
                std::mem::replace(&mut detail.load, DetailLoad::Loading)
            {
                detail.load = DetailLoad::Complete(pokemon, species);
            }
            detail.species_error = None;
            DispatchResult::changed()
        }

        Action::SpeciesDidError { id, error } => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if !awaiting_species(&detail.load, id) {
                return DispatchResult::unchanged();
            }
            detail.species_error = Some(error);
            DispatchResult::changed()
        }

        Action::Tick => {
            if !state.is_busy() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn changed_with(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn awaiting_species(load: &DetailLoad, id: u32) -> bool {
    matches!(load, DetailLoad::Loaded(pokemon) if pokemon.id == id)
}

fn select_index(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    if state.list.entries.is_empty() {
        return DispatchResult::unchanged();
    }
    let bounded = index.min(state.list.entries.len() - 1);
    let moved = bounded != state.list.selected;
    state.list.selected = bounded;

    let mut effects = Vec::new();
    if moved {
        effects.extend(selected_sprite_effect(state));
    }
    if state.list.near_end() {
        effects.extend(load_more_effect(state));
    }

    if !moved && effects.is_empty() {
        return DispatchResult::unchanged();
    }
    changed_with(effects)
}

fn load_more_effect(state: &mut AppState) -> Option<Effect> {
    if !state.list.can_load_more() {
        return None;
    }
    let url = state.list.next.clone()?;
    state.list.loading = true;
    Some(Effect::LoadPage { url, append: true })
}

/// Card requests for listed entries that have none yet.
fn card_effects(state: &mut AppState) -> Vec<Effect> {
    let missing: Vec<String> = state
        .list
        .entries
        .iter()
        .filter(|entry| !state.cards.contains_key(&entry.url))
        .map(|entry| entry.url.clone())
        .collect();
    missing
        .into_iter()
        .map(|url| {
            state.cards.insert(url.clone(), DataResource::Loading);
            Effect::LoadCard { url }
        })
        .collect()
}

fn selected_sprite_effect(state: &mut AppState) -> Option<Effect> {
    let url = state
        .selected_card()
        .and_then(|pokemon| pokemon.sprite_url.clone());
    sprite_effect(state, url)
}

fn sprite_effect(state: &mut AppState, url: Option<String>) -> Option<Effect> {
    let url = url?;
    if state.sprites.contains_key(&url) {
        return None;
    }
    state.sprites.insert(url.clone(), DataResource::Loading);
    Some(Effect::LoadSprite { url })
}
