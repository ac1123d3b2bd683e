//! Store flows driven through EffectStoreTestHarness: pagination, the detail
//! fetch pipeline and stale results.

use tui_dispatch::testing::*;
use tui_dispatch::EffectStore;
use pokedex::{
    action::Action,
    effect::Effect,
    reducer::reducer,
    state::{AppState, CollectionPage, DetailLoad, DetailTab, PageEntry, Pokemon, Species},
};

const BULBASAUR_URL: &str = "https://pokeapi.co/api/v2/pokemon/1/";
const NEXT_URL: &str = "https://pokeapi.co/api/v2/pokemon/?offset=20";

fn first_page() -> CollectionPage {
    CollectionPage {
        results: vec![PageEntry::new("bulbasaur", BULBASAUR_URL)],
        next: Some(NEXT_URL.into()),
    }
}

fn page_of(ids: std::ops::Range<u32>, next: Option<String>) -> CollectionPage {
    CollectionPage {
        results: ids
            .map(|id| {
                PageEntry::new(
                    format!("mon-{id}"),
                    format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
                )
            })
            .collect(),
        next,
    }
}

fn pokemon(id: u32, name: &str) -> Pokemon {
    Pokemon {
        id,
        name: name.into(),
        height: 7,
        weight: 69,
        types: vec!["grass".into(), "poison".into()],
        stats: Vec::new(),
        moves: Vec::new(),
        sprite_url: Some(format!("https://sprites.test/{id}.png")),
    }
}

// ============================================================================
// List
// ============================================================================

#[test]
fn first_page_shows_one_card_then_load_more_appends() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.list.loading);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPage { append: false, .. }));

    harness.dispatch_collect(Action::PageDidLoad {
        page: first_page(),
        append: false,
    });
    harness.assert_state(|s| s.list.entries.len() == 1);
    harness.assert_state(|s| s.list.entries[0].id == Some(1));
    harness.assert_state(|s| s.list.entries[0].target() == "1");
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadCard { url } if url == BULBASAUR_URL));

    harness.dispatch_collect(Action::ListLoadMore);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::LoadPage { url, append: true } if url == NEXT_URL),
    );

    harness.dispatch_collect(Action::PageDidLoad {
        page: page_of(2..22, None),
        append: true,
    });
    harness.assert_state(|s| s.list.entries.len() == 21);
    harness.assert_state(|s| s.list.entries[0].name == "bulbasaur");
    harness.assert_state(|s| s.list.next.is_none());
}

#[test]
fn load_more_grows_list_until_next_is_absent() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::PageDidLoad {
        page: page_of(1..4, Some("https://pokeapi.co/api/v2/pokemon?offset=3".into())),
        append: false,
    });

    let mut previous = store.state().list.entries.len();
    for round in 1..=3u32 {
        let result = store.dispatch(Action::ListLoadMore);
        assert_eq!(result.effects.len(), 1, "round {round} should request a page");

        let start = 1 + round * 3;
        let next = (round < 3)
            .then(|| format!("https://pokeapi.co/api/v2/pokemon?offset={}", start + 2));
        store.dispatch(Action::PageDidLoad {
            page: page_of(start..start + 3, next),
            append: true,
        });

        let len = store.state().list.entries.len();
        assert!(len > previous, "list must strictly grow");
        previous = len;
    }

    let result = store.dispatch(Action::ListLoadMore);
    assert!(!result.changed);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().list.entries.len(), 12);
}

#[test]
fn selecting_near_the_end_requests_next_page() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::PageDidLoad {
        page: page_of(1..11, Some(NEXT_URL.into())),
        append: false,
    });

    let early = store.dispatch(Action::ListSelect(2));
    assert!(early
        .effects
        .iter()
        .all(|e| !matches!(e, Effect::LoadPage { .. })));

    let late = store.dispatch(Action::ListSelect(8));
    assert!(late
        .effects
        .iter()
        .any(|e| matches!(e, Effect::LoadPage { append: true, .. })));
    assert!(store.state().list.loading);
}

#[test]
fn scrolling_past_the_end_requests_next_page_once() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::PageDidLoad {
        page: page_of(1..11, Some(NEXT_URL.into())),
        append: false,
    });
    store.dispatch(Action::ListSelect(9));
    store.dispatch(Action::PageDidError {
        url: NEXT_URL.into(),
        error: "fetch failed: HTTP 503".into(),
    });
    assert_eq!(store.state().list.selected, 9);
    assert!(!store.state().list.loading);

    let scrolled = store.dispatch(Action::ListScroll(3));
    assert_eq!(
        scrolled.effects,
        vec![Effect::LoadPage {
            url: NEXT_URL.into(),
            append: true
        }]
    );
    assert!(store.state().list.loading);
    assert_eq!(store.state().list.selected, 9);

    let again = store.dispatch(Action::ListScroll(3));
    assert!(!again.changed);
    assert!(again.effects.is_empty());
}

#[test]
fn selected_card_requests_its_sprite_once() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::PageDidLoad {
        page: first_page(),
        append: false,
    });

    let result = store.dispatch(Action::CardDidLoad {
        url: BULBASAUR_URL.into(),
        pokemon: pokemon(1, "bulbasaur"),
    });
    assert_eq!(
        result.effects,
        vec![Effect::LoadSprite {
            url: "https://sprites.test/1.png".into()
        }]
    );
    assert!(store.state().selected_card().is_some());

    let again = store.dispatch(Action::ListSelect(0));
    assert!(again
        .effects
        .iter()
        .all(|e| !matches!(e, Effect::LoadSprite { .. })));
}

#[test]
fn card_errors_are_swallowed() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::PageDidLoad {
        page: first_page(),
        append: false,
    });

    let result = store.dispatch(Action::CardDidError {
        url: BULBASAUR_URL.into(),
        error: "fetch failed".into(),
    });

    assert!(result.effects.is_empty());
    assert!(store.state().cards[BULBASAUR_URL].is_failed());
    assert_eq!(store.state().list.entries.len(), 1);
}

// ============================================================================
// Detail
// ============================================================================

#[test]
fn detail_pipeline_issues_species_after_primary() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::DetailOpen("1".into()));
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPokemon { target, .. } if target == "1"));

    harness.dispatch_collect(Action::PokemonDidLoad {
        target: "1".into(),
        pokemon: pokemon(1, "bulbasaur"),
    });
    harness.assert_state(|s| s.detail.as_ref().is_some_and(|d| d.species_pending()));
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::LoadSpecies { id: 1, .. }));

    harness.complete_action(Action::SpeciesDidLoad {
        id: 1,
        species: Species {
            description: Some("A strange seed was planted on its back at birth.".into()),
            color: Some("green".into()),
        },
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);
    harness.assert_state(|s| {
        matches!(
            s.detail.as_ref().map(|d| &d.load),
            Some(DetailLoad::Complete(_, _))
        )
    });
}

#[test]
fn failed_primary_never_emits_species() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::DetailOpen("missingno".into()));
    harness.drain_effects();

    harness.dispatch_collect(Action::PokemonDidError {
        target: "missingno".into(),
        error: "fetch failed: HTTP 404".into(),
    });

    harness.assert_state(|s| {
        s.detail
            .as_ref()
            .and_then(|d| d.load.error())
            .is_some_and(|e| e.contains("404"))
    });
    let effects = harness.drain_effects();
    effects.effects_none_match(|e| matches!(e, Effect::LoadSpecies { .. }));
}

#[test]
fn species_failure_keeps_primary_data() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::DetailOpen("1".into()));
    store.dispatch(Action::PokemonDidLoad {
        target: "1".into(),
        pokemon: pokemon(1, "bulbasaur"),
    });

    store.dispatch(Action::SpeciesDidError {
        id: 1,
        error: "fetch failed".into(),
    });

    let detail = store.state().detail.as_ref().unwrap();
    assert_eq!(detail.load.pokemon().map(|p| p.name.as_str()), Some("bulbasaur"));
    assert!(detail.load.species().is_none());
    assert!(!detail.species_pending());
}

#[test]
fn closing_detail_cancels_and_drops_late_results() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::DetailOpen("25".into()));

    let close = store.dispatch(Action::DetailClose);
    assert_eq!(close.effects, vec![Effect::CancelDetail]);

    let late = store.dispatch(Action::PokemonDidLoad {
        target: "25".into(),
        pokemon: pokemon(25, "pikachu"),
    });
    assert!(!late.changed);
    assert!(store.state().detail.is_none());
}

#[test]
fn results_for_a_different_target_are_ignored() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::DetailOpen("4".into()));

    let stray = store.dispatch(Action::PokemonDidLoad {
        target: "1".into(),
        pokemon: pokemon(1, "bulbasaur"),
    });
    assert!(!stray.changed);

    store.dispatch(Action::PokemonDidLoad {
        target: "4".into(),
        pokemon: pokemon(4, "charmander"),
    });
    let stray_species = store.dispatch(Action::SpeciesDidLoad {
        id: 1,
        species: Species::default(),
    });
    assert!(!stray_species.changed);
    assert!(store.state().detail.as_ref().unwrap().species_pending());
}

#[test]
fn tab_switching_is_idempotent_and_effect_free() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::DetailOpen("1".into()));

    for tab in [DetailTab::Stats, DetailTab::Stats, DetailTab::About, DetailTab::About] {
        let result = store.dispatch(Action::DetailTabSet(tab));
        assert!(result.effects.is_empty());
        assert_eq!(store.state().detail.as_ref().unwrap().tab, tab);
    }

    let toggled = store.dispatch(Action::DetailTabToggle);
    assert!(toggled.effects.is_empty());
    assert_eq!(store.state().detail.as_ref().unwrap().tab, DetailTab::Stats);
}

#[test]
fn empty_target_does_not_open_detail() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let result = store.dispatch(Action::DetailOpen("   ".into()));

    assert!(!result.changed);
    assert!(store.state().detail.is_none());
}

#[test]
fn queued_completions_process_in_order() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::DetailOpen("1".into()));
    harness.drain_effects();

    harness.complete_action(Action::PokemonDidLoad {
        target: "1".into(),
        pokemon: pokemon(1, "bulbasaur"),
    });
    harness.complete_action(Action::DetailTabSet(DetailTab::Stats));
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 2);
    assert_eq!(changed, 2);
    harness.assert_state(|s| s.detail.as_ref().is_some_and(|d| d.tab == DetailTab::Stats));
    harness.assert_state(|s| s.detail.as_ref().is_some_and(|d| d.load.pokemon().is_some()));
}
