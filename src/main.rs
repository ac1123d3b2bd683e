//! Pokedex TUI - paginated PokeAPI browser

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tracing::{debug, info, warn};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api;
use pokedex::components::{
    Component, PokemonDetail, PokemonDetailProps, PokemonList, PokemonListProps,
};
use pokedex::config::{Args, Config};
use pokedex::effect::{Effect, DETAIL_TASK, SPECIES_TASK};
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::sprite;
use pokedex::state::{AppState, Screen, SPINNER_TICK_MS};

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokeComponentId {
    List,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokeContext {
    List,
    Detail,
}

fn component_for(state: &AppState) -> PokeComponentId {
    match state.screen() {
        Screen::List => PokeComponentId::List,
        Screen::Detail => PokeComponentId::Detail,
    }
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        Some(component_for(self))
    }

    fn modal(&self) -> Option<PokeComponentId> {
        None
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::List => PokeContext::List,
            PokeComponentId::Detail => PokeContext::Detail,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::List
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let (config, debug_args) = Args::parse().into_parts();
    logging::init(&config.log_file)?;
    info!(api_base = %config.api_base, page_size = config.page_size, "starting pokedex");

    run(config, debug_args).await
}

async fn run(config: Config, debug_args: DebugCliArgs) -> io::Result<()> {
    let debug = DebugSession::new(debug_args);

    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(&config))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    info!("pokedex exited");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct PokeUi {
    list: PokemonList,
    detail: PokemonDetail,
}

impl PokeUi {
    fn new() -> Self {
        Self {
            list: PokemonList::new(),
            detail: PokemonDetail::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        match state.detail.as_ref() {
            Some(detail) => {
                event_ctx.component_areas.remove(&PokeComponentId::List);
                event_ctx.set_component_area(PokeComponentId::Detail, area);
                let props = PokemonDetailProps {
                    state,
                    detail,
                    is_focused: render_ctx.is_focused(),
                };
                self.detail.render(frame, area, props);
            }
            None => {
                event_ctx.component_areas.remove(&PokeComponentId::Detail);
                event_ctx.set_component_area(PokeComponentId::List, area);
                let props = PokemonListProps {
                    state,
                    is_focused: render_ctx.is_focused(),
                };
                self.list.render(frame, area, props);
            }
        }
    }

    fn handle_list_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        if state.screen() != Screen::List {
            return HandlerResponse::ignored();
        }
        let props = PokemonListProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.list.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(detail) = state.detail.as_ref() else {
            return HandlerResponse::ignored();
        };
        let props = PokemonDetailProps {
            state,
            detail,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(PokeComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokeComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        EventKind::Key(key) => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning keyed tasks; every task reports back as an action.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadPage { url, append } => {
            ctx.tasks().spawn(TaskKey::new("page"), async move {
                match api::fetch_page(&url).await {
                    Ok(page) => {
                        debug!(%url, entries = page.results.len(), "page loaded");
                        Action::PageDidLoad { page, append }
                    }
                    Err(err) => {
                        warn!(%url, error = %err, "page fetch failed");
                        Action::PageDidError {
                            url,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadCard { url } => {
            let key = format!("card_{url}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_pokemon(&url).await {
                    Ok(pokemon) => Action::CardDidLoad { url, pokemon },
                    Err(err) => {
                        warn!(%url, error = %err, "card fetch failed");
                        Action::CardDidError {
                            url,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadSprite { url } => {
            let key = format!("sprite_{url}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let decoded = match api::fetch_bytes(&url).await {
                    Ok(bytes) => sprite::decode_sprite(&bytes),
                    Err(err) => Err(err.to_string()),
                };
                match decoded {
                    Ok(sprite) => Action::SpriteDidLoad { url, sprite },
                    Err(error) => {
                        warn!(%url, %error, "sprite unavailable");
                        Action::SpriteDidError { url, error }
                    }
                }
            });
        }
        Effect::LoadPokemon { target, url } => {
            ctx.tasks().spawn(TaskKey::new(DETAIL_TASK), async move {
                match api::fetch_pokemon(&url).await {
                    Ok(pokemon) => {
                        debug!(%target, id = pokemon.id, "pokemon loaded");
                        Action::PokemonDidLoad { target, pokemon }
                    }
                    Err(err) => {
                        warn!(%target, error = %err, "pokemon fetch failed");
                        Action::PokemonDidError {
                            target,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadSpecies { id, url } => {
            ctx.tasks().spawn(TaskKey::new(SPECIES_TASK), async move {
                match api::fetch_species(&url).await {
                    Ok(species) => {
                        debug!(id, "species loaded");
                        Action::SpeciesDidLoad { id, species }
                    }
                    Err(err) => {
                        warn!(id, error = %err, "species fetch failed");
                        Action::SpeciesDidError {
                            id,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::CancelDetail => {
            ctx.tasks().cancel(&TaskKey::new(DETAIL_TASK));
            ctx.tasks().cancel(&TaskKey::new(SPECIES_TASK));
        }
    }
}
