use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use super::{
    card_line, Component, PokemonCard, PokemonCardProps, ACCENT_GOLD, ACCENT_TEAL, BG_BASE,
    BG_HIGHLIGHT, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::format::spinner;
use crate::state::AppState;

pub struct PokemonListProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// List screen: paginated entries, a preview of the selection and a help bar.
pub struct PokemonList {
    list: SelectList,
    preview: PokemonCard,
    status_bar: StatusBar,
}

impl Default for PokemonList {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
            preview: PokemonCard,
            status_bar: StatusBar::new(),
        }
    }
}

impl PokemonList {
    pub fn new() -> Self {
        Self::default()
    }
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn list_status(state: &AppState) -> String {
    let count = state.list.entries.len();
    if state.list.loading {
        format!("Loading {}", spinner(state.tick))
    } else if state.list.next.is_none() && count > 0 {
        format!("All {count} loaded")
    } else {
        format!("{count} shown")
    }
}

impl Component<Action> for PokemonList {
    type Props<'a> = PokemonListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let list = &props.state.list;

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Enter => list
                    .selected_entry()
                    .map(|entry| Action::DetailOpen(entry.target()))
                    .into_iter()
                    .collect(),
                KeyCode::Char('n') => vec![Action::ListLoadMore],
                _ => {
                    let items: Vec<_> = list
                        .entries
                        .iter()
                        .map(|entry| {
                            card_line(entry, props.state.cards.get(&entry.url), props.state.tick)
                        })
                        .collect();
                    let list_props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: list.selected.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::ListSelect,
                        render_item: &|item| item.clone(),
                    };
                    self.list.handle_event(event, list_props).into_iter().collect()
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::ListScroll((*delta * 3) as i16)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let rows = Layout::vertical([
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Help bar
        ])
        .split(area);
        let columns = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("POKEDEX ({})", state.list.entries.len()))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(if props.is_focused {
                Style::default().fg(ACCENT_TEAL)
            } else {
                Style::default().fg(TEXT_DIM)
            });
        let inner = block.inner(columns[0]);
        frame.render_widget(block, columns[0]);

        if state.list.entries.is_empty() {
            let message = if state.list.loading {
                format!("Loading Pokedex {}", spinner(state.tick))
            } else {
                "No Pokemon loaded.".to_string()
            };
            frame.render_widget(
                Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                inner,
            );
        } else {
            let items: Vec<_> = state
                .list
                .entries
                .iter()
                .map(|entry| card_line(entry, state.cards.get(&entry.url), state.tick))
                .collect();
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: state.list.selected.min(items.len().saturating_sub(1)),
                is_focused: props.is_focused,
                style: list_style(),
                behavior: SelectListBehavior {
                    show_scrollbar: true,
                    wrap_navigation: false,
                },
                on_select: Action::ListSelect,
                render_item: &|item| item.clone(),
            };
            self.list.render(frame, inner, list_props);
        }

        let entry = state.list.selected_entry();
        let card = entry.and_then(|entry| state.cards.get(&entry.url));
        let sprite_url = card
            .and_then(|card| card.data())
            .and_then(|pokemon| pokemon.sprite_url.as_deref());
        self.preview.render(
            frame,
            columns[1],
            PokemonCardProps {
                entry,
                card,
                sprite: sprite_url.and_then(|url| state.sprites.get(url)),
                tick: state.tick,
            },
        );

        let status = list_status(state);
        let status_items = [StatusBarItem::span(Span::styled(
            status.as_str(),
            Style::default().fg(ACCENT_GOLD),
        ))];
        <StatusBar as Component<Action>>::render(
            &mut self.status_bar,
            frame,
            rows[1],
            StatusBarProps {
                left: StatusBarSection::hints(&[
                    StatusBarHint::new("j/k", "move"),
                    StatusBarHint::new("Enter", "open"),
                    StatusBarHint::new("n", "more"),
                    StatusBarHint::new("q", "quit"),
                ]),
                center: StatusBarSection::empty(),
                right: StatusBarSection::items(&status_items),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
