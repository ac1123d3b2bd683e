use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::pokemon_card::{render_sprite, type_spans};
use super::{
    Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::format::{
    format_height, format_id, format_name, format_stat_name, format_weight, spinner, stat_bar,
    stat_tier, stat_total, visible_moves, StatTier,
};
use crate::state::{AppState, DetailLoad, DetailState, DetailTab, Pokemon, Species};

pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load Pok\u{e9}mon details. Please try again.";

const STAT_BAR_WIDTH: u16 = 20;
const HEADER_HEIGHT: u16 = 10;
const PAGE_ROWS: i16 = 5;

pub struct PokemonDetailProps<'a> {
    pub state: &'a AppState,
    pub detail: &'a DetailState,
    pub is_focused: bool,
}

/// Detail screen for a single Pokemon.
pub struct PokemonDetail {
    status_bar: StatusBar,
}

impl Default for PokemonDetail {
    fn default() -> Self {
        Self {
            status_bar: StatusBar::new(),
        }
    }
}

impl PokemonDetail {
    pub fn new() -> Self {
        Self::default()
    }
}

fn tier_color(tier: StatTier) -> Color {
    match tier {
        StatTier::Low => ACCENT_RED,
        StatTier::Mid => ACCENT_GOLD,
        StatTier::High => Color::Rgb(120, 200, 80),
        StatTier::Top => ACCENT_TEAL,
    }
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(format!("{text:<8}"), Style::default().fg(TEXT_DIM))
}

/// About tab. Species fields stay blank until the species request lands.
pub fn about_text(pokemon: &Pokemon, species: Option<&Species>) -> Text<'static> {
    let color = species
        .and_then(|species| species.color.as_deref())
        .map(format_name)
        .unwrap_or_default();
    let description = species
        .and_then(|species| species.description.clone())
        .unwrap_or_default();

    let mut types = vec![label("Types")];
    types.extend(type_spans(&pokemon.types));

    let mut lines = vec![
        Line::from(vec![label("Height"), Span::raw(format_height(pokemon.height))]),
        Line::from(vec![label("Weight"), Span::raw(format_weight(pokemon.weight))]),
        Line::from(types),
        Line::from(vec![label("Color"), Span::raw(color)]),
    ];
    if !description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            description,
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    Text::from(lines)
}

pub fn stats_text(pokemon: &Pokemon) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = pokemon
        .stats
        .iter()
        .map(|stat| {
            let color = tier_color(stat_tier(stat.value));
            Line::from(vec![
                Span::styled(
                    format!("{:<8}", format_stat_name(&stat.name)),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::raw(format!("{:>3} ", stat.value)),
                Span::styled(stat_bar(stat.value, STAT_BAR_WIDTH), Style::default().fg(color)),
            ])
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled(format!("{:<8}", "Total"), Style::default().fg(TEXT_DIM)),
        Span::styled(
            format!("{:>3}", stat_total(&pokemon.stats)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));

    let (moves, hidden) = visible_moves(&pokemon.moves);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Moves",
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
    )));
    if moves.is_empty() {
        lines.push(Line::from(Span::styled("None", Style::default().fg(TEXT_DIM))));
    }
    lines.extend(moves.into_iter().map(|name| Line::from(format!("  {name}"))));
    if hidden > 0 {
        lines.push(Line::from(Span::styled(
            format!("+{hidden} more moves"),
            Style::default().fg(TEXT_DIM),
        )));
    }
    Text::from(lines)
}

fn render_centered(frame: &mut Frame, area: Rect, text: Text<'static>) {
    let height = (text.lines.len() as u16).min(area.height);
    let y = area.y + area.height.saturating_sub(height) / 2;
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        Rect { y, height, ..area },
    );
}

impl Component<Action> for PokemonDetail {
    type Props<'a> = PokemonDetailProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Backspace => Some(Action::DetailClose),
                KeyCode::Char('h') | KeyCode::Left => Some(Action::DetailTabSet(DetailTab::About)),
                KeyCode::Char('l') | KeyCode::Right => {
                    Some(Action::DetailTabSet(DetailTab::Stats))
                }
                KeyCode::Tab => Some(Action::DetailTabToggle),
                KeyCode::Char('j') | KeyCode::Down => Some(Action::DetailScroll(1)),
                KeyCode::Char('k') | KeyCode::Up => Some(Action::DetailScroll(-1)),
                KeyCode::PageDown => Some(Action::DetailScroll(PAGE_ROWS)),
                KeyCode::PageUp => Some(Action::DetailScroll(-PAGE_ROWS)),
                _ => None,
            },
            EventKind::Scroll { delta, .. } => Some(Action::DetailScroll((*delta * 3) as i16)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let PokemonDetailProps { state, detail, .. } = props;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let rows = Layout::vertical([
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("POKEMON")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(rows[0]);
        frame.render_widget(block, rows[0]);

        match &detail.load {
            DetailLoad::Loading => render_centered(
                frame,
                inner,
                Text::from(Line::from(Span::styled(
                    format!("Loading {} {}", detail.target, spinner(state.tick)),
                    Style::default().fg(TEXT_DIM),
                ))),
            ),
            DetailLoad::Failed(reason) => render_centered(
                frame,
                inner,
                Text::from(vec![
                    Line::from(Span::styled(
                        DETAIL_ERROR_MESSAGE,
                        Style::default()
                            .fg(ACCENT_RED)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(reason.clone(), Style::default().fg(TEXT_DIM))),
                ]),
            ),
            DetailLoad::Loaded(pokemon) => render_pokemon(frame, inner, state, detail, pokemon, None),
            DetailLoad::Complete(pokemon, species) => {
                render_pokemon(frame, inner, state, detail, pokemon, Some(species))
            }
        }

        <StatusBar as Component<Action>>::render(
            &mut self.status_bar,
            frame,
            rows[1],
            StatusBarProps {
                left: StatusBarSection::hints(&[
                    StatusBarHint::new("Esc", "back"),
                    StatusBarHint::new("h/l", "tabs"),
                    StatusBarHint::new("j/k", "scroll"),
                    StatusBarHint::new("q", "quit"),
                ]),
                center: StatusBarSection::empty(),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn render_pokemon(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    detail: &DetailState,
    pokemon: &Pokemon,
    species: Option<&Species>,
) {
    let rows = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(2), // Tabs
        Constraint::Min(1),
    ])
    .split(area);
    let header = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    let sprite = pokemon
        .sprite_url
        .as_deref()
        .and_then(|url| state.sprites.get(url));
    render_sprite(frame, header[0], sprite, state.tick);

    let mut title = vec![
        Line::from(Span::styled(
            format_id(pokemon.id),
            Style::default().fg(ACCENT_GOLD),
        )),
        Line::from(Span::styled(
            format_name(&pokemon.name),
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(type_spans(&pokemon.types)),
    ];
    if detail.species_pending() {
        title.push(Line::from(Span::styled(
            spinner(state.tick),
            Style::default().fg(TEXT_DIM),
        )));
    }
    let title_height = (title.len() as u16).min(header[1].height);
    let title_area = Rect {
        y: header[1].y + header[1].height.saturating_sub(title_height) / 2,
        height: title_height,
        ..header[1]
    };
    frame.render_widget(Paragraph::new(title), title_area);

    let tabs = Tabs::new(vec![DetailTab::About.title(), DetailTab::Stats.title()])
        .select(detail.tab.index())
        .style(Style::default().fg(TEXT_DIM))
        .highlight_style(
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, rows[1]);

    let content = match detail.tab {
        DetailTab::About => about_text(pokemon, species),
        DetailTab::Stats => stats_text(pokemon),
    };
    frame.render_widget(
        Paragraph::new(content)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: true })
            .scroll((detail.scroll, 0)),
        rows[2],
    );
}
