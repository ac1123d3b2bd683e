use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::DataResource;

use super::{Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::format::{format_id, format_name, spinner};
use crate::sprite::{sprite_text, SpriteData};
use crate::state::{PageEntry, Pokemon};

pub fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "electric" => Color::Rgb(248, 208, 48),
        "grass" => Color::Rgb(120, 200, 80),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => TEXT_DIM,
    }
}

pub(crate) fn type_spans(types: &[String]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(types.len() * 2);
    for name in types {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{name}]"),
            Style::default().fg(type_color(name)),
        ));
    }
    spans
}

/// One list row: `#001 Bulbasaur [grass] [poison]`, or a placeholder while
/// the card is still loading (or failed).
pub fn card_line(
    entry: &PageEntry,
    card: Option<&DataResource<Pokemon>>,
    tick: u64,
) -> Line<'static> {
    let id = entry
        .id
        .map(format_id)
        .unwrap_or_else(|| "#???".to_string());
    let mut spans = vec![
        Span::styled(id, Style::default().fg(ACCENT_GOLD)),
        Span::raw(" "),
        Span::raw(format_name(&entry.name)),
    ];
    match card {
        Some(DataResource::Loaded(pokemon)) => spans.extend(type_spans(&pokemon.types)),
        Some(DataResource::Loading) => spans.push(Span::styled(
            format!(" {}", spinner(tick)),
            Style::default().fg(TEXT_DIM),
        )),
        _ => {}
    }
    Line::from(spans)
}

pub struct PokemonCardProps<'a> {
    pub entry: Option<&'a PageEntry>,
    pub card: Option<&'a DataResource<Pokemon>>,
    pub sprite: Option<&'a DataResource<SpriteData>>,
    pub tick: u64,
}

/// Preview pane for the selected list entry.
#[derive(Default)]
pub struct PokemonCard;

impl Component<Action> for PokemonCard {
    type Props<'a> = PokemonCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("PREVIEW")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(entry) = props.entry else {
            frame.render_widget(
                Paragraph::new("[no pokemon]")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                inner,
            );
            return;
        };

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Sprite
            Constraint::Length(1), // Name
            Constraint::Length(1), // Types
        ])
        .split(inner);

        render_sprite(frame, chunks[0], props.sprite, props.tick);

        let id = entry.id.map(format_id).unwrap_or_default();
        let name_line = Line::from(vec![
            Span::styled(id, Style::default().fg(ACCENT_GOLD)),
            Span::raw(" "),
            Span::styled(
                format_name(&entry.name),
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(name_line).alignment(Alignment::Center),
            chunks[1],
        );

        let types_line = match props.card {
            Some(DataResource::Loaded(pokemon)) => Line::from(type_spans(&pokemon.types)),
            Some(DataResource::Failed(_)) => Line::from(Span::styled(
                "unavailable",
                Style::default().fg(ACCENT_RED),
            )),
            _ => Line::from(Span::styled(
                spinner(props.tick),
                Style::default().fg(TEXT_DIM),
            )),
        };
        frame.render_widget(
            Paragraph::new(types_line).alignment(Alignment::Center),
            chunks[2],
        );
    }
}

/// Half-block sprite centered in `area`, or a bracketed placeholder.
pub(crate) fn render_sprite(
    frame: &mut Frame,
    area: Rect,
    sprite: Option<&DataResource<SpriteData>>,
    tick: u64,
) {
    if let Some(DataResource::Loaded(sprite)) = sprite {
        let (cols, rows) = sprite.fit(area.width, area.height);
        let target = Rect {
            x: area.x + area.width.saturating_sub(cols) / 2,
            y: area.y + area.height.saturating_sub(rows) / 2,
            width: cols,
            height: rows,
        };
        frame.render_widget(Paragraph::new(sprite_text(sprite, cols, rows)), target);
        return;
    }

    let content = match sprite {
        Some(DataResource::Loading) => format!("[loading sprite {}]", spinner(tick)),
        _ => "[no sprite]".to_string(),
    };
    let y = area.y + area.height.saturating_sub(1) / 2;
    let line_area = Rect {
        y,
        height: area.height.min(1),
        ..area
    };
    frame.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM)),
        line_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn bulbasaur() -> Pokemon {
        Pokemon {
            id: 1,
            name: "bulbasaur".into(),
            height: 7,
            weight: 69,
            types: vec!["grass".into(), "poison".into()],
            stats: Vec::new(),
            moves: Vec::new(),
            sprite_url: None,
        }
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn card_line_shows_id_name_and_types() {
        let entry = PageEntry::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/");
        let card = DataResource::Loaded(bulbasaur());

        let line = card_line(&entry, Some(&card), 0);

        assert_eq!(line_text(&line), "#001 Bulbasaur [grass] [poison]");
    }

    #[test]
    fn card_line_failed_keeps_placeholder() {
        let entry = PageEntry::new("ditto", "https://pokeapi.co/api/v2/pokemon/132/");
        let card = DataResource::Failed("fetch failed".into());

        let line = card_line(&entry, Some(&card), 0);

        assert_eq!(line_text(&line), "#132 Ditto");
    }

    #[test]
    fn preview_renders_selected_entry() {
        let mut render = RenderHarness::new(30, 12);
        let mut component = PokemonCard;
        let entry = PageEntry::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/");
        let card = DataResource::Loaded(bulbasaur());

        let output = render.render_to_string_plain(|frame| {
            let props = PokemonCardProps {
                entry: Some(&entry),
                card: Some(&card),
                sprite: None,
                tick: 0,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("#001 Bulbasaur"));
        assert!(output.contains("[grass] [poison]"));
        assert!(output.contains("[no sprite]"));
    }
}
