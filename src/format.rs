//! Display formatting shared by the list and detail screens.

use crate::state::PokemonStat;

/// Highest base stat any Pokemon can have; stat bars are scaled against it.
pub const MAX_BASE_STAT: u32 = 255;

/// Moves listed on the stats tab before collapsing into a "+N more" line.
pub const MOVES_SHOWN: usize = 15;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatTier {
    Low,
    Mid,
    High,
    Top,
}

pub fn format_id(id: u32) -> String {
    format!("#{id:03}")
}

pub fn format_height(decimetres: u32) -> String {
    format!("{:.1} m", decimetres as f32 / 10.0)
}

pub fn format_weight(hectograms: u32) -> String {
    format!("{:.1} kg", hectograms as f32 / 10.0)
}

pub fn format_stat_name(name: &str) -> String {
    match name {
        "hp" => "HP",
        "attack" => "Attack",
        "defense" => "Defense",
        "special-attack" => "Sp. Atk",
        "special-defense" => "Sp. Def",
        "speed" => "Speed",
        other => other,
    }
    .to_string()
}

/// `"thunder-punch"` -> `"Thunder Punch"`
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn stat_total(stats: &[PokemonStat]) -> u32 {
    stats.iter().map(|stat| stat.value).sum()
}

/// Filled share of a stat bar, in percent.
pub fn stat_percent(value: u32) -> u16 {
    (value.min(MAX_BASE_STAT) * 100 / MAX_BASE_STAT) as u16
}

pub fn stat_tier(value: u32) -> StatTier {
    match value {
        0..=49 => StatTier::Low,
        50..=79 => StatTier::Mid,
        80..=119 => StatTier::High,
        _ => StatTier::Top,
    }
}

pub fn stat_bar(value: u32, width: u16) -> String {
    let filled = (stat_percent(value) as usize * width as usize) / 100;
    let filled = filled.max(usize::from(value > 0)).min(width as usize);
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width as usize - filled)
    )
}

/// First [`MOVES_SHOWN`] moves plus how many were left out.
pub fn visible_moves(moves: &[String]) -> (Vec<String>, usize) {
    let shown = moves
        .iter()
        .take(MOVES_SHOWN)
        .map(|name| format_name(name))
        .collect();
    (shown, moves.len().saturating_sub(MOVES_SHOWN))
}

pub fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}
