//! Plain-text rendering of a match report.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::{format_ordinal, EliminationRecord, MatchReport, Outcome, PlayerReport};
use crate::models::kind_label;

/// Host details appended to reports when enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os: String,
    pub arch: String,
    pub logical_cpus: usize,
}

impl PlatformInfo {
    /// Describe the machine this process runs on.
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            logical_cpus: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions<'a> {
    /// Cosmetic id -> display name; ids without an entry are shown raw
    pub cosmetic_names: Option<&'a HashMap<String, String>>,
    pub platform: Option<PlatformInfo>,
}

/// Render a report in the layout players paste into chats and forums.
pub fn render_report(report: &MatchReport, options: &RenderOptions<'_>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, report, options);
    out
}

fn write_report(
    out: &mut String,
    report: &MatchReport,
    options: &RenderOptions<'_>,
) -> std::fmt::Result {
    let timing = &report.timing;
    let roster = &report.roster;

    writeln!(out, "========= Match Data ============")?;
    writeln!(out, "Started : {}", format_instant(timing.started_at))?;
    writeln!(out, "Ended : {}", format_instant(timing.ended_at))?;
    writeln!(out, "Duration : {}", timing.duration)?;
    writeln!(
        out,
        "Total Players: {}(Humans : {} / Bots : {})",
        roster.total, roster.humans, roster.bots
    )?;

    if let Some(player) = &report.player {
        writeln!(out)?;
        write_player(out, player, options)?;
    }

    if let Some(platform) = &options.platform {
        writeln!(out)?;
        writeln!(out, "========= Platform ===============")?;
        writeln!(out, "OS : {}", platform.os)?;
        writeln!(out, "Architecture : {}", platform.arch)?;
        writeln!(out, "Logical CPUs : {}", platform.logical_cpus)?;
    }

    Ok(())
}

fn write_player(
    out: &mut String,
    player: &PlayerReport,
    options: &RenderOptions<'_>,
) -> std::fmt::Result {
    writeln!(out, "========= Player Results =========")?;
    writeln!(
        out,
        "Player : {}{} ({}) eliminated {} players.",
        player.player_name,
        cosmetic_tag(player.cosmetic.as_deref(), options),
        kind_label(player.is_bot),
        player.elimination_count()
    )?;
    writeln!(out)?;

    for record in &player.eliminations {
        writeln!(
            out,
            "{}: {} - {}",
            format_ordinal(record.index as i64),
            record.time,
            opponent(record, options)
        )?;
    }
    if !player.eliminations.is_empty() {
        writeln!(out)?;
    }

    match (&player.eliminated_by, player.outcome) {
        (Some(death), _) => writeln!(
            out,
            "{} was eliminated by {} at {} (Placement: {})",
            player.player_name,
            opponent(death, options),
            death.time,
            player
                .placement
                .map(|p| format_ordinal(i64::from(p)))
                .unwrap_or_else(|| "unknown".to_string())
        ),
        (None, Outcome::Victory) => writeln!(out, "{} won the game!", player.player_name),
        (None, _) => writeln!(out, "The replay ended before the match ends."),
    }
}

fn opponent(record: &EliminationRecord, options: &RenderOptions<'_>) -> String {
    format!(
        "{}{} ({})",
        record.opponent_name,
        cosmetic_tag(record.opponent_cosmetic.as_deref(), options),
        kind_label(record.opponent_is_bot)
    )
}

fn cosmetic_tag(cosmetic: Option<&str>, options: &RenderOptions<'_>) -> String {
    let Some(id) = cosmetic.filter(|id| !id.is_empty()) else {
        return String::new();
    };
    let name = options
        .cosmetic_names
        .and_then(|names| names.get(id).or_else(|| names.get(&id.to_lowercase())))
        .map(String::as_str)
        .unwrap_or(id);
    format!("[{}]", name)
}

fn format_instant(instant: Option<DateTime<Utc>>) -> String {
    instant
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
