//! Match report engine.
//!
//! Derives everything shown for a replay from the decoded records:
//! - Roster statistics (participants, humans, bots)
//! - The selected player's eliminations in decoder order
//! - Who eliminated the selected player, if anyone
//! - The player's outcome
//!
//! Reports are recomputed on every request; nothing here is cached.

mod render;

pub use render::*;

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{MatchClock, Player, PlayerId, Replay};

/// Opponent name used when an event references an id missing from the roster.
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown";

/// Which player a report is about.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    NoSelection,
    Selected(&'a Player),
}

impl<'a> From<Option<&'a Player>> for Selection<'a> {
    fn from(player: Option<&'a Player>) -> Self {
        match player {
            Some(p) => Selection::Selected(p),
            None => Selection::NoSelection,
        }
    }
}

/// Participant counts for a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    pub total: usize,
    pub humans: usize,
    pub bots: usize,
}

impl RosterStats {
    pub fn from_players(players: &[&Player]) -> Self {
        let total = players.len();
        let humans = players.iter().filter(|p| !p.is_bot).count();
        Self {
            total,
            humans,
            bots: total - humans,
        }
    }
}

/// Start, end and length of the recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchTiming {
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub length_ms: u64,
    /// Length as `MM:SS`, minutes not capped at 59
    pub duration: String,
}

impl MatchTiming {
    pub fn from_replay(replay: &Replay) -> Self {
        let length_ms = replay.info.length_in_ms;
        let started_at = replay.game_data.utc_time_started_match;
        let ended_at = started_at.and_then(|start| {
            let length = Duration::milliseconds(i64::try_from(length_ms).ok()?);
            start.checked_add_signed(length)
        });
        Self {
            started_at,
            ended_at,
            length_ms,
            duration: format_match_length(length_ms),
        }
    }
}

/// How the selected player's match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    #[serde(rename = "victory")]
    Victory,
    #[serde(rename = "eliminated")]
    Eliminated,
    /// The recording stopped before the player was eliminated or won.
    #[serde(rename = "no result yet")]
    NoResultYet,
}

impl Outcome {
    pub fn derive(was_eliminated: bool, placement: Option<u32>) -> Self {
        if was_eliminated {
            Outcome::Eliminated
        } else if placement == Some(1) {
            Outcome::Victory
        } else {
            Outcome::NoResultYet
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Victory => "victory",
            Outcome::Eliminated => "eliminated",
            Outcome::NoResultYet => "no result yet",
        }
    }
}

/// One elimination seen from the selected player's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EliminationRecord {
    /// 1-based position in the player's elimination list
    pub index: usize,
    /// Event time with the offset applied
    pub time: MatchClock,
    pub opponent_id: PlayerId,
    pub opponent_name: String,
    pub opponent_is_bot: bool,
    pub opponent_cosmetic: Option<String>,
}

/// Narrative for the selected player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerReport {
    pub player_id: PlayerId,
    pub player_name: String,
    pub is_bot: bool,
    pub cosmetic: Option<String>,
    pub placement: Option<u32>,
    pub eliminations: Vec<EliminationRecord>,
    pub eliminated_by: Option<EliminationRecord>,
    pub outcome: Outcome,
}

impl PlayerReport {
    pub fn elimination_count(&self) -> usize {
        self.eliminations.len()
    }
}

/// Everything derived for one (player, offset) request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub timing: MatchTiming,
    pub roster: RosterStats,
    pub player: Option<PlayerReport>,
}

impl MatchReport {
    /// Distinct cosmetic ids referenced by the report, sorted.
    pub fn cosmetic_ids(&self) -> Vec<String> {
        let Some(player) = &self.player else {
            return Vec::new();
        };
        let mut ids = BTreeSet::new();
        ids.extend(player.cosmetic.iter().cloned());
        for record in player.eliminations.iter().chain(player.eliminated_by.iter()) {
            ids.extend(record.opponent_cosmetic.iter().cloned());
        }
        ids.into_iter().collect()
    }
}

/// Real participants, in source order.
pub fn filter_players(players: &[Player]) -> Vec<&Player> {
    players.iter().filter(|p| p.is_participant()).collect()
}

/// Participants ordered by display name, ignoring case.
///
/// Roster indices handed to clients refer to this order. Names equal up to
/// case fall back to a byte-wise compare, then to source order.
pub fn sorted_roster(replay: &Replay) -> Vec<&Player> {
    let mut roster = filter_players(&replay.players);
    roster.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    roster
}

/// Rank with an English ordinal suffix.
///
/// Single digits get a leading space so columns line up (" 1st", "10th").
/// Zero and negative numbers are returned without a suffix.
pub fn format_ordinal(n: i64) -> String {
    if n <= 0 {
        return n.to_string();
    }
    let pad = if n < 10 { " " } else { "" };
    let suffix = match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{}{}{}", pad, n, suffix)
}

/// Recording length as `MM:SS` with total minutes.
pub fn format_match_length(length_ms: u64) -> String {
    let total_secs = length_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Build the report for `selection`, shifting event times by `offset_secs`.
pub fn build_report(replay: &Replay, selection: Selection<'_>, offset_secs: i64) -> MatchReport {
    let roster = RosterStats::from_players(&filter_players(&replay.players));
    let player = match selection {
        Selection::NoSelection => None,
        Selection::Selected(player) => Some(build_player_report(replay, player, offset_secs)),
    };

    MatchReport {
        timing: MatchTiming::from_replay(replay),
        roster,
        player,
    }
}

fn build_player_report(replay: &Replay, player: &Player, offset_secs: i64) -> PlayerReport {
    let lookup = PlayerLookup::new(&replay.players);
    // A player without an id cannot be matched against any event.
    let has_id = !player.id.is_empty();

    let eliminations: Vec<EliminationRecord> = replay
        .eliminations
        .iter()
        .filter(|e| has_id && e.eliminator == player.id)
        .enumerate()
        .map(|(i, e)| lookup.record(i + 1, e.time.shifted(offset_secs), &e.eliminated))
        .collect();

    // A player dies at most once; later duplicates in the feed are ignored.
    let eliminated_by = replay
        .eliminations
        .iter()
        .find(|e| has_id && e.eliminated == player.id)
        .map(|e| lookup.record(1, e.time.shifted(offset_secs), &e.eliminator));

    let outcome = Outcome::derive(eliminated_by.is_some(), player.placement);

    PlayerReport {
        player_id: player.id.clone(),
        player_name: player.name.clone(),
        is_bot: player.is_bot,
        cosmetic: player.cosmetics.character.clone(),
        placement: player.placement,
        eliminations,
        eliminated_by,
        outcome,
    }
}

/// Id index over the full player table (NPCs included), first record wins.
///
/// Records without an id are left out, so an empty id always misses.
struct PlayerLookup<'a> {
    by_id: HashMap<&'a PlayerId, &'a Player>,
}

impl<'a> PlayerLookup<'a> {
    fn new(players: &'a [Player]) -> Self {
        let mut by_id = HashMap::with_capacity(players.len());
        for p in players.iter().filter(|p| !p.id.is_empty()) {
            by_id.entry(&p.id).or_insert(p);
        }
        Self { by_id }
    }

    fn record(&self, index: usize, time: MatchClock, opponent: &PlayerId) -> EliminationRecord {
        match self.by_id.get(opponent) {
            Some(p) => EliminationRecord {
                index,
                time,
                opponent_id: opponent.clone(),
                opponent_name: p.name.clone(),
                opponent_is_bot: p.is_bot,
                opponent_cosmetic: p.cosmetics.character.clone(),
            },
            None => EliminationRecord {
                index,
                time,
                opponent_id: opponent.clone(),
                opponent_name: UNKNOWN_PLAYER_NAME.to_string(),
                opponent_is_bot: false,
                opponent_cosmetic: None,
            },
        }
    }
}
