//! # Replay Report
//!
//! Match statistics and elimination timelines for decoded battle-royale
//! replays.
//!
//! ## Architecture
//!
//! - **models**: Decoded replay records (players, eliminations, match clock)
//! - **decode**: Boundary to the external replay decoder
//! - **report**: Report engine (roster stats, eliminations, outcome) and text rendering
//! - **session**: Upload sessions held by the HTTP API
//! - **cosmetics**: Optional cosmetic name lookup
//! - **api**: REST API endpoints and the companion web page
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod cosmetics;
pub mod decode;
pub mod models;
pub mod report;
pub mod session;

pub use models::*;

/// Interpret a player argument as a roster index, then as an id, then as a
/// display name (case-insensitive).
pub fn find_roster_player<'a>(roster: &[&'a Player], query: &str) -> Option<&'a Player> {
    let query = query.trim();
    if let Ok(index) = query.parse::<usize>() {
        if let Some(p) = roster.get(index) {
            return Some(*p);
        }
    }
    let id = PlayerId::new(query);
    roster
        .iter()
        .find(|p| p.id == id)
        .or_else(|| roster.iter().find(|p| p.name.eq_ignore_ascii_case(query)))
        .copied()
}
