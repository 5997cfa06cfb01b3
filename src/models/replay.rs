//! The decoded replay as a whole.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{null_as_default, EliminationEvent, Player, PlayerId};

/// Replay header information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayInfo {
    /// Length of the recording in milliseconds
    #[serde(rename = "LengthInMs", default, deserialize_with = "null_as_default")]
    pub length_in_ms: u64,
}

/// Match-level data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    /// When the match started; absent for some truncated recordings
    #[serde(
        rename = "UtcTimeStartedMatch",
        default,
        deserialize_with = "lenient_utc"
    )]
    pub utc_time_started_match: Option<DateTime<Utc>>,
}

/// The typed view of a decoded replay that report building works on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    #[serde(rename = "Info", default, deserialize_with = "null_as_default")]
    pub info: ReplayInfo,

    #[serde(rename = "GameData", default, deserialize_with = "null_as_default")]
    pub game_data: GameData,

    /// Every player record, NPCs included, in decoder order
    #[serde(rename = "PlayerData", default, deserialize_with = "null_as_default")]
    pub players: Vec<Player>,

    /// Elimination events in decoder order
    #[serde(rename = "Eliminations", default, deserialize_with = "null_as_default")]
    pub eliminations: Vec<EliminationEvent>,
}

impl Replay {
    /// First player record with the given id, NPCs included.
    ///
    /// An empty id never matches.
    pub fn find_player(&self, id: &PlayerId) -> Option<&Player> {
        if id.is_empty() {
            return None;
        }
        self.players.iter().find(|p| &p.id == id)
    }
}

/// A decoded replay together with the document it was decoded from.
///
/// The document is kept untouched so exports reproduce every field the
/// decoder emitted, including the ones the typed model ignores.
#[derive(Debug, Clone)]
pub struct DecodedReplay {
    pub replay: Replay,
    pub document: serde_json::Value,
}

impl DecodedReplay {
    pub fn from_document(document: serde_json::Value) -> Result<Self, serde_json::Error> {
        let replay = Replay::deserialize(&document)?;
        Ok(Self { replay, document })
    }

    /// Build from a typed replay; the document is its serialized form.
    pub fn from_replay(replay: Replay) -> Result<Self, serde_json::Error> {
        let document = serde_json::to_value(&replay)?;
        Ok(Self { replay, document })
    }

    /// Pretty-printed export of the original document.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(&self.document)
    }

    /// Write the pretty-printed export to `path`, returning the bytes written.
    pub fn export_to(&self, path: &Path) -> std::io::Result<usize> {
        let json = self.to_pretty_json()?;
        std::fs::write(path, &json)?;
        Ok(json.len())
    }
}

/// Accept RFC 3339 timestamps as well as offset-less ones (taken as UTC).
fn lenient_utc<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| serde::de::Error::custom(format!("invalid match start '{}': {}", raw, e)))
}
