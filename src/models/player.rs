//! Player records as emitted by the decoder.

use serde::{Deserialize, Serialize};

use super::{null_as_default, PlayerId};

/// Lowest team index held by a real participant.
///
/// The decoder puts NPCs and environment actors on team 2 and players on
/// team 3 or above. Revisit if the decoder's team layout changes.
pub const MIN_PARTICIPANT_TEAM_INDEX: i32 = 3;

/// Cosmetic loadout of a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cosmetics {
    /// Character (outfit) id, e.g. "CID_A_123_Athena_Commando_F"
    #[serde(rename = "Character", default)]
    pub character: Option<String>,
}

/// One entry of the decoder's player table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "PlayerId", default, deserialize_with = "null_as_default")]
    pub id: PlayerId,

    #[serde(rename = "PlayerName", default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "IsBot", default, deserialize_with = "null_as_default")]
    pub is_bot: bool,

    #[serde(rename = "TeamIndex", default, deserialize_with = "null_as_default")]
    pub team_index: i32,

    /// Final rank; absent when the replay stops before the player is placed
    #[serde(rename = "Placement", default)]
    pub placement: Option<u32>,

    #[serde(rename = "Cosmetics", default, deserialize_with = "null_as_default")]
    pub cosmetics: Cosmetics,
}

impl Player {
    pub fn new(id: &str, name: &str, team_index: i32) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.to_string(),
            is_bot: false,
            team_index,
            placement: None,
            cosmetics: Cosmetics::default(),
        }
    }

    /// Builder method to mark the player as a bot.
    pub fn with_bot(mut self, is_bot: bool) -> Self {
        self.is_bot = is_bot;
        self
    }

    /// Builder method to set the final placement.
    pub fn with_placement(mut self, placement: u32) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Builder method to set the character cosmetic.
    pub fn with_character(mut self, character: &str) -> Self {
        self.cosmetics.character = Some(character.to_string());
        self
    }

    /// Whether this record is a real participant rather than an NPC.
    pub fn is_participant(&self) -> bool {
        self.team_index >= MIN_PARTICIPANT_TEAM_INDEX
    }

    /// "bot" or "human".
    pub fn kind_label(&self) -> &'static str {
        kind_label(self.is_bot)
    }

    /// Roster label shown in player pickers: `name: id - bot|human`.
    pub fn roster_label(&self) -> String {
        format!("{}: {} - {}", self.name, self.id, self.kind_label())
    }
}

pub fn kind_label(is_bot: bool) -> &'static str {
    if is_bot {
        "bot"
    } else {
        "human"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_threshold() {
        assert!(!Player::new("a", "npc", 0).is_participant());
        assert!(!Player::new("a", "npc", 2).is_participant());
        assert!(Player::new("a", "p", 3).is_participant());
        assert!(Player::new("a", "p", 57).is_participant());
    }

    #[test]
    fn test_roster_label() {
        let p = Player::new("abc", "Jonesy", 3).with_bot(true);
        assert_eq!(p.roster_label(), "Jonesy: ABC - bot");
        let p = Player::new("def", "Ramirez", 4);
        assert_eq!(p.roster_label(), "Ramirez: DEF - human");
    }

    #[test]
    fn test_deserialize_decoder_record() {
        let json = r#"{
            "PlayerId": "3f2a9c",
            "PlayerName": "Jonesy",
            "IsBot": false,
            "TeamIndex": 5,
            "Placement": 12,
            "Cosmetics": { "Character": "CID_001", "Backpack": "BID_002" },
            "Kills": 3
        }"#;
        let p: Player = serde_json::from_str(json).unwrap();
        assert_eq!(p.id.as_str(), "3F2A9C");
        assert_eq!(p.name, "Jonesy");
        assert_eq!(p.team_index, 5);
        assert_eq!(p.placement, Some(12));
        assert_eq!(p.cosmetics.character.as_deref(), Some("CID_001"));
    }

    #[test]
    fn test_deserialize_nulls_as_defaults() {
        let json = r#"{
            "PlayerId": null,
            "PlayerName": null,
            "IsBot": null,
            "TeamIndex": 2,
            "Placement": null,
            "Cosmetics": null
        }"#;
        let p: Player = serde_json::from_str(json).unwrap();
        assert!(p.id.is_empty());
        assert_eq!(p.name, "");
        assert!(!p.is_bot);
        assert_eq!(p.placement, None);
        assert_eq!(p.cosmetics, Cosmetics::default());
    }
}
