//! Replay decoding seam.
//!
//! Reading the binary replay container is the job of an external decoder.
//! This module defines the boundary it plugs into and ships a decoder for the
//! decoder's JSON dump, which is also what the export endpoint produces.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::models::DecodedReplay;

/// Errors that can occur while decoding an uploaded replay.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("replay file is empty")]
    Empty,

    #[error("malformed replay document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns raw replay bytes into a decoded replay.
pub trait ReplayDecoder: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Decode a whole replay held in memory.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedReplay, DecodeError>;

    /// Decode a replay from disk.
    fn decode_file(&self, path: &Path) -> Result<DecodedReplay, DecodeError> {
        let bytes = std::fs::read(path)?;
        self.decode(&bytes)
    }
}

/// Decoder for replays already dumped to JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonReplayDecoder;

impl JsonReplayDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ReplayDecoder for JsonReplayDecoder {
    fn name(&self) -> &str {
        "json"
    }

    fn decode(&self, bytes: &[u8]) -> Result<DecodedReplay, DecodeError> {
        // Some Windows tools write a UTF-8 BOM.
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(DecodeError::Empty);
        }

        let document: serde_json::Value = serde_json::from_slice(bytes)?;
        let decoded = DecodedReplay::from_document(document)?;
        debug!(
            players = decoded.replay.players.len(),
            eliminations = decoded.replay.eliminations.len(),
            "Decoded replay document"
        );
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"{
        "PlayerData": [{ "PlayerId": "a1", "PlayerName": "Alpha", "TeamIndex": 3 }],
        "Eliminations": []
    }"#;

    #[test]
    fn test_decode_minimal() {
        let decoded = JsonReplayDecoder::new().decode(MINIMAL.as_bytes()).unwrap();
        assert_eq!(decoded.replay.players.len(), 1);
        assert_eq!(decoded.replay.players[0].name, "Alpha");
    }

    #[test]
    fn test_decode_with_bom() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(MINIMAL.as_bytes());
        assert!(JsonReplayDecoder::new().decode(&bytes).is_ok());
    }

    #[test]
    fn test_decode_empty() {
        let err = JsonReplayDecoder::new().decode(b"  \n").unwrap_err();
        assert!(matches!(err, DecodeError::Empty));
    }

    #[test]
    fn test_decode_garbage() {
        let err = JsonReplayDecoder::new().decode(b"\x00\x01binary").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_decode_bad_timestamp_is_hard_failure() {
        let doc = r#"{ "Eliminations": [{ "Eliminator": "a", "Eliminated": "b", "Time": "1:2:3" }] }"#;
        let err = JsonReplayDecoder::new().decode(doc.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("expected mm:ss"));
    }

    #[test]
    fn test_decode_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let decoded = JsonReplayDecoder::new().decode_file(file.path()).unwrap();
        assert_eq!(decoded.replay.players.len(), 1);
    }

    #[test]
    fn test_decode_missing_file() {
        let err = JsonReplayDecoder::new()
            .decode_file(Path::new("/nonexistent/replay.json"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
    }
}
