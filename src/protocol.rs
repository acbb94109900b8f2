//! Wire messages exchanged with clients.

use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Inbound frame: a participant proposing a full solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionMessage {
    pub username: String,
    pub puzzle: Grid,
}

/// Outbound frames.
///
/// Untagged on purpose: a new puzzle goes out as the bare grid array and a
/// result as `{"username": ..., "isWinner": ...}`, which is exactly what
/// clients parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Puzzle(Grid),
    Result {
        username: String,
        #[serde(rename = "isWinner")]
        is_winner: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puzzle_serializes_unwrapped() {
        let msg = ServerMessage::Puzzle(Grid::new(vec![vec![Some(1), None]]));
        assert_eq!(serde_json::to_string(&msg).unwrap(), "[[1,null]]");
    }

    #[test]
    fn result_serializes_with_is_winner_key() {
        let msg = ServerMessage::Result {
            username: "A".to_string(),
            is_winner: true,
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"username":"A","isWinner":true}"#
        );
    }

    #[test]
    fn submission_decodes_from_wire_shape() {
        let raw = r#"{"username":"alice","puzzle":[[5,null],[null,5]]}"#;
        let msg: SubmissionMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.username, "alice");
        assert_eq!(msg.puzzle.get(0, 0), Some(5));
        assert_eq!(msg.puzzle.get(0, 1), None);
    }

    #[test]
    fn submission_without_puzzle_is_an_error() {
        let raw = r#"{"username":"alice"}"#;
        assert!(serde_json::from_str::<SubmissionMessage>(raw).is_err());
    }
}
