//! Wire format for replicated commands.
//!
//! One `Envelope` per mutating command. It carries the room, the command
//! record (origin seat + per-origin sequence number + command) and the
//! sender's state checksum after applying it. Frames are bincode-encoded.

use serde::{Deserialize, Serialize};

use crate::core::command::CommandRecord;
use crate::error::WireError;

/// A replicated command as sent on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Room the command belongs to.
    pub room: String,

    /// Origin, sequence number, and command.
    pub record: CommandRecord,

    /// Sender's `MatchState::checksum` after applying the command.
    pub checksum: u64,
}

impl Envelope {
    #[must_use]
    pub fn new(room: impl Into<String>, record: CommandRecord, checksum: u64) -> Self {
        Self {
            room: room.into(),
            record,
            checksum,
        }
    }

    /// Encode to a frame.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        bincode::serialize(self).map_err(WireError::Encode)
    }

    /// Decode a frame.
    pub fn decode(frame: &[u8]) -> Result<Self, WireError> {
        bincode::deserialize(frame).map_err(WireError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AttackTarget, Command, InstanceId, Seat};

    #[test]
    fn test_frame_roundtrip() {
        let envelope = Envelope::new(
            "arena",
            CommandRecord::new(
                Seat::Second,
                Command::Attack {
                    attacker: InstanceId(12),
                    target: AttackTarget::Direct,
                },
                7,
            ),
            0xDEAD_BEEF,
        );

        let frame = envelope.encode().unwrap();

        assert_eq!(Envelope::decode(&frame).unwrap(), envelope);
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let envelope = Envelope::new(
            "arena",
            CommandRecord::new(Seat::First, Command::AdvancePhase { actor: Seat::First }, 1),
            1,
        );
        let frame = envelope.encode().unwrap();

        let err = Envelope::decode(&frame[..frame.len() / 2]).unwrap_err();

        assert!(matches!(err, WireError::Decode(_)));
    }
}
