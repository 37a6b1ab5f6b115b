//! Capability grants carried by a session credential

use serde::{Deserialize, Serialize};

/// Capabilities granted to a participant for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grants {
    /// May join the session
    pub join: bool,
    /// May publish an audio track
    pub publish_audio: bool,
    /// May publish data messages
    pub publish_data: bool,
    /// May subscribe to other participants' tracks
    pub subscribe: bool,
}

impl Grants {
    /// The full grant set issued to voice-session participants
    pub fn voice_session() -> Self {
        Self {
            join: true,
            publish_audio: true,
            publish_data: true,
            subscribe: true,
        }
    }

    /// Whether every capability is granted
    pub fn is_full(&self) -> bool {
        self.join && self.publish_audio && self.publish_data && self.subscribe
    }
}
