//! Per-channel response policy: the disabled flag and verbosity levels.

pub mod store;

pub use store::ChannelStore;

use crate::ChannelId;
use serde::{Deserialize, Serialize};

/// How chatty the bot is allowed to be in a channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerbosityLevel {
    /// Only karma announcements.
    KarmaOnly,
    /// Karma announcements and replies when the bot is addressed.
    MentionsOnly,
    /// Everything, including unprompted chat replies.
    Unrestricted,
}

impl VerbosityLevel {
    pub const ALL: [VerbosityLevel; 3] = [
        VerbosityLevel::KarmaOnly,
        VerbosityLevel::MentionsOnly,
        VerbosityLevel::Unrestricted,
    ];

    /// Numeric level as stored and as typed by operators.
    pub fn as_level(self) -> i64 {
        match self {
            VerbosityLevel::KarmaOnly => 1,
            VerbosityLevel::MentionsOnly => 2,
            VerbosityLevel::Unrestricted => 3,
        }
    }

    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(VerbosityLevel::KarmaOnly),
            2 => Some(VerbosityLevel::MentionsOnly),
            3 => Some(VerbosityLevel::Unrestricted),
            _ => None,
        }
    }

    /// Operator-facing description, used in command confirmations.
    pub fn describe(self) -> &'static str {
        match self {
            VerbosityLevel::KarmaOnly => "karma changes only",
            VerbosityLevel::MentionsOnly => "mentions only",
            VerbosityLevel::Unrestricted => "unrestricted",
        }
    }
}

impl Default for VerbosityLevel {
    fn default() -> Self {
        VerbosityLevel::MentionsOnly
    }
}

impl std::fmt::Display for VerbosityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_level())
    }
}

/// Classification of an inbound message, derived by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    /// The message carries at least one valid karma marker run.
    KarmaEvent,
    /// The bot is addressed (mention or by name) and no karma applies.
    MentionOfBot,
    /// Everything else.
    PlainMessage,
}

/// Per-channel configuration. Absence of a stored row is equivalent to
/// `default_for` — channels are created lazily on the first administrative
/// write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub channel_id: ChannelId,
    pub disabled: bool,
    pub verbosity: VerbosityLevel,
}

impl ChannelConfig {
    pub fn default_for(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            disabled: false,
            verbosity: VerbosityLevel::default(),
        }
    }

    /// Whether a message of the given class should be processed at all.
    /// The disabled flag overrides verbosity unconditionally.
    pub fn should_process(&self, class: MessageClass) -> bool {
        if self.disabled {
            return false;
        }

        match self.verbosity {
            VerbosityLevel::KarmaOnly => class == MessageClass::KarmaEvent,
            VerbosityLevel::MentionsOnly => {
                matches!(class, MessageClass::KarmaEvent | MessageClass::MentionOfBot)
            }
            VerbosityLevel::Unrestricted => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(disabled: bool, verbosity: VerbosityLevel) -> ChannelConfig {
        ChannelConfig {
            channel_id: "channel-1".into(),
            disabled,
            verbosity,
        }
    }

    #[test]
    fn disabled_blocks_every_class() {
        for verbosity in VerbosityLevel::ALL {
            let channel = config(true, verbosity);
            assert!(!channel.should_process(MessageClass::KarmaEvent));
            assert!(!channel.should_process(MessageClass::MentionOfBot));
            assert!(!channel.should_process(MessageClass::PlainMessage));
        }
    }

    #[test]
    fn karma_only_admits_only_karma_events() {
        let channel = config(false, VerbosityLevel::KarmaOnly);
        assert!(channel.should_process(MessageClass::KarmaEvent));
        assert!(!channel.should_process(MessageClass::MentionOfBot));
        assert!(!channel.should_process(MessageClass::PlainMessage));
    }

    #[test]
    fn mentions_only_ignores_plain_messages() {
        let channel = config(false, VerbosityLevel::MentionsOnly);
        assert!(channel.should_process(MessageClass::KarmaEvent));
        assert!(channel.should_process(MessageClass::MentionOfBot));
        assert!(!channel.should_process(MessageClass::PlainMessage));
    }

    #[test]
    fn unrestricted_admits_everything() {
        let channel = config(false, VerbosityLevel::Unrestricted);
        assert!(channel.should_process(MessageClass::KarmaEvent));
        assert!(channel.should_process(MessageClass::MentionOfBot));
        assert!(channel.should_process(MessageClass::PlainMessage));
    }

    #[test]
    fn levels_round_trip_and_reject_out_of_range() {
        for verbosity in VerbosityLevel::ALL {
            assert_eq!(VerbosityLevel::from_level(verbosity.as_level()), Some(verbosity));
        }
        assert_eq!(VerbosityLevel::from_level(0), None);
        assert_eq!(VerbosityLevel::from_level(4), None);
        assert_eq!(VerbosityLevel::from_level(-1), None);
    }
}
