//! States and handshake outcomes of the connection protocol.

use gateway_core::types::MemberId;

use crate::message::Reply;

/// Lifecycle state of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// Waiting (with a deadline) for the auth frame.
    AwaitingAuth,
    /// Accepting subscribe frames until the peer disconnects.
    Subscribed {
        /// Authenticated member, or [`MemberId::ANONYMOUS`].
        member: MemberId,
    },
}

/// Result of the auth handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No usable auth frame before the deadline. Terminal.
    Missing,
    /// The client declared itself anonymous.
    Stranger,
    /// The backend rejected the claimed member; the connection is demoted.
    Rejected,
    /// The backend accepted the member.
    Member(MemberId),
}

impl AuthOutcome {
    /// The reply sent to the client for this outcome.
    pub fn reply(&self) -> Reply {
        match self {
            Self::Missing => Reply::missing_auth(),
            Self::Stranger => Reply::hello_stranger(),
            Self::Rejected => Reply::unauthorized(),
            Self::Member(member) => Reply::hello_member(*member),
        }
    }

    /// The state entered after the handshake, `None` if the connection
    /// must be closed.
    pub fn next_state(&self) -> Option<ProtocolState> {
        match self {
            Self::Missing => None,
            Self::Stranger | Self::Rejected => Some(ProtocolState::Subscribed {
                member: MemberId::ANONYMOUS,
            }),
            Self::Member(member) => Some(ProtocolState::Subscribed { member: *member }),
        }
    }
}
