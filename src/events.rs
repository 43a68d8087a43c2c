//! Inbound platform events and what handling them amounted to.

use crate::logic::Tally;
use crate::models::{
    Actor, ChannelId, LeagueError, LeagueType, MatchType, MessageId, SessionId, UserId,
};
use crate::platform::InteractionRef;

/// Everything the platform adapter forwards to the league core.
#[derive(Clone, Debug)]
pub enum InboundEvent {
    /// `/hostleague` slash command.
    HostRequested {
        interaction: InteractionRef,
        actor: Actor,
        channel: ChannelId,
        match_type: MatchType,
        league_type: LeagueType,
    },
    /// Join button pressed on an announcement.
    JoinActivated {
        interaction: InteractionRef,
        actor: Actor,
        announcement: MessageId,
    },
    /// Display-name modal submitted.
    DisplayNameSubmitted {
        interaction: InteractionRef,
        actor: Actor,
        announcement: MessageId,
        display_name: String,
    },
    /// Plain message posted in any channel the bot can see.
    MessagePosted {
        actor: Actor,
        channel: ChannelId,
        content: String,
    },
}

impl InboundEvent {
    /// Interaction to answer when handling fails, if the event came with one.
    pub fn interaction(&self) -> Option<&InteractionRef> {
        match self {
            InboundEvent::HostRequested { interaction, .. }
            | InboundEvent::JoinActivated { interaction, .. }
            | InboundEvent::DisplayNameSubmitted { interaction, .. } => Some(interaction),
            InboundEvent::MessagePosted { .. } => None,
        }
    }

    pub fn actor(&self) -> &Actor {
        match self {
            InboundEvent::HostRequested { actor, .. }
            | InboundEvent::JoinActivated { actor, .. }
            | InboundEvent::DisplayNameSubmitted { actor, .. }
            | InboundEvent::MessagePosted { actor, .. } => actor,
        }
    }
}

/// Result of handling one event. Platform failures are returned as errors instead.
#[derive(Debug)]
pub enum Outcome {
    /// Not for us: bot author, unrelated channel or message, not the host.
    Ignored,
    /// Validation failed; the user was told why and nothing changed.
    Denied(LeagueError),
    SessionOpened {
        session: SessionId,
        announcement: MessageId,
    },
    DisplayNamePrompted {
        session: SessionId,
    },
    PlayerJoined {
        session: SessionId,
        user: UserId,
        display_name: String,
    },
    /// Report did not name exactly three winners; the session stays open.
    ResultsRejected(LeagueError),
    LeagueClosed {
        session: SessionId,
        tally: Tally,
    },
}
