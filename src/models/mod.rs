//! Data structures for leagues: users, roster entries, sessions and errors.

mod league;
mod player;

pub use league::{
    normalize_display_name, thread_name, ChannelId, LeagueError, LeagueSession, LeagueType,
    MatchType, MessageId, SessionId, SessionSummary, UnknownChoice, MAX_DISPLAY_NAME_LEN,
};
pub use player::{Actor, RoleId, RosterEntry, UserId, UserRef};
