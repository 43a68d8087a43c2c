//! LeagueSession and the league error taxonomy.

use crate::models::player::{RosterEntry, UserId, UserRef};
use crate::platform::PlatformError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Platform channel id.
pub type ChannelId = u64;

/// Platform message id.
pub type MessageId = u64;

/// A session is identified by its private sub-channel.
pub type SessionId = ChannelId;

/// Longest display name a joining player may choose.
pub const MAX_DISPLAY_NAME_LEN: usize = 32;

/// Errors that can occur while running a league.
///
/// The Display text of the validation variants is what the user sees.
#[derive(Debug, Error)]
pub enum LeagueError {
    /// Hosting requested outside the designated hosting channel.
    #[error("You cannot host leagues in this channel.")]
    WrongChannel,
    /// Requester lacks the hoster role.
    #[error("You need the **League Hoster** role.")]
    MissingCapability,
    /// Joiner is already on the roster.
    #[error("You already joined this league.")]
    AlreadyJoined,
    /// Roster is at max players.
    #[error("League is full.")]
    LeagueFull,
    /// Session was never registered or has already been closed.
    #[error("This league is closed or no longer exists.")]
    NoSuchSession,
    /// Display name empty after trimming, or too long.
    #[error("Display name must be between 1 and 32 characters.")]
    InvalidDisplayName,
    /// Result report did not name exactly three winners.
    #[error("Submit exactly **3 match results** (found {found}).")]
    WrongResultCount { found: usize },
    /// Outbound platform call failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),
    /// The session store lock was poisoned by a panicking holder.
    #[error("session store is unavailable")]
    StoreUnavailable,
}

impl LeagueError {
    /// Validation failures are reported to the user; everything else is a failure of ours.
    pub fn is_denial(&self) -> bool {
        !matches!(self, LeagueError::Platform(_) | LeagueError::StoreUnavailable)
    }

    /// Text sent back to the user for a validation failure.
    pub fn denial_text(&self) -> String {
        format!("❌ {self}")
    }
}

/// Raised when a command option does not name a known match or league type.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

/// Match format; fixes how many players a league takes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "1v1")]
    OneVOne,
    #[serde(rename = "2v2")]
    TwoVTwo,
    #[serde(rename = "3v3")]
    ThreeVThree,
}

impl MatchType {
    pub const ALL: [MatchType; 3] = [
        MatchType::OneVOne,
        MatchType::TwoVTwo,
        MatchType::ThreeVThree,
    ];

    pub fn max_players(self) -> usize {
        match self {
            MatchType::OneVOne => 2,
            MatchType::TwoVTwo => 4,
            MatchType::ThreeVThree => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::OneVOne => "1v1",
            MatchType::TwoVTwo => "2v2",
            MatchType::ThreeVThree => "3v3",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChoice {
                kind: "match type",
                value: s.to_string(),
            })
    }
}

/// League label. Shown in names and messages only.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum LeagueType {
    #[serde(rename = "DL")]
    Dl,
    #[serde(rename = "SDL")]
    Sdl,
    #[serde(rename = "CL")]
    Cl,
}

impl LeagueType {
    pub const ALL: [LeagueType; 3] = [LeagueType::Dl, LeagueType::Sdl, LeagueType::Cl];

    pub fn as_str(self) -> &'static str {
        match self {
            LeagueType::Dl => "DL",
            LeagueType::Sdl => "SDL",
            LeagueType::Cl => "CL",
        }
    }
}

impl fmt::Display for LeagueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeagueType {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeagueType::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChoice {
                kind: "league type",
                value: s.to_string(),
            })
    }
}

/// One hosted league, scoped to a private sub-channel.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeagueSession {
    pub id: SessionId,
    pub host: UserRef,
    pub match_type: MatchType,
    pub league_type: LeagueType,
    /// Joined players in join order. User ids are unique.
    pub roster: Vec<RosterEntry>,
    /// Public join-prompt message, once posted.
    pub announcement: Option<MessageId>,
    pub created_at: DateTime<Utc>,
}

impl LeagueSession {
    /// New session with an empty roster.
    pub fn new(
        id: SessionId,
        host: UserRef,
        match_type: MatchType,
        league_type: LeagueType,
    ) -> Self {
        Self {
            id,
            host,
            match_type,
            league_type,
            roster: Vec::new(),
            announcement: None,
            created_at: Utc::now(),
        }
    }

    pub fn max_players(&self) -> usize {
        self.match_type.max_players()
    }

    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.max_players()
    }

    pub fn has_player(&self, user: UserId) -> bool {
        self.roster.iter().any(|p| p.user.id == user)
    }

    /// Title shared by the sub-channel name and the announcement, e.g. "DL 1v1 League".
    pub fn title(&self) -> String {
        format!("{} {} League", self.league_type, self.match_type)
    }

    /// Deterministic private sub-channel name.
    pub fn thread_name(&self) -> String {
        thread_name(self.league_type, self.match_type, &self.host)
    }

    /// Check that `user` may join: not already on the roster, and a free slot left.
    pub fn check_can_join(&self, user: UserId) -> Result<(), LeagueError> {
        if self.has_player(user) {
            return Err(LeagueError::AlreadyJoined);
        }
        if self.is_full() {
            return Err(LeagueError::LeagueFull);
        }
        Ok(())
    }

    /// Add a player under the chosen display name. Returns the trimmed name that was stored.
    pub fn add_player(&mut self, user: UserRef, display_name: &str) -> Result<String, LeagueError> {
        self.check_can_join(user.id)?;
        let name = normalize_display_name(display_name)?;
        self.roster.push(RosterEntry::new(user, name.clone()));
        Ok(name)
    }

    /// Remove a player by user id. Returns the removed entry.
    pub fn remove_player(&mut self, user: UserId) -> Option<RosterEntry> {
        let idx = self.roster.iter().position(|p| p.user.id == user)?;
        Some(self.roster.remove(idx))
    }
}

/// Sub-channel name for a league hosted by `host`.
pub fn thread_name(league_type: LeagueType, match_type: MatchType, host: &UserRef) -> String {
    format!("{} {} League - {}", league_type, match_type, host.name)
}

/// Trim and bound a submitted display name.
pub fn normalize_display_name(raw: &str) -> Result<String, LeagueError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_DISPLAY_NAME_LEN {
        return Err(LeagueError::InvalidDisplayName);
    }
    Ok(name.to_string())
}

/// Read-only view of a session for the status API.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub host: UserRef,
    pub match_type: MatchType,
    pub league_type: LeagueType,
    pub players: Vec<String>,
    pub max_players: usize,
    pub created_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_session(s: &LeagueSession) -> Self {
        Self {
            id: s.id,
            title: s.title(),
            host: s.host.clone(),
            match_type: s.match_type,
            league_type: s.league_type,
            players: s.roster.iter().map(|p| p.display_name.clone()).collect(),
            max_players: s.max_players(),
            created_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(match_type: MatchType) -> LeagueSession {
        LeagueSession::new(10, UserRef::new(1, "host"), match_type, LeagueType::Cl)
    }

    #[test]
    fn choices_parse_case_insensitively() {
        assert_eq!("2V2".parse::<MatchType>(), Ok(MatchType::TwoVTwo));
        assert_eq!("sdl".parse::<LeagueType>(), Ok(LeagueType::Sdl));
        assert!("4v4".parse::<MatchType>().is_err());
    }

    #[test]
    fn thread_name_is_deterministic() {
        let s = session(MatchType::ThreeVThree);
        assert_eq!(s.thread_name(), "CL 3v3 League - host");
        assert_eq!(s.title(), "CL 3v3 League");
    }

    #[test]
    fn add_player_enforces_unique_users_and_capacity() {
        let mut s = session(MatchType::OneVOne);
        assert_eq!(s.add_player(UserRef::new(2, "a"), " Ann ").unwrap(), "Ann");
        assert!(matches!(
            s.add_player(UserRef::new(2, "a"), "Ann"),
            Err(LeagueError::AlreadyJoined)
        ));
        s.add_player(UserRef::new(3, "b"), "Ben").unwrap();
        assert!(matches!(
            s.add_player(UserRef::new(4, "c"), "Cat"),
            Err(LeagueError::LeagueFull)
        ));
        assert_eq!(s.roster.len(), 2);
    }

    #[test]
    fn remove_player_frees_a_slot() {
        let mut s = session(MatchType::OneVOne);
        s.add_player(UserRef::new(2, "a"), "Ann").unwrap();
        s.add_player(UserRef::new(3, "b"), "Ben").unwrap();
        assert_eq!(s.remove_player(2).map(|p| p.display_name), Some("Ann".to_string()));
        assert!(!s.is_full());
        assert!(s.remove_player(2).is_none());
    }

    #[test]
    fn display_name_bounds_count_characters() {
        assert!(normalize_display_name(&"é".repeat(32)).is_ok());
        assert!(normalize_display_name(&"é".repeat(33)).is_err());
        assert!(normalize_display_name("").is_err());
    }

    #[test]
    fn only_validation_failures_are_denials() {
        assert!(LeagueError::LeagueFull.is_denial());
        assert!(!LeagueError::StoreUnavailable.is_denial());
        assert_eq!(LeagueError::LeagueFull.denial_text(), "❌ League is full.");
    }
}
