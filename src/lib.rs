//! League hosting bot: library with models, league logic and the session lifecycle.
//!
//! The Discord adapter and status server live in the `bot` binary.

pub mod auth;
pub mod config;
pub mod events;
pub mod lifecycle;
pub mod logic;
pub mod models;
pub mod platform;
pub mod store;

pub use auth::{AuthorizationChecker, RoleListChecker};
pub use config::{BotConfig, ConfigError, LeagueSettings};
pub use events::{InboundEvent, Outcome};
pub use lifecycle::{LeagueService, CLOSING_NOTICE, GENERIC_FAILURE, PUBLISH_FAILED_NOTICE};
pub use logic::{
    is_result_report, parse_match_results, render_results, tally_results, Tally, TallyEntry,
    RESULTS_PER_REPORT,
};
pub use models::{
    Actor, ChannelId, LeagueError, LeagueSession, LeagueType, MatchType, MessageId, RoleId,
    RosterEntry, SessionId, SessionSummary, UserId, UserRef, MAX_DISPLAY_NAME_LEN,
};
pub use platform::{InteractionRef, Platform, PlatformError};
pub use store::{MemorySessionStore, SessionStore};
