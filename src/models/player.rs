//! Users as seen by the bot: platform users, acting users and roster entries.

use serde::{Deserialize, Serialize};

/// Platform user id (Discord snowflake).
pub type UserId = u64;

/// Platform role id; the hoster capability is one of these.
pub type RoleId = u64;

/// A platform user we can name and ping.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    /// Account name (not the league display name).
    pub name: String,
}

impl UserRef {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Mention markup that pings the user when sent in a message.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// The user behind an inbound event, with what the platform told us about them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Actor {
    pub user: UserRef,
    /// Bot accounts are ignored by every transition.
    pub bot: bool,
    /// Roles the member holds in the guild the event came from.
    pub roles: Vec<RoleId>,
}

impl Actor {
    pub fn new(user: UserRef) -> Self {
        Self {
            user,
            bot: false,
            roles: Vec::new(),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn as_bot(mut self) -> Self {
        self.bot = true;
        self
    }

    pub fn id(&self) -> UserId {
        self.user.id
    }
}

/// One joined player: the user plus the display name they chose when joining.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user: UserRef,
    pub display_name: String,
}

impl RosterEntry {
    pub fn new(user: UserRef, display_name: impl Into<String>) -> Self {
        Self {
            user,
            display_name: display_name.into(),
        }
    }
}
