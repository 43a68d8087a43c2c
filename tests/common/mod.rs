//! Shared fixtures: a recording platform and helpers to drive the league service.

#![allow(dead_code)]

use async_trait::async_trait;
use league_host_bot::{
    Actor, InboundEvent, InteractionRef, LeagueError, LeagueService, LeagueSettings, LeagueType,
    MatchType, MemorySessionStore, MessageId, Outcome, Platform, PlatformError, RoleListChecker,
    SessionId, UserRef,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub const HOSTING_CHANNEL: u64 = 100;
pub const RESULTS_CHANNEL: u64 = 200;
pub const HOSTER_ROLE: u64 = 300;
pub const HOST_ID: u64 = 1;

/// One outbound call, as the platform saw it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    CreateThread { parent: u64, name: String, thread: u64 },
    AddMember { thread: u64, user: u64 },
    Send { channel: u64, content: String },
    Announce { channel: u64, content: String, message: u64 },
    Respond { interaction: u64, content: String, ephemeral: bool },
    PromptDisplayName { interaction: u64, announcement: u64 },
}

/// Records every call; selected calls can be made to fail.
pub struct RecordingPlatform {
    actions: Mutex<Vec<Action>>,
    next_id: AtomicU64,
    failing: Mutex<HashSet<&'static str>>,
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1000),
            failing: Mutex::new(HashSet::new()),
        }
    }
}

impl RecordingPlatform {
    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.actions.lock().unwrap().clear();
    }

    /// Make every later call of `action` fail ("create thread", "add thread member",
    /// "send message", "send announcement", "respond to interaction").
    pub fn fail_on(&self, action: &'static str) {
        self.failing.lock().unwrap().insert(action);
    }

    pub fn recover(&self, action: &'static str) {
        self.failing.lock().unwrap().remove(action);
    }

    /// Messages sent to `channel`, in order.
    pub fn sent_to(&self, channel: u64) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Send { channel: c, content } if c == channel => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Interaction responses for `interaction`, in order.
    pub fn responses_to(&self, interaction: u64) -> Vec<(String, bool)> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Respond {
                    interaction: i,
                    content,
                    ephemeral,
                } if i == interaction => Some((content, ephemeral)),
                _ => None,
            })
            .collect()
    }

    fn check(&self, action: &'static str) -> Result<(), PlatformError> {
        if self.failing.lock().unwrap().contains(action) {
            return Err(PlatformError::new(action, "injected failure"));
        }
        Ok(())
    }

    fn record(&self, action: Action) {
        self.actions.lock().unwrap().push(action);
    }

    fn fresh_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn create_private_thread(&self, parent: u64, name: &str) -> Result<u64, PlatformError> {
        self.check("create thread")?;
        let thread = self.fresh_id();
        self.record(Action::CreateThread {
            parent,
            name: name.to_string(),
            thread,
        });
        Ok(thread)
    }

    async fn add_thread_member(&self, thread: u64, user: u64) -> Result<(), PlatformError> {
        self.check("add thread member")?;
        self.record(Action::AddMember { thread, user });
        Ok(())
    }

    async fn send_message(&self, channel: u64, content: &str) -> Result<u64, PlatformError> {
        self.check("send message")?;
        self.record(Action::Send {
            channel,
            content: content.to_string(),
        });
        Ok(self.fresh_id())
    }

    async fn send_join_announcement(
        &self,
        channel: u64,
        content: &str,
    ) -> Result<u64, PlatformError> {
        self.check("send announcement")?;
        let message = self.fresh_id();
        self.record(Action::Announce {
            channel,
            content: content.to_string(),
            message,
        });
        Ok(message)
    }

    async fn respond(
        &self,
        interaction: &InteractionRef,
        content: &str,
        ephemeral: bool,
    ) -> Result<(), PlatformError> {
        self.check("respond to interaction")?;
        self.record(Action::Respond {
            interaction: interaction.id,
            content: content.to_string(),
            ephemeral,
        });
        Ok(())
    }

    async fn prompt_display_name(
        &self,
        interaction: &InteractionRef,
        announcement: u64,
    ) -> Result<(), PlatformError> {
        self.check("open display name prompt")?;
        self.record(Action::PromptDisplayName {
            interaction: interaction.id,
            announcement,
        });
        Ok(())
    }
}

pub type TestService = LeagueService<MemorySessionStore, RoleListChecker, RecordingPlatform>;

pub fn settings() -> LeagueSettings {
    LeagueSettings {
        hosting_channel: HOSTING_CHANNEL,
        results_channel: RESULTS_CHANNEL,
        hoster_role: HOSTER_ROLE,
    }
}

pub fn service() -> TestService {
    LeagueService::new(
        settings(),
        MemorySessionStore::new(),
        RoleListChecker,
        RecordingPlatform::default(),
    )
}

pub fn host_actor() -> Actor {
    Actor::new(UserRef::new(HOST_ID, "hostuser")).with_roles([HOSTER_ROLE])
}

pub fn player(id: u64, name: &str) -> Actor {
    Actor::new(UserRef::new(id, name))
}

pub fn interaction(id: u64) -> InteractionRef {
    InteractionRef::new(id, format!("token-{id}"))
}

pub fn host_request(actor: Actor, channel: u64, match_type: MatchType) -> InboundEvent {
    InboundEvent::HostRequested {
        interaction: interaction(1),
        actor,
        channel,
        match_type,
        league_type: LeagueType::Dl,
    }
}

/// Open a league as the default host; returns (session id, announcement id).
pub async fn open_league(svc: &TestService, match_type: MatchType) -> (SessionId, MessageId) {
    match svc
        .handle(host_request(host_actor(), HOSTING_CHANNEL, match_type))
        .await
        .unwrap()
    {
        Outcome::SessionOpened {
            session,
            announcement,
        } => (session, announcement),
        other => panic!("expected SessionOpened, got {other:?}"),
    }
}

pub async fn join(
    svc: &TestService,
    announcement: MessageId,
    actor: Actor,
    display_name: &str,
) -> Result<Outcome, LeagueError> {
    let id = actor.id() + 10_000;
    svc.handle(InboundEvent::DisplayNameSubmitted {
        interaction: interaction(id),
        actor,
        announcement,
        display_name: display_name.to_string(),
    })
    .await
}

pub async fn report(
    svc: &TestService,
    session: SessionId,
    actor: Actor,
    text: &str,
) -> Result<Outcome, LeagueError> {
    svc.handle(InboundEvent::MessagePosted {
        actor,
        channel: session,
        content: text.to_string(),
    })
    .await
}
