//! League lifecycle: host -> join -> report -> publish & close.
//!
//! All session state sits behind one mutex. It is held only to validate and mutate,
//! never across a platform call, so concurrent events for the same session see either
//! the state before or after a transition.

use crate::auth::AuthorizationChecker;
use crate::config::LeagueSettings;
use crate::events::{InboundEvent, Outcome};
use crate::logic::{is_result_report, parse_match_results, render_results, tally_results};
use crate::models::{
    thread_name, Actor, ChannelId, LeagueError, LeagueSession, LeagueType, MatchType, MessageId,
    SessionId, SessionSummary, UserRef,
};
use crate::platform::{InteractionRef, Platform};
use crate::store::SessionStore;
use log::{debug, error, info, warn};
use std::sync::{Mutex, MutexGuard};

/// Sent when something failed on our side rather than because of what the user did.
pub const GENERIC_FAILURE: &str = "⚠️ Something went wrong while handling that. Please try again.";

/// Posted into the league thread once results are out.
pub const CLOSING_NOTICE: &str = "✅ Results posted. League closed.";

/// Posted into the league thread when the results channel could not be reached.
pub const PUBLISH_FAILED_NOTICE: &str =
    "⚠️ Could not post the results. The league is still open, please send the report again.";

/// What a result report turned out to be, decided under the store lock.
enum Report {
    Ignore,
    Reject(LeagueError),
    Close(LeagueSession, Vec<String>),
}

pub struct LeagueService<S, A, P> {
    settings: LeagueSettings,
    store: Mutex<S>,
    auth: A,
    platform: P,
}

impl<S, A, P> LeagueService<S, A, P>
where
    S: SessionStore,
    A: AuthorizationChecker,
    P: Platform,
{
    pub fn new(settings: LeagueSettings, store: S, auth: A, platform: P) -> Self {
        Self {
            settings,
            store: Mutex::new(store),
            auth,
            platform,
        }
    }

    pub fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    fn store(&self) -> Result<MutexGuard<'_, S>, LeagueError> {
        self.store.lock().map_err(|_| LeagueError::StoreUnavailable)
    }

    /// Open session by id.
    pub fn session(&self, id: SessionId) -> Result<Option<LeagueSession>, LeagueError> {
        Ok(self.store()?.get(id))
    }

    /// Session an announcement's join button belongs to, while it is open.
    pub fn session_for_announcement(
        &self,
        announcement: MessageId,
    ) -> Result<Option<LeagueSession>, LeagueError> {
        let store = self.store()?;
        Ok(store
            .resolve_announcement(announcement)
            .and_then(|id| store.get(id)))
    }

    /// Every open session, summarised for the status API.
    pub fn summaries(&self) -> Result<Vec<SessionSummary>, LeagueError> {
        Ok(self
            .store()?
            .sessions()
            .iter()
            .map(SessionSummary::from_session)
            .collect())
    }

    /// Dispatch one inbound event.
    ///
    /// Validation failures come back as `Outcome::Denied` / `Outcome::ResultsRejected`.
    /// Platform or store failures are returned as errors after the requester has been
    /// sent a generic failure notice, when the event carried an interaction to answer.
    pub async fn handle(&self, event: InboundEvent) -> Result<Outcome, LeagueError> {
        let reply_to = event.interaction().cloned();
        let result = match event {
            InboundEvent::HostRequested {
                interaction,
                actor,
                channel,
                match_type,
                league_type,
            } => self.host(&interaction, &actor, channel, match_type, league_type).await,
            InboundEvent::JoinActivated {
                interaction,
                actor,
                announcement,
            } => self.activate_join(&interaction, &actor, announcement).await,
            InboundEvent::DisplayNameSubmitted {
                interaction,
                actor,
                announcement,
                display_name,
            } => {
                self.submit_display_name(&interaction, &actor, announcement, &display_name)
                    .await
            }
            InboundEvent::MessagePosted {
                actor,
                channel,
                content,
            } => self.report_results(&actor, channel, &content).await,
        };
        if let Err(e) = &result {
            error!("League event failed: {}", e);
            if let Some(interaction) = reply_to {
                let reply = self.platform.respond(&interaction, GENERIC_FAILURE, true).await;
                if let Err(reply) = reply {
                    warn!("Could not report failure to requester: {}", reply);
                }
            }
        }
        result
    }

    /// Tell the requester privately why nothing happened.
    async fn deny(
        &self,
        interaction: &InteractionRef,
        reason: LeagueError,
    ) -> Result<Outcome, LeagueError> {
        debug!("Denied: {}", reason);
        self.platform
            .respond(interaction, &reason.denial_text(), true)
            .await?;
        Ok(Outcome::Denied(reason))
    }

    /// Open a league: private thread, registered session, public announcement with join button.
    pub async fn host(
        &self,
        interaction: &InteractionRef,
        actor: &Actor,
        channel: ChannelId,
        match_type: MatchType,
        league_type: LeagueType,
    ) -> Result<Outcome, LeagueError> {
        if channel != self.settings.hosting_channel {
            return self.deny(interaction, LeagueError::WrongChannel).await;
        }
        if !self.auth.has_capability(actor, self.settings.hoster_role) {
            return self.deny(interaction, LeagueError::MissingCapability).await;
        }

        let name = thread_name(league_type, match_type, &actor.user);
        let thread = self.platform.create_private_thread(channel, &name).await?;
        self.platform.add_thread_member(thread, actor.id()).await?;

        let session = LeagueSession::new(thread, actor.user.clone(), match_type, league_type);
        let content = format!(
            "🏆 **{}**\nHost: {}\n\nClick join to enter the private thread.",
            session.title(),
            actor.user.mention()
        );
        self.store()?.put(session);

        let announcement = match self.platform.send_join_announcement(channel, &content).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Announcement for league {} failed, dropping session", thread);
                self.store()?.remove(thread);
                return Err(e.into());
            }
        };
        {
            let mut store = self.store()?;
            if let Some(mut session) = store.get(thread) {
                session.announcement = Some(announcement);
                store.put(session);
            }
        }
        info!(
            "League {} opened by {} ({} {}), announcement {}",
            thread, actor.user.name, league_type, match_type, announcement
        );

        let ack = format!("✅ League created. Private thread made for you: <#{}>", thread);
        if let Err(e) = self.platform.respond(interaction, &ack, true).await {
            warn!("Host acknowledgement for league {} failed: {}", thread, e);
        }
        Ok(Outcome::SessionOpened {
            session: thread,
            announcement,
        })
    }

    /// Join button: ask for a display name if the league behind the button is still open.
    pub async fn activate_join(
        &self,
        interaction: &InteractionRef,
        actor: &Actor,
        announcement: MessageId,
    ) -> Result<Outcome, LeagueError> {
        if actor.bot {
            return Ok(Outcome::Ignored);
        }
        let session = self.store()?.resolve_announcement(announcement);
        let Some(session) = session else {
            return self.deny(interaction, LeagueError::NoSuchSession).await;
        };
        self.platform
            .prompt_display_name(interaction, announcement)
            .await?;
        Ok(Outcome::DisplayNamePrompted { session })
    }

    /// Display-name modal submitted: validate and add the player to the roster.
    pub async fn submit_display_name(
        &self,
        interaction: &InteractionRef,
        actor: &Actor,
        announcement: MessageId,
        display_name: &str,
    ) -> Result<Outcome, LeagueError> {
        if actor.bot {
            return Ok(Outcome::Ignored);
        }
        let joined = {
            let mut store = self.store()?;
            join_roster(&mut *store, announcement, &actor.user, display_name)
        };
        let (session, display_name) = match joined {
            Ok(joined) => joined,
            Err(e) if e.is_denial() => return self.deny(interaction, e).await,
            Err(e) => return Err(e),
        };

        if let Err(e) = self.platform.add_thread_member(session, actor.id()).await {
            warn!(
                "Adding {} to league {} failed, undoing join",
                actor.user.name, session
            );
            let mut store = self.store()?;
            if let Some(mut s) = store.get(session) {
                s.remove_player(actor.id());
                store.put(s);
            }
            return Err(e.into());
        }
        info!(
            "{} joined league {} as {:?}",
            actor.user.name, session, display_name
        );

        // The join is committed from here on; a failed notice is only logged.
        let confirmation = format!("✅ Joined as **{}**", display_name);
        if let Err(e) = self.platform.respond(interaction, &confirmation, true).await {
            warn!("Join confirmation for {} failed: {}", actor.user.name, e);
        }
        let notice = format!(
            "👤 **Player Joined**\nDisplay: **{}**\nUser: {}",
            display_name,
            actor.user.mention()
        );
        if let Err(e) = self.platform.send_message(session, &notice).await {
            warn!("Join notice for league {} failed: {}", session, e);
        }
        Ok(Outcome::PlayerJoined {
            session,
            user: actor.id(),
            display_name,
        })
    }

    /// Host's message in a league thread: parse, tally, publish and close.
    pub async fn report_results(
        &self,
        actor: &Actor,
        channel: ChannelId,
        content: &str,
    ) -> Result<Outcome, LeagueError> {
        if actor.bot {
            return Ok(Outcome::Ignored);
        }
        let report = {
            let mut store = self.store()?;
            match store.get(channel) {
                Some(session) if session.host.id == actor.id() && is_result_report(content) => {
                    match parse_match_results(content) {
                        Ok(winners) => {
                            store.remove(channel);
                            Report::Close(session, winners)
                        }
                        Err(e) => Report::Reject(e),
                    }
                }
                _ => Report::Ignore,
            }
        };

        let (session, winners) = match report {
            Report::Ignore => return Ok(Outcome::Ignored),
            Report::Reject(e) => {
                debug!("Result report for league {} rejected: {}", channel, e);
                self.platform.send_message(channel, &e.denial_text()).await?;
                return Ok(Outcome::ResultsRejected(e));
            }
            Report::Close(session, winners) => (session, winners),
        };

        let tally = tally_results(&winners, &session.roster);
        for name in tally.unresolved() {
            warn!("League {}: winner {:?} is not on the roster", session.id, name);
        }
        let summary = render_results(&session, &tally);

        if let Err(e) = self
            .platform
            .send_message(self.settings.results_channel, &summary)
            .await
        {
            warn!("Publishing results of league {} failed, reopening", session.id);
            self.store()?.put(session);
            if let Err(notice) = self.platform.send_message(channel, PUBLISH_FAILED_NOTICE).await {
                warn!("Could not tell host about failed publish: {}", notice);
            }
            return Err(e.into());
        }
        if let Err(e) = self.platform.send_message(channel, CLOSING_NOTICE).await {
            warn!("Closing notice for league {} failed: {}", channel, e);
        }
        info!(
            "League {} closed with {} result line(s)",
            session.id,
            tally.entries.len()
        );
        Ok(Outcome::LeagueClosed {
            session: session.id,
            tally,
        })
    }
}

/// Validate and apply a join while the caller holds the store lock.
fn join_roster<S: SessionStore>(
    store: &mut S,
    announcement: MessageId,
    user: &UserRef,
    display_name: &str,
) -> Result<(SessionId, String), LeagueError> {
    let id = store
        .resolve_announcement(announcement)
        .ok_or(LeagueError::NoSuchSession)?;
    let mut session = store.get(id).ok_or(LeagueError::NoSuchSession)?;
    let name = session.add_player(user.clone(), display_name)?;
    store.put(session);
    Ok((id, name))
}
