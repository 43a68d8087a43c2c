//! Roster tally: turn the three reported winners into per-player wins and losses.

use crate::logic::results::RESULTS_PER_REPORT;
use crate::models::{LeagueSession, RosterEntry, UserRef};
use serde::Serialize;

/// Wins and losses for one display name that won at least once.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TallyEntry {
    pub display_name: String,
    pub wins: u32,
    pub losses: u32,
    /// Roster user to ping; None when no joined player chose this display name.
    pub mention: Option<UserRef>,
}

impl TallyEntry {
    /// One results line, e.g. "<@1> **Alice** — 2W / 1L".
    pub fn render_line(&self) -> String {
        let line = format!("**{}** — {}W / {}L", self.display_name, self.wins, self.losses);
        match &self.mention {
            Some(user) => format!("{} {}", user.mention(), line),
            None => line,
        }
    }
}

/// Tally of one result report, in order of each name's first win.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Tally {
    pub entries: Vec<TallyEntry>,
}

impl Tally {
    /// Winner names that matched nobody on the roster.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.mention.is_none())
            .map(|e| e.display_name.as_str())
    }

    pub fn get(&self, display_name: &str) -> Option<&TallyEntry> {
        self.entries.iter().find(|e| e.display_name == display_name)
    }
}

/// Count wins per distinct winner name and resolve each name against the roster.
///
/// Losses are counted against the fixed report size, so wins + losses is always
/// [`RESULTS_PER_REPORT`]. Players who never won do not appear. When two players
/// chose the same display name the earliest joiner gets the mention.
pub fn tally_results(winners: &[String], roster: &[RosterEntry]) -> Tally {
    let mut entries: Vec<TallyEntry> = Vec::new();
    for name in winners {
        match entries.iter_mut().find(|e| &e.display_name == name) {
            Some(entry) => entry.wins += 1,
            None => entries.push(TallyEntry {
                display_name: name.clone(),
                wins: 1,
                losses: 0,
                mention: roster
                    .iter()
                    .find(|p| &p.display_name == name)
                    .map(|p| p.user.clone()),
            }),
        }
    }
    let total = RESULTS_PER_REPORT as u32;
    for entry in &mut entries {
        entry.losses = total.saturating_sub(entry.wins);
    }
    Tally { entries }
}

/// Message posted to the results channel when a league closes.
pub fn render_results(session: &LeagueSession, tally: &Tally) -> String {
    let mut out = format!(
        "🏁 **{} Results**\nHost: {}\n",
        session.title(),
        session.host.mention()
    );
    for entry in &tally.entries {
        out.push_str(&entry.render_line());
        out.push('\n');
    }
    out
}
