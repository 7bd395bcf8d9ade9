//! Invasion lifecycle - a cross-territory campaign
//!
//! `recruiting -> (can_launch) -> rallying -> resolved`, with a supplementary
//! `recruiting -> expired` edge for campaigns that never reach the minimum
//! force. Launch freezes the signup list as the attacker roster; defenders
//! can only join during the two-hour rally window that follows.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::conflict::constants::{
    INVASION_ENTRY_COST, MIN_INVASION_ATTACKERS, RALLY_WINDOW, RECRUITMENT_WINDOW,
};
use crate::conflict::outcome::InvasionOutcome;
use crate::core::types::{ConflictId, Gold, ParticipantId, TerritoryId};
use crate::core::Timestamp;

/// Where an invasion sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvasionPhase {
    Recruiting,
    Rallying,
    Resolved,
    Expired,
}

/// A single invasion campaign against one target territory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvasionEvent {
    pub id: ConflictId,
    pub attacking_territory: TerritoryId,
    pub attacking_territory_name: String,
    pub attacking_ruler: ParticipantId,
    pub attacking_ruler_name: String,
    pub target_territory: TerritoryId,
    pub target_territory_name: String,
    pub recruitment_opened_at: Timestamp,
    pub recruitment_deadline: Timestamp,
    signups: Vec<ParticipantId>,
    launched_at: Option<Timestamp>,
    rally_deadline: Option<Timestamp>,
    defenders: Vec<ParticipantId>,
    expired: bool,
    /// Set exactly once by the ledger; doubles as the resolved flag
    outcome: Option<InvasionOutcome>,
}

impl InvasionEvent {
    pub fn open(
        attacking_territory: TerritoryId,
        attacking_territory_name: impl Into<String>,
        attacking_ruler: ParticipantId,
        attacking_ruler_name: impl Into<String>,
        target_territory: TerritoryId,
        target_territory_name: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: ConflictId::new(),
            attacking_territory,
            attacking_territory_name: attacking_territory_name.into(),
            attacking_ruler,
            attacking_ruler_name: attacking_ruler_name.into(),
            target_territory,
            target_territory_name: target_territory_name.into(),
            recruitment_opened_at: now,
            recruitment_deadline: now + RECRUITMENT_WINDOW,
            signups: Vec::new(),
            launched_at: None,
            rally_deadline: None,
            defenders: Vec::new(),
            expired: false,
            outcome: None,
        }
    }

    /// Sign up as an attacker
    ///
    /// Valid only before launch and before the recruitment deadline. The
    /// caller has already charged the entry cost and verified the
    /// participant is physically present at the target territory.
    pub fn signup(&mut self, participant: ParticipantId, now: Timestamp) -> bool {
        if self.launched() || self.expired || now >= self.recruitment_deadline {
            return false;
        }
        if !self.signups.contains(&participant) {
            self.signups.push(participant);
        }
        true
    }

    pub fn can_launch(&self) -> bool {
        self.signups.len() >= MIN_INVASION_ATTACKERS && !self.launched() && !self.expired
    }

    /// Launch the campaign, freezing signups as the attacker roster
    ///
    /// No-op unless `can_launch()`. Opens the rally window for defenders.
    pub fn launch(&mut self, now: Timestamp) -> bool {
        if !self.can_launch() {
            return false;
        }
        self.launched_at = Some(now);
        self.rally_deadline = Some(now + RALLY_WINDOW);
        true
    }

    /// Join the defense during the rally window
    pub fn join_defender(&mut self, participant: ParticipantId, now: Timestamp) -> bool {
        let Some(rally_deadline) = self.rally_deadline else {
            return false;
        };
        if self.resolved() || now >= rally_deadline {
            return false;
        }
        if self.signups.contains(&participant) {
            return false;
        }
        if !self.defenders.contains(&participant) {
            self.defenders.push(participant);
        }
        true
    }

    /// Sole resolution trigger; meaningful only once launched
    pub fn should_resolve(&self, now: Timestamp) -> bool {
        match self.rally_deadline {
            Some(deadline) => now >= deadline && !self.resolved(),
            None => false,
        }
    }

    /// An unlaunched campaign past its recruitment deadline is dead
    pub fn should_expire(&self, now: Timestamp) -> bool {
        !self.launched() && !self.expired && now >= self.recruitment_deadline
    }

    /// Move to the terminal expired state; no further operations accepted
    pub fn expire(&mut self, now: Timestamp) -> bool {
        if !self.should_expire(now) {
            return false;
        }
        self.expired = true;
        true
    }

    /// Total gold committed by the signups, charged at signup time by the
    /// economy collaborator. Informational.
    pub fn total_cost(&self) -> Gold {
        self.signups.len() as Gold * INVASION_ENTRY_COST
    }

    pub fn time_remaining(&self, now: Timestamp) -> Duration {
        let deadline = self.rally_deadline.unwrap_or(self.recruitment_deadline);
        deadline.saturating_duration_since(now)
    }

    pub fn phase(&self) -> InvasionPhase {
        if self.expired {
            InvasionPhase::Expired
        } else if self.resolved() {
            InvasionPhase::Resolved
        } else if self.launched() {
            InvasionPhase::Rallying
        } else {
            InvasionPhase::Recruiting
        }
    }

    pub fn launched(&self) -> bool {
        self.launched_at.is_some()
    }

    pub fn resolved(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn signups(&self) -> &[ParticipantId] {
        &self.signups
    }

    pub fn defenders(&self) -> &[ParticipantId] {
        &self.defenders
    }

    pub fn outcome(&self) -> Option<&InvasionOutcome> {
        self.outcome.as_ref()
    }

    pub(crate) fn record_outcome(&mut self, outcome: InvasionOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }
}
