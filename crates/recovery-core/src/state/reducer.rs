use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use super::{AppState, Profile};
use crate::checkin::{CheckIn, TimeSlot};
use crate::error::Result;
use crate::player::{Clock, CompletedRun};
use crate::quota::{Admission, QuotaGate};
use crate::session::{record_completion, Rating, Session};
use crate::storage::{Config, StateStore};

/// Every way the app state can change.
#[derive(Debug, Clone)]
pub enum Action {
    SetConsent(bool),
    SetPro(bool),
    SetProfile(Profile),
    SubmitCheckIn(CheckIn),
    /// Ask the quota gate to start a routine in `slot`.
    RequestStart(TimeSlot),
    /// Record a finished run. Only a completed player hands out a
    /// [`CompletedRun`], so stopped or abandoned runs cannot get here.
    CompleteSession {
        run: CompletedRun,
        checkin: CheckIn,
        rating: Rating,
    },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    /// Starting needs consent first; nothing changed.
    ConsentRequired,
    Start(Admission),
    Recorded(Session),
}

/// Inputs the reducer needs besides the state itself.
#[derive(Debug, Clone, Copy)]
pub struct ReduceContext {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub gate: QuotaGate,
    pub history_cap: usize,
}

/// Apply one action. Errors leave `state` untouched.
pub fn reduce(state: &mut AppState, action: Action, ctx: &ReduceContext) -> Result<Outcome> {
    match action {
        Action::SetConsent(consented) => state.consented = consented,
        Action::SetPro(is_pro) => state.is_pro = is_pro,
        Action::SetProfile(profile) => state.profile = profile,
        Action::SubmitCheckIn(checkin) => state.last_checkin = Some(checkin.stamped(ctx.now)),
        Action::RequestStart(slot) => {
            if !state.consented {
                return Ok(Outcome::ConsentRequired);
            }
            let admission = ctx
                .gate
                .admit(&mut state.free_daily, state.is_pro, slot, ctx.today);
            return Ok(Outcome::Start(admission));
        }
        Action::CompleteSession {
            run,
            checkin,
            rating,
        } => {
            let session = record_completion(
                &mut state.sessions,
                &mut state.last_checkin,
                &run,
                &checkin,
                rating,
                ctx.now,
                ctx.history_cap,
            )?;
            return Ok(Outcome::Recorded(session));
        }
        Action::Reset => *state = AppState::default(),
    }
    Ok(Outcome::Applied)
}

/// Single owner of the app state. Every dispatched action is reduced and
/// then persisted; a failed write is logged and the in-memory state kept.
pub struct AppStore<S: StateStore> {
    state: AppState,
    store: S,
    gate: QuotaGate,
    history_cap: usize,
    clock: Arc<dyn Clock>,
}

impl<S: StateStore> AppStore<S> {
    /// Load the persisted state (or the default) from `store`.
    pub fn open(store: S, config: &Config, clock: Arc<dyn Clock>) -> Self {
        let state = store.load();
        tracing::debug!(sessions = state.sessions.len(), "app state loaded");
        Self {
            state,
            store,
            gate: config.quota_gate(),
            history_cap: config.history.cap,
            clock,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn shared_clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Free starts left today; `None` for Pro.
    pub fn remaining_free_starts(&self) -> Option<u32> {
        self.gate
            .remaining(&self.state.free_daily, self.state.is_pro, self.clock.today())
    }

    /// The last check-in, or the default one if none was taken yet.
    pub fn current_checkin(&self) -> CheckIn {
        self.state
            .last_checkin
            .map(|last| last.checkin)
            .unwrap_or_default()
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        let ctx = ReduceContext {
            now: self.clock.now(),
            today: self.clock.today(),
            gate: self.gate,
            history_cap: self.history_cap,
        };
        let is_reset = matches!(action, Action::Reset);
        let outcome = reduce(&mut self.state, action, &ctx)?;

        let persisted = if is_reset {
            self.store.clear()
        } else {
            self.store.save(&self.state)
        };
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "failed to persist app state");
        }
        Ok(outcome)
    }
}
