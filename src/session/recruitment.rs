//! Recruitment phase for multi-party games.
//!
//! Joining debits the entry fee immediately, so the pot is already collected
//! when the deadline hits. All joins and the close run behind one mutex;
//! a join can never interleave with the deadline close, which means refunds
//! on cancellation are exact and happen once.

use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::ledger::{LedgerError, LedgerStore, UserId};

use super::errors::{SessionError, SessionResult};

enum RecruitState {
    Open { members: Vec<UserId> },
    Closed,
}

/// What closing the recruitment produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecruitOutcome {
    /// Enough members joined; the crew is locked in join order.
    Locked { crew: Vec<UserId> },
    /// Too few members; every fee was refunded.
    Cancelled { refunded: Vec<UserId> },
}

/// An open recruitment drive with its collected stakes.
pub struct Recruitment {
    store: Arc<dyn LedgerStore>,
    entry_fee: i64,
    min_crew: usize,
    max_crew: usize,
    deadline: Instant,
    state: Mutex<RecruitState>,
}

impl Recruitment {
    /// Open recruitment with the initiator as the first member, debiting
    /// their entry fee.
    pub async fn open(
        store: Arc<dyn LedgerStore>,
        initiator: UserId,
        entry_fee: i64,
        min_crew: usize,
        max_crew: usize,
        window: std::time::Duration,
    ) -> SessionResult<Self> {
        debit_fee(store.as_ref(), initiator, entry_fee).await?;
        info!("User {initiator} opened recruitment (fee {entry_fee}, window {window:?})");

        Ok(Self {
            store,
            entry_fee,
            min_crew,
            max_crew,
            deadline: Instant::now() + window,
            state: Mutex::new(RecruitState::Open {
                members: vec![initiator],
            }),
        })
    }

    /// When the recruitment window ends.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Join the crew, debiting the entry fee.
    ///
    /// # Errors
    ///
    /// `RecruitmentClosed` past the deadline or after close, `AlreadyJoined`,
    /// `CrewFull`, or the ledger's `InsufficientBalance`.
    pub async fn join(&self, user_id: UserId) -> SessionResult<usize> {
        let mut state = self.state.lock().await;
        let members = match &mut *state {
            RecruitState::Open { members } if Instant::now() < self.deadline => members,
            _ => return Err(SessionError::RecruitmentClosed),
        };

        if members.contains(&user_id) {
            return Err(SessionError::AlreadyJoined(user_id));
        }
        if members.len() >= self.max_crew {
            return Err(SessionError::CrewFull { max: self.max_crew });
        }

        debit_fee(self.store.as_ref(), user_id, self.entry_fee).await?;
        members.push(user_id);
        info!("User {user_id} joined recruitment ({} members)", members.len());
        Ok(members.len())
    }

    /// Close recruitment: lock the crew if the minimum was met, otherwise
    /// cancel and refund every collected fee.
    ///
    /// # Errors
    ///
    /// `RecruitmentClosed` if already closed.
    pub async fn close(&self) -> SessionResult<RecruitOutcome> {
        let mut state = self.state.lock().await;
        let members = match std::mem::replace(&mut *state, RecruitState::Closed) {
            RecruitState::Open { members } => members,
            RecruitState::Closed => return Err(SessionError::RecruitmentClosed),
        };

        if members.len() >= self.min_crew {
            info!("Recruitment locked with {} members", members.len());
            return Ok(RecruitOutcome::Locked { crew: members });
        }

        for &member in &members {
            self.store.adjust_pocket(member, self.entry_fee).await?;
        }
        info!("Recruitment cancelled, refunded {} members", members.len());
        Ok(RecruitOutcome::Cancelled { refunded: members })
    }

    /// Members collected so far, in join order.
    pub async fn members(&self) -> Vec<UserId> {
        match &*self.state.lock().await {
            RecruitState::Open { members } => members.clone(),
            RecruitState::Closed => Vec::new(),
        }
    }
}

async fn debit_fee(store: &dyn LedgerStore, user_id: UserId, fee: i64) -> SessionResult<()> {
    // adjust_pocket clamps rather than rejects, so check sufficiency first.
    let account = store.get_balance(user_id).await?;
    if account.pocket < fee {
        return Err(SessionError::Ledger(LedgerError::InsufficientBalance {
            available: account.pocket,
            required: fee,
        }));
    }
    store.adjust_pocket(user_id, -fee).await?;
    Ok(())
}
