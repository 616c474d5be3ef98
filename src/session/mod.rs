//! Shared-session machinery: the channel registry and recruitment phase.

pub mod errors;
pub mod recruitment;
pub mod registry;

pub use errors::{SessionError, SessionResult};
pub use recruitment::{RecruitOutcome, Recruitment};
pub use registry::{GameKind, SessionRegistry, SessionTicket};
