//! # Codeblock Guard
//!
//! Watches chat messages for badly formatted code pastes, posts one advisory
//! per offending message and takes it back once the author fixes the paste.
//!
//! ## Flow
//!
//! ```text
//! new message ──> EligibilityGate ──> cooldown ──> AdvisoryComposer
//!                                                     │
//!                                   send ─> CorrectionTracker.flag
//!                                        ─> schedule_expiry
//!                                        ─> CooldownLedger.stamp
//!
//! edit ──> CorrectionTracker.reconcile ──> fetch + delete advisory ──> clear
//! ```
//!
//! The chat platform is reached only through the traits in [`ports`].

mod config;
mod credentials;
mod directory;
mod eligibility;
mod error;
mod guard;
pub mod model;
pub mod ports;
mod tracker;

pub use config::{ChannelEntry, GuardConfig, DEBUG_ENV};
pub use credentials::{NoCredentials, TokenPatternScanner};
pub use directory::StaticDirectory;
pub use eligibility::{Admission, CooldownLedger, EligibilityGate, Rejection};
pub use error::{GuardError, MessagingError, Result};
pub use guard::{Collaborators, Guard, GuardState};
pub use tracker::{CorrectionTracker, Reconciliation};
