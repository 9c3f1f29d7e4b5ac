//! Wizard Domain Types
//!
//! A wizard is a multi-step submission flow: several screens build up
//! one draft, each screen gates forward progress on its own fields,
//! and the last screen commits the draft with a single network call.
//!
//! # Key Concepts
//!
//! - **Draft**: the accumulator for one wizard run, either a
//!   [`ReportDraft`] or a [`ReferenceDraft`].
//! - **Step**: one screen, identified by [`StepId`], owning a subset
//!   of draft fields. A [`StepPlan`] orders the steps of a route.
//! - **TextField**: free-text input with an explicit
//!   pristine/dirty placeholder state.
//! - **CommitOutcome**: how the terminal submission resolved.
//! - **BridgeEvent**: what a Reference wizard hands back to the
//!   screen that launched it.

#![deny(unsafe_code)]

mod attachment;
mod draft;
mod errors;
mod field;
mod ids;
mod outcome;
mod state;
mod step;

pub use attachment::*;
pub use draft::*;
pub use errors::*;
pub use field::*;
pub use ids::*;
pub use outcome::*;
pub use state::*;
pub use step::*;
