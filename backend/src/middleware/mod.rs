//! Actix middleware shared by every route.
//!
//! [`Trace`] wraps the whole app so handler logs and error envelopes carry the
//! same request identifier.

pub mod trace;

pub use trace::Trace;
