//! Subscription management for listgate.
//!
//! Subscribe requests go through the policy resolver; the resolver's
//! verdict decides whether the engine adds the member, records a pending
//! request, or does nothing.

mod service;

pub use service::MemberService;
