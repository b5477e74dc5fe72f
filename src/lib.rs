//! kvmhost — one-shot provisioning of an Apache CloudStack KVM host.
//!
//! A plan is an ordered list of steps (commands, file writes, in-place
//! edits) run once, in sequence, against a host. Fatal failures stop the
//! run; tolerant ones are reported and skipped.

pub mod cli;
pub mod core;
pub mod logging;
pub mod transport;
