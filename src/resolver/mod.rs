//! Address resolution subsystem.
//!
//! # Data Flow
//! ```text
//! raw input ("0xabc…", "alice.eth", "garbage")
//!     → classify.rs (literal address | domain name | invalid, no network)
//!     → classify.rs (domain syntax check + namehash)
//!     → name_resolver.rs (registry.resolver(node) → resolver.addr(node))
//!     → validation.rs (per-input ValidationResult for callers)
//!     → batch.rs (concurrent fan-out, one isolated task per name)
//! ```
//!
//! # Outcomes
//! - `NotFound` is a normal answer: no resolver, or a resolver with no address
//! - `ResolutionError` is a transport or revert failure and is never folded
//!   into `NotFound` or "invalid"
//! - Malformed names are rejected before any network call

pub mod batch;
pub mod classify;
pub mod name_resolver;
pub mod validation;

pub use batch::resolve_all;
pub use classify::{classify, namehash, validate_domain_name, Classification, DomainNameError};
pub use name_resolver::{
    LookupStage, NameLookup, NameResolver, Resolution, ResolutionError, ResolveError,
};
pub use validation::{validate_and_resolve, ValidationResult};
