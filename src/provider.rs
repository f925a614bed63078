//! Provider-facing configuration (data) and strategies (behavior).
//!
//! `config` exposes the validated, immutable-after-load [`ProviderConfig`]: endpoints, scopes,
//! client secret, and compiled filter axes. `strategy` defines [`ProviderStrategy`], the uniform
//! capability set every supported provider implements; the per-provider modules hold the
//! envelope schemas and claim tables.

pub mod config;
pub mod discord;
pub mod facebook;
pub mod github;
pub mod gitlab;
pub mod linkedin;
pub mod strategy;

pub use config::*;
pub use discord::*;
pub use facebook::*;
pub use github::*;
pub use gitlab::*;
pub use linkedin::*;
pub use strategy::*;
