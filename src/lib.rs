//! Bayesian turnip market pattern predictor.
//!
//! Given the Sunday anchor price, up to twelve half-day price readings, and
//! optionally last week's pattern, ranks the four weekly market patterns by
//! posterior probability and attaches an expected sell range and advice to
//! each.

pub mod domain;
pub mod engine;
pub mod model;
pub mod store;
