//! Care Match - candidate discovery and ranking engine for a care-services
//! marketplace
//!
//! This library pairs families with caregivers: a predicate filter pipeline,
//! a weighted compatibility scorer, a sponsorship-aware stable ranker and a
//! batch-reveal pagination cursor, plus an async location resolver that turns
//! device coordinates into a known catalog city.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    compatibility_score, DiscoveryEngine, DiscoverySession, LocationResolver, ResultPage,
    SessionConfig,
};
pub use models::{
    Caregiver, CityFilter, PreferenceProfile, RankedResult, ScoringWeights, SearchCriteria,
    SortKey,
};
