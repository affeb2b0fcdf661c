// Core algorithm exports
pub mod engine;
pub mod filters;
pub mod location;
pub mod paginate;
pub mod ranker;
pub mod scoring;
pub mod session;

pub use engine::DiscoveryEngine;
pub use filters::{apply_filters, holds_certifications, matches_availability, matches_query};
pub use location::{
    Coordinates, LocationNotice, LocationOutcome, LocationResolver, PermissionState, Place,
    PositionError, PositionSource, ResolutionState, ReverseGeocoder,
};
pub use paginate::{ResultPage, DEFAULT_BATCH_SIZE};
pub use ranker::{rank, RankOrder};
pub use scoring::{compatibility_score, score_catalog};
pub use session::{DiscoverySession, SessionConfig, SessionError, SessionSnapshot};
