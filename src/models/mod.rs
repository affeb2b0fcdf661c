// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Availability, Caregiver, CityFilter, ExperienceBand, Mode, PreferenceProfile, RankedResult,
    Requester, RequesterRole, ScoringWeights, SearchCriteria, SortKey, Specialty,
};
pub use requests::{MatchRequest, ReverseLocationQuery, SearchRequest};
pub use responses::{DiscoveryResponse, ErrorResponse, HealthResponse, ReverseLocationResponse};
