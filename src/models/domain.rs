use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Specialization tags a caregiver can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Alzheimer,
    Parkinson,
    Dementia,
    PostSurgical,
    ReducedMobility,
    Diabetes,
    Palliative,
    Companionship,
}

impl Specialty {
    /// Label used for free-text matching against search queries
    pub fn label(&self) -> &'static str {
        match self {
            Specialty::Alzheimer => "alzheimer",
            Specialty::Parkinson => "parkinson",
            Specialty::Dementia => "dementia",
            Specialty::PostSurgical => "post_surgical",
            Specialty::ReducedMobility => "reduced_mobility",
            Specialty::Diabetes => "diabetes",
            Specialty::Palliative => "palliative",
            Specialty::Companionship => "companionship",
        }
    }
}

/// Years-of-experience band. The declared order is the ordering used by the
/// scorer's experience-sufficiency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "0-2")]
    Years0To2,
    #[serde(rename = "3-5")]
    Years3To5,
    #[serde(rename = "6-10")]
    Years6To10,
    #[serde(rename = "10+")]
    Years10Plus,
}

/// Availability tag for a caregiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Today,
    ThisWeek,
    Other,
}

/// Caregiver profile eligible for discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caregiver {
    pub id: Uuid,
    pub name: String,
    /// Display city in `"City, ST"` form
    pub city: String,
    #[serde(default)]
    pub specializations: Vec<Specialty>,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub experience: ExperienceBand,
    #[serde(default)]
    pub bio: String,
    pub rating: f64,
    #[serde(rename = "reviewCount", default)]
    pub review_count: u32,
    pub availability: Availability,
    #[serde(rename = "isOnline", default)]
    pub is_online: bool,
    /// Sponsorship window: placement boost while this timestamp is in the future
    #[serde(rename = "highlightedUntil", default)]
    pub highlighted_until: Option<DateTime<Utc>>,
    /// While set, the caregiver is excluded from every result set
    #[serde(rename = "onVacation", default)]
    pub on_vacation: bool,
}

impl Caregiver {
    /// Whether the sponsorship window is still open at `now`
    pub fn sponsored_at(&self, now: DateTime<Utc>) -> bool {
        self.highlighted_until.map(|until| until > now).unwrap_or(false)
    }
}

/// City restriction shared by both search modes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityFilter {
    #[default]
    Any,
    City(String),
}

impl CityFilter {
    pub fn accepts(&self, city: &str) -> bool {
        match self {
            CityFilter::Any => true,
            CityFilter::City(selected) => selected == city,
        }
    }
}

/// Predicate-based search criteria
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub city: CityFilter,
    #[serde(default)]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub experience: Option<ExperienceBand>,
    /// AND semantics: a caregiver must hold every requested certification
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(rename = "favoritesOnly", default)]
    pub favorites_only: bool,
}

/// Preference profile driving score-based matching
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub specializations: Vec<Specialty>,
    #[serde(rename = "minExperience", default)]
    pub min_experience: Option<ExperienceBand>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Active search mode. Predicate filtering and preference scoring are mutually
/// exclusive; the selected city lives outside the mode so it survives switches.
#[derive(Debug, Clone)]
pub enum Mode {
    Filter(SearchCriteria),
    Preference(PreferenceProfile),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Filter(SearchCriteria::default())
    }
}

/// Role of the requesting account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequesterRole {
    Family,
    Caregiver,
}

/// Requester identity as far as discovery cares: role plus favorites set
#[derive(Debug, Clone)]
pub struct Requester {
    pub role: RequesterRole,
    pub favorites: HashSet<Uuid>,
}

impl Requester {
    pub fn family(favorites: HashSet<Uuid>) -> Self {
        Self {
            role: RequesterRole::Family,
            favorites,
        }
    }
}

/// Secondary sort key in plain filter mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Rating,
    Reviews,
    #[default]
    Relevance,
}

/// A caregiver surviving filtering or scoring, annotated for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub caregiver: Caregiver,
    /// Present only under preference matching, normalized to [0,1]
    #[serde(rename = "matchScore")]
    pub match_score: Option<f64>,
    #[serde(rename = "isSponsored")]
    pub is_sponsored: bool,
}

/// Scoring weights for the compatibility scorer
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub specialization: f64,
    pub experience: f64,
    pub keywords: f64,
    pub reputation: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.specialization + self.experience + self.keywords + self.reputation
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            specialization: 50.0,
            experience: 20.0,
            keywords: 15.0,
            reputation: 15.0,
        }
    }
}
