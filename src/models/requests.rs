use crate::models::{
    Availability, CityFilter, ExperienceBand, PreferenceProfile, Requester, RequesterRole,
    SearchCriteria, SortKey, Specialty,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

/// Request for a predicate-based search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(max = 120))]
    #[serde(default)]
    pub query: String,
    /// Selected city; `null` or `"any"` means no restriction
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub experience: Option<ExperienceBand>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(alias = "favorites_only", rename = "favoritesOnly", default)]
    pub favorites_only: bool,
    #[serde(alias = "requester_role", rename = "requesterRole", default)]
    pub requester_role: Option<RequesterRole>,
    #[serde(default)]
    pub favorites: Vec<Uuid>,
    #[serde(default)]
    pub sort: SortKey,
    /// Cursor position the client has already revealed, if any
    #[serde(alias = "visible_count", rename = "visibleCount", default)]
    pub visible_count: Option<usize>,
}

impl SearchRequest {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            query: self.query.clone(),
            city: city_filter(self.city.as_deref()),
            availability: self.availability,
            experience: self.experience,
            certifications: self.certifications.clone(),
            favorites_only: self.favorites_only,
        }
    }

    pub fn requester(&self) -> Option<Requester> {
        self.requester_role.map(|role| Requester {
            role,
            favorites: self.favorites.iter().copied().collect::<HashSet<_>>(),
        })
    }
}

/// Request for a preference-based (AI) match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[serde(default)]
    pub specializations: Vec<Specialty>,
    #[serde(alias = "min_experience", rename = "minExperience", default)]
    pub min_experience: Option<ExperienceBand>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(alias = "visible_count", rename = "visibleCount", default)]
    pub visible_count: Option<usize>,
}

impl MatchRequest {
    pub fn profile(&self) -> PreferenceProfile {
        PreferenceProfile {
            specializations: self.specializations.clone(),
            min_experience: self.min_experience,
            keywords: self.keywords.clone(),
        }
    }

    pub fn city_filter(&self) -> CityFilter {
        city_filter(self.city.as_deref())
    }
}

/// Query parameters for reverse location lookup
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseLocationQuery {
    pub lat: f64,
    pub lon: f64,
}

fn city_filter(city: Option<&str>) -> CityFilter {
    match city {
        None => CityFilter::Any,
        Some(c) if c.trim().is_empty() || c.trim().eq_ignore_ascii_case("any") => CityFilter::Any,
        Some(c) => CityFilter::City(c.trim().to_string()),
    }
}
