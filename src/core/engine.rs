use crate::core::{
    filters::apply_filters,
    ranker::{rank, RankOrder},
    scoring::score_catalog,
};
use crate::models::{
    Caregiver, CityFilter, PreferenceProfile, RankedResult, Requester, ScoringWeights,
    SearchCriteria, SortKey,
};
use chrono::{DateTime, Utc};

/// Discovery orchestrator: runs the filter-or-score pipeline and ranks the
/// survivors.
///
/// # Pipeline
/// 1. Predicate filtering (plain mode) or hard filters + scoring (preference
///    mode) over the catalog snapshot
/// 2. Sponsorship boost
/// 3. Stable secondary sort
///
/// Pure and deterministic for a fixed `now`: recomputing twice from the same
/// inputs yields an identical ordered list.
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    weights: ScoringWeights,
}

impl DiscoveryEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Plain filter mode: predicate pipeline, then sponsorship + selected sort
    pub fn search(
        &self,
        catalog: &[Caregiver],
        criteria: &SearchCriteria,
        requester: Option<&Requester>,
        sort: SortKey,
        now: DateTime<Utc>,
    ) -> Vec<RankedResult> {
        let mut results: Vec<RankedResult> = apply_filters(catalog, criteria, requester)
            .into_iter()
            .map(|caregiver| RankedResult {
                caregiver,
                match_score: None,
                is_sponsored: false,
            })
            .collect();

        rank(&mut results, RankOrder::Sort(sort), now);
        results
    }

    /// Preference mode: score every caregiver surviving the vacation and city
    /// hard filters, then sponsorship + descending score
    pub fn preference_match(
        &self,
        catalog: &[Caregiver],
        profile: &PreferenceProfile,
        city: &CityFilter,
        now: DateTime<Utc>,
    ) -> Vec<RankedResult> {
        let mut results = score_catalog(catalog, profile, city, &self.weights);
        rank(&mut results, RankOrder::Score, now);
        results
    }
}

impl Default for DiscoveryEngine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
