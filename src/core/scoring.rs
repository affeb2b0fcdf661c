use crate::models::{Caregiver, CityFilter, PreferenceProfile, RankedResult, ScoringWeights};

/// Calculate a compatibility score (0-1) for a caregiver against a preference
/// profile.
///
/// Scoring formula (default weights):
/// score = (
///     specialization_overlap * 50 +   # shared specializations / requested
///     experience_sufficiency * 20 +   # band >= requested minimum
///     keyword_resonance * 15 +        # keywords found in bio / requested
///     reputation * 15                 # rating / 5, always applied
/// ) / 100
///
/// Components with no stated preference earn a flat neutral credit instead of
/// zero, so preference-agnostic requesters are not penalized. Deterministic:
/// identical inputs always produce the identical value.
pub fn compatibility_score(
    caregiver: &Caregiver,
    profile: &PreferenceProfile,
    weights: &ScoringWeights,
) -> f64 {
    let specialization = specialization_points(caregiver, profile, weights.specialization);
    let experience = experience_points(caregiver, profile, weights.experience);
    let keywords = keyword_points(caregiver, profile, weights.keywords);
    let reputation = reputation_points(caregiver, weights.reputation);

    let earned = specialization + experience + keywords + reputation;
    let total = weights.total();
    if total <= 0.0 {
        return 0.0;
    }

    (earned / total).clamp(0.0, 1.0)
}

/// Specialization overlap: fraction of requested specializations the caregiver
/// holds, scaled to the weight. Half credit when none are requested.
#[inline]
fn specialization_points(caregiver: &Caregiver, profile: &PreferenceProfile, weight: f64) -> f64 {
    if profile.specializations.is_empty() {
        return weight * 0.5;
    }

    let matched = caregiver
        .specializations
        .iter()
        .filter(|s| profile.specializations.contains(s))
        .count() as f64;

    weight * matched / profile.specializations.len() as f64
}

/// Experience sufficiency: full weight iff the caregiver's band is at least the
/// requested minimum on the band ordering; half credit when no minimum stated.
#[inline]
fn experience_points(caregiver: &Caregiver, profile: &PreferenceProfile, weight: f64) -> f64 {
    match profile.min_experience {
        None => weight * 0.5,
        Some(min) if caregiver.experience >= min => weight,
        Some(_) => 0.0,
    }
}

/// Keyword resonance: fraction of requested keywords found (case-insensitive
/// substring) in the bio, scaled to the weight. One-third credit when none are
/// requested.
#[inline]
fn keyword_points(caregiver: &Caregiver, profile: &PreferenceProfile, weight: f64) -> f64 {
    if profile.keywords.is_empty() {
        return weight / 3.0;
    }

    let bio = caregiver.bio.to_lowercase();
    let found = profile
        .keywords
        .iter()
        .filter(|kw| bio.contains(&kw.to_lowercase()))
        .count() as f64;

    weight * found / profile.keywords.len() as f64
}

/// Reputation: rating / 5 scaled to the weight. Always applied; reputation is a
/// trust signal independent of requester preferences.
#[inline]
fn reputation_points(caregiver: &Caregiver, weight: f64) -> f64 {
    weight * (caregiver.rating / 5.0).clamp(0.0, 1.0)
}

/// Score every non-vacationing caregiver in the selected city.
///
/// Replaces the predicate pipeline under preference matching: vacation
/// exclusion and the city restriction remain hard filters, every survivor is
/// scored. Catalog order is preserved for downstream stable ranking.
pub fn score_catalog(
    catalog: &[Caregiver],
    profile: &PreferenceProfile,
    city: &CityFilter,
    weights: &ScoringWeights,
) -> Vec<RankedResult> {
    catalog
        .iter()
        .filter(|c| !c.on_vacation)
        .filter(|c| city.accepts(&c.city))
        .map(|c| RankedResult {
            match_score: Some(compatibility_score(c, profile, weights)),
            caregiver: c.clone(),
            is_sponsored: false,
        })
        .collect()
}
