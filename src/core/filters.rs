use crate::models::{Availability, Caregiver, Requester, RequesterRole, SearchCriteria};

/// Check a caregiver against the free-text query.
///
/// The trimmed, case-insensitive query must appear as a substring of the name,
/// match one of the specialization labels, or appear as a substring of the bio.
/// An empty query matches everything.
#[inline]
pub fn matches_query(caregiver: &Caregiver, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    if caregiver.name.to_lowercase().contains(&needle) {
        return true;
    }

    if caregiver
        .specializations
        .iter()
        .any(|s| s.label() == needle)
    {
        return true;
    }

    caregiver.bio.to_lowercase().contains(&needle)
}

/// Check a caregiver against the availability filter.
///
/// Exact match, with one alias: a request for "this week" also accepts
/// caregivers available today.
#[inline]
pub fn matches_availability(caregiver: &Caregiver, requested: Availability) -> bool {
    caregiver.availability == requested
        || (requested == Availability::ThisWeek && caregiver.availability == Availability::Today)
}

/// Check that the caregiver holds every requested certification (AND semantics)
#[inline]
pub fn holds_certifications(caregiver: &Caregiver, requested: &[String]) -> bool {
    requested.iter().all(|cert| {
        caregiver
            .certifications
            .iter()
            .any(|held| held.eq_ignore_ascii_case(cert))
    })
}

/// Check the favorites predicate.
///
/// Only family-role requesters maintain a favorites set; for any other
/// requester the predicate matches nothing rather than being silently ignored.
#[inline]
pub fn matches_favorites(caregiver: &Caregiver, requester: Option<&Requester>) -> bool {
    match requester {
        Some(r) if r.role == RequesterRole::Family => r.favorites.contains(&caregiver.id),
        _ => false,
    }
}

/// Apply the full predicate pipeline over the catalog.
///
/// Pure and deterministic for fixed inputs; catalog order is preserved. An
/// empty result set is a valid outcome.
pub fn apply_filters(
    catalog: &[Caregiver],
    criteria: &SearchCriteria,
    requester: Option<&Requester>,
) -> Vec<Caregiver> {
    catalog
        .iter()
        // Vacationing caregivers are excluded unconditionally
        .filter(|c| !c.on_vacation)
        .filter(|c| matches_query(c, &criteria.query))
        .filter(|c| criteria.city.accepts(&c.city))
        .filter(|c| {
            criteria
                .availability
                .map(|a| matches_availability(c, a))
                .unwrap_or(true)
        })
        .filter(|c| {
            criteria
                .experience
                .map(|band| c.experience == band)
                .unwrap_or(true)
        })
        .filter(|c| holds_certifications(c, &criteria.certifications))
        .filter(|c| !criteria.favorites_only || matches_favorites(c, requester))
        .cloned()
        .collect()
}
