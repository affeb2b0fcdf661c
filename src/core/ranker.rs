use crate::models::{RankedResult, SortKey};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Secondary ordering applied after the sponsorship boost
#[derive(Debug, Clone, Copy)]
pub enum RankOrder {
    /// Plain filter mode: requester-selected sort key
    Sort(SortKey),
    /// Preference mode: descending match score
    Score,
}

/// Order the filtered-or-scored set in place.
///
/// Primary key: an open sponsorship window sorts before everything else, in
/// both modes. Secondary key per `order`. The sort is stable, so equal keys
/// preserve catalog order; two candidates with identical scores never swap
/// positions between recomputations of the same list.
pub fn rank(results: &mut [RankedResult], order: RankOrder, now: DateTime<Utc>) {
    for result in results.iter_mut() {
        result.is_sponsored = result.caregiver.sponsored_at(now);
    }

    results.sort_by(|a, b| {
        sponsorship_key(b)
            .cmp(&sponsorship_key(a))
            .then_with(|| secondary_key(a, b, order))
    });
}

#[inline]
fn sponsorship_key(result: &RankedResult) -> u8 {
    u8::from(result.is_sponsored)
}

#[inline]
fn secondary_key(a: &RankedResult, b: &RankedResult, order: RankOrder) -> Ordering {
    match order {
        RankOrder::Sort(SortKey::Relevance) => Ordering::Equal,
        RankOrder::Sort(SortKey::Rating) => b
            .caregiver
            .rating
            .partial_cmp(&a.caregiver.rating)
            .unwrap_or(Ordering::Equal),
        RankOrder::Sort(SortKey::Reviews) => b.caregiver.review_count.cmp(&a.caregiver.review_count),
        RankOrder::Score => b
            .match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Caregiver, ExperienceBand};
    use chrono::Duration;
    use uuid::Uuid;

    fn create_result(name: &str, rating: f64, reviews: u32, score: Option<f64>) -> RankedResult {
        RankedResult {
            caregiver: Caregiver {
                id: Uuid::new_v4(),
                name: name.to_string(),
                city: "Recife, PE".to_string(),
                specializations: vec![],
                certifications: vec![],
                experience: ExperienceBand::Years3To5,
                bio: String::new(),
                rating,
                review_count: reviews,
                availability: Availability::Today,
                is_online: true,
                highlighted_until: None,
                on_vacation: false,
            },
            match_score: score,
            is_sponsored: false,
        }
    }

    fn names(results: &[RankedResult]) -> Vec<&str> {
        results.iter().map(|r| r.caregiver.name.as_str()).collect()
    }

    #[test]
    fn test_sponsored_sorts_first_regardless_of_rating() {
        let now = Utc::now();
        let mut boosted = create_result("boosted", 2.0, 1, None);
        boosted.caregiver.highlighted_until = Some(now + Duration::hours(2));
        let organic = create_result("organic", 5.0, 500, None);

        let mut results = vec![organic, boosted];
        rank(&mut results, RankOrder::Sort(SortKey::Rating), now);

        assert_eq!(names(&results), vec!["boosted", "organic"]);
        assert!(results[0].is_sponsored);
        assert!(!results[1].is_sponsored);
    }

    #[test]
    fn test_expired_window_gets_no_boost() {
        let now = Utc::now();
        let mut expired = create_result("expired", 2.0, 1, None);
        expired.caregiver.highlighted_until = Some(now - Duration::minutes(5));
        let organic = create_result("organic", 5.0, 500, None);

        let mut results = vec![expired, organic];
        rank(&mut results, RankOrder::Sort(SortKey::Rating), now);

        assert_eq!(names(&results), vec!["organic", "expired"]);
    }

    #[test]
    fn test_rating_sort_descending() {
        let mut results = vec![
            create_result("a", 3.0, 10, None),
            create_result("b", 4.8, 2, None),
            create_result("c", 4.1, 90, None),
        ];
        rank(&mut results, RankOrder::Sort(SortKey::Rating), Utc::now());
        assert_eq!(names(&results), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_reviews_sort_descending() {
        let mut results = vec![
            create_result("a", 3.0, 10, None),
            create_result("b", 4.8, 2, None),
            create_result("c", 4.1, 90, None),
        ];
        rank(&mut results, RankOrder::Sort(SortKey::Reviews), Utc::now());
        assert_eq!(names(&results), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_relevance_preserves_catalog_order() {
        let mut results = vec![
            create_result("first", 1.0, 0, None),
            create_result("second", 5.0, 999, None),
            create_result("third", 3.0, 50, None),
        ];
        rank(&mut results, RankOrder::Sort(SortKey::Relevance), Utc::now());
        assert_eq!(names(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_score_sort_descending() {
        let mut results = vec![
            create_result("a", 0.0, 0, Some(0.65)),
            create_result("b", 0.0, 0, Some(0.97)),
            create_result("c", 0.0, 0, Some(0.80)),
        ];
        rank(&mut results, RankOrder::Score, Utc::now());
        assert_eq!(names(&results), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let mut results = vec![
            create_result("first", 0.0, 0, Some(0.5)),
            create_result("second", 0.0, 0, Some(0.5)),
            create_result("third", 0.0, 0, Some(0.5)),
        ];
        rank(&mut results, RankOrder::Score, Utc::now());
        assert_eq!(names(&results), vec!["first", "second", "third"]);
    }
}
