//! Category affinity: which post categories a user likes most.

use crate::model::LikeFact;
use serde::Serialize;
use std::collections::BTreeMap;

/// One category and how many of the user's likes landed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAffinity {
    pub category: String,
    pub like_count: usize,
}

/// Ranks categories by how often the user liked posts in them.
///
/// Likes with an absent or blank category copy are skipped. Output is sorted
/// by count descending; equal counts are ordered lexicographically so the
/// result does not depend on input order.
pub fn category_affinity<L: LikeFact>(likes: &[L]) -> Vec<CategoryAffinity> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for like in likes {
        match like.category().map(str::trim) {
            Some(category) if !category.is_empty() => *counts.entry(category).or_default() += 1,
            _ => {}
        }
    }

    let mut ranked: Vec<CategoryAffinity> = counts
        .into_iter()
        .map(|(category, like_count)| CategoryAffinity {
            category: category.to_string(),
            like_count,
        })
        .collect();

    // Stable sort keeps the BTreeMap's lexicographic order within equal counts
    ranked.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    fn categories(affinity: &[CategoryAffinity]) -> Vec<&str> {
        affinity.iter().map(|a| a.category.as_str()).collect()
    }

    struct TestLike(Option<&'static str>);

    impl LikeFact for TestLike {
        fn category(&self) -> Option<&str> {
            self.0
        }
    }

    fn likes(categories: &[Option<&'static str>]) -> Vec<TestLike> {
        categories.iter().map(|c| TestLike(*c)).collect()
    }

    #[test]
    fn test_affinity_sorted_by_count_desc() {
        let input = likes(&[
            Some("main"),
            Some("dessert"),
            Some("dessert"),
            Some("soup"),
            Some("dessert"),
            Some("main"),
        ]);

        let ranked = category_affinity(&input);

        assert_eq!(categories(&ranked), vec!["dessert", "main", "soup"]);
        assert_eq!(ranked[0].like_count, 3);
        assert_eq!(ranked[1].like_count, 2);
        assert_eq!(ranked[2].like_count, 1);
    }

    #[test]
    fn test_affinity_skips_missing_categories() {
        let input = likes(&[None, Some("  "), Some("dessert"), Some("")]);

        let ranked = category_affinity(&input);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].category, "dessert");
    }

    #[test]
    fn test_affinity_empty_input() {
        let ranked = category_affinity::<TestLike>(&[]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_affinity_ties_are_lexicographic() {
        let input = likes(&[Some("zucchini"), Some("bread"), Some("pasta")]);

        let ranked = category_affinity(&input);

        assert_eq!(categories(&ranked), vec!["bread", "pasta", "zucchini"]);
    }

    #[test]
    fn test_affinity_trims_labels() {
        let input = likes(&[Some("dessert "), Some(" dessert")]);

        let ranked = category_affinity(&input);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].like_count, 2);
    }

    #[test]
    fn test_affinity_independent_of_input_order() {
        let mut input = likes(&[
            Some("dessert"),
            Some("dessert"),
            Some("main"),
            Some("soup"),
            Some("soup"),
            Some("soup"),
            None,
        ]);
        let expected = category_affinity(&input);

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            input.shuffle(&mut rng);
            assert_eq!(category_affinity(&input), expected);
        }
    }

    #[test]
    fn test_affinity_end_to_end_example() {
        let input = likes(&[Some("dessert"), Some("dessert"), Some("main")]);

        let ranked = category_affinity(&input);

        assert_eq!(categories(&ranked), vec!["dessert", "main"]);
    }
}
