use crate::model::{FeedItem, LikeCounts};
use std::cmp::Ordering;

/// Orders posts by like count (most first), then creation time (newest
/// first), then id. The id step makes the order total when two posts share
/// a count and a timestamp.
pub fn popularity_cmp<P, C>(a: &P, b: &P, counts: &C) -> Ordering
where
    P: FeedItem,
    C: LikeCounts + ?Sized,
{
    counts
        .like_count(b.id())
        .cmp(&counts.like_count(a.id()))
        .then_with(|| b.created_at().cmp(&a.created_at()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Newest first, falling back to [`popularity_cmp`].
pub fn recency_cmp<P, C>(a: &P, b: &P, counts: &C) -> Ordering
where
    P: FeedItem,
    C: LikeCounts + ?Sized,
{
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| popularity_cmp(a, b, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rand::seq::SliceRandom;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn sort_by_popularity<P: FeedItem, C: LikeCounts>(items: &mut [P], counts: &C) {
        items.sort_by(|a, b| popularity_cmp(a, b, counts));
    }

    struct TestPost {
        id: Uuid,
        created_at: DateTime<Utc>,
    }

    impl FeedItem for TestPost {
        fn id(&self) -> Uuid {
            self.id
        }

        fn category(&self) -> Option<&str> {
            None
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    fn create_test_post(ts: i64) -> TestPost {
        TestPost {
            id: Uuid::new_v4(),
            created_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[test]
    fn test_equal_likes_newer_first() {
        let older = create_test_post(100);
        let newer = create_test_post(200);
        let counts: HashMap<Uuid, i64> = [(older.id, 5), (newer.id, 5)].into_iter().collect();

        assert_eq!(popularity_cmp(&newer, &older, &counts), Ordering::Less);
        assert_eq!(popularity_cmp(&older, &newer, &counts), Ordering::Greater);
    }

    #[test]
    fn test_more_likes_first_regardless_of_time() {
        let popular_old = create_test_post(100);
        let fresh = create_test_post(10_000);
        let counts: HashMap<Uuid, i64> =
            [(popular_old.id, 6), (fresh.id, 5)].into_iter().collect();

        assert_eq!(popularity_cmp(&popular_old, &fresh, &counts), Ordering::Less);
    }

    #[test]
    fn test_missing_counts_treated_as_zero() {
        let liked = create_test_post(100);
        let unliked = create_test_post(500);
        let counts: HashMap<Uuid, i64> = [(liked.id, 1)].into_iter().collect();

        assert_eq!(popularity_cmp(&liked, &unliked, &counts), Ordering::Less);
    }

    #[test]
    fn test_total_order_on_identical_keys() {
        let a = create_test_post(100);
        let b = create_test_post(100);
        let counts: HashMap<Uuid, i64> = HashMap::new();

        assert_ne!(popularity_cmp(&a, &b, &counts), Ordering::Equal);
        assert_eq!(popularity_cmp(&a, &a, &counts), Ordering::Equal);
        assert_eq!(
            popularity_cmp(&a, &b, &counts),
            popularity_cmp(&b, &a, &counts).reverse()
        );
    }

    #[test]
    fn test_sort_is_deterministic_under_shuffle() {
        let mut posts: Vec<TestPost> = (0..12).map(|i| create_test_post(i % 4)).collect();
        let counts: HashMap<Uuid, i64> = posts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, (i % 3) as i64))
            .collect();

        sort_by_popularity(&mut posts, &counts);
        let expected: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            posts.shuffle(&mut rng);
            sort_by_popularity(&mut posts, &counts);
            let actual: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_recency_cmp_prefers_newer() {
        let older = create_test_post(100);
        let newer = create_test_post(200);
        let counts: HashMap<Uuid, i64> = [(older.id, 50)].into_iter().collect();

        assert_eq!(recency_cmp(&newer, &older, &counts), Ordering::Less);
    }
}
