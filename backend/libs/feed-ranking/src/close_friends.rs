//! Close-friends inference: who comments most on a user's own posts.

use crate::error::{RankingError, Result};
use crate::model::{CommentFact, FeedItem};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendScore {
    pub name: String,
    pub comment_count: usize,
}

/// Ranks commenters on the posts in `own_posts` by comment count.
///
/// `owners` are the accounts those posts belong to. Comments written by an
/// owner are skipped whatever name they were stored under, as are comments
/// on posts outside `own_posts`. Equal counts are ordered by name.
pub fn infer_close_friends<P, C>(owners: &[Uuid], own_posts: &[P], comments: &[C]) -> Result<Vec<FriendScore>>
where
    P: FeedItem,
    C: CommentFact,
{
    if owners.is_empty() || owners.iter().any(Uuid::is_nil) {
        return Err(RankingError::InvalidInput("owner id must be given and not nil".into()));
    }

    let owned: HashSet<Uuid> = own_posts.iter().map(|p| p.id()).collect();
    if owned.is_empty() {
        return Ok(Vec::new());
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for comment in comments {
        if !owned.contains(&comment.post_id()) {
            continue;
        }
        if comment.commenter_id().is_some_and(|id| owners.contains(&id)) {
            continue;
        }
        let commenter = comment.commenter().trim();
        if commenter.is_empty() {
            continue;
        }
        *counts.entry(commenter).or_default() += 1;
    }

    let mut ranked: Vec<FriendScore> = counts
        .into_iter()
        .map(|(name, comment_count)| FriendScore {
            name: name.to_string(),
            comment_count,
        })
        .collect();
    ranked.sort_by(|a, b| b.comment_count.cmp(&a.comment_count));

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    struct TestPost(Uuid);

    impl FeedItem for TestPost {
        fn id(&self) -> Uuid {
            self.0
        }

        fn category(&self) -> Option<&str> {
            None
        }

        fn created_at(&self) -> DateTime<Utc> {
            Utc.timestamp_opt(0, 0).unwrap()
        }
    }

    struct TestComment {
        post_id: Uuid,
        user_id: Option<Uuid>,
        user: &'static str,
    }

    impl CommentFact for TestComment {
        fn post_id(&self) -> Uuid {
            self.post_id
        }

        fn commenter_id(&self) -> Option<Uuid> {
            self.user_id
        }

        fn commenter(&self) -> &str {
            self.user
        }
    }

    /// Stable id per name so repeated comments come from the same account
    fn user_id(name: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }

    fn comment(post: &TestPost, user: &'static str) -> TestComment {
        TestComment {
            post_id: post.0,
            user_id: Some(user_id(user)),
            user,
        }
    }

    #[test]
    fn test_ranks_by_comment_count() {
        let p1 = TestPost(Uuid::new_v4());
        let p2 = TestPost(Uuid::new_v4());
        let comments = vec![
            comment(&p1, "bob"),
            comment(&p1, "carol"),
            comment(&p2, "carol"),
            comment(&p2, "carol"),
            comment(&p2, "bob"),
            comment(&p1, "dave"),
        ];

        let friends = infer_close_friends(&[user_id("alice")], &[p1, p2], &comments).unwrap();

        assert_eq!(
            friends,
            vec![
                FriendScore { name: "carol".into(), comment_count: 3 },
                FriendScore { name: "bob".into(), comment_count: 2 },
                FriendScore { name: "dave".into(), comment_count: 1 },
            ]
        );
    }

    #[test]
    fn test_excludes_self_comments() {
        let post = TestPost(Uuid::new_v4());
        let comments = vec![
            comment(&post, "alice"),
            comment(&post, "alice"),
            comment(&post, "bob"),
        ];

        let friends = infer_close_friends(&[user_id("alice")], &[post], &comments).unwrap();

        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].name, "bob");
    }

    #[test]
    fn test_excludes_self_comments_after_rename() {
        // Comment stored under the old display name, same account
        let alice = user_id("alice");
        let post = TestPost(Uuid::new_v4());
        let comments = vec![
            TestComment {
                post_id: post.0,
                user_id: Some(alice),
                user: "alice",
            },
            comment(&post, "bob"),
        ];

        let friends = infer_close_friends(&[alice], &[post], &comments).unwrap();

        assert_eq!(friends, vec![FriendScore { name: "bob".into(), comment_count: 1 }]);
    }

    #[test]
    fn test_deleted_commenter_counted_by_name() {
        let post = TestPost(Uuid::new_v4());
        let comments = vec![
            TestComment {
                post_id: post.0,
                user_id: None,
                user: "ghost",
            },
            comment(&post, "bob"),
            comment(&post, "bob"),
        ];

        let friends = infer_close_friends(&[user_id("alice")], &[post], &comments).unwrap();

        let names: Vec<&str> = friends.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["bob", "ghost"]);
    }

    #[test]
    fn test_ignores_comments_on_other_posts() {
        let mine = TestPost(Uuid::new_v4());
        let theirs = TestPost(Uuid::new_v4());
        let comments = vec![comment(&theirs, "bob"), comment(&mine, "carol")];

        let friends = infer_close_friends(&[user_id("alice")], &[mine], &comments).unwrap();

        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].name, "carol");
    }

    #[test]
    fn test_no_posts_yields_empty() {
        let stray = TestPost(Uuid::new_v4());
        let comments = vec![comment(&stray, "bob")];

        let friends = infer_close_friends::<TestPost, _>(&[user_id("alice")], &[], &comments).unwrap();

        assert!(friends.is_empty());
    }

    #[test]
    fn test_ties_ordered_by_name() {
        let post = TestPost(Uuid::new_v4());
        let comments = vec![comment(&post, "zed"), comment(&post, "amy"), comment(&post, "max")];

        let friends = infer_close_friends(&[user_id("alice")], &[post], &comments).unwrap();

        let names: Vec<&str> = friends.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["amy", "max", "zed"]);
    }

    #[test]
    fn test_missing_owner_rejected() {
        let post = TestPost(Uuid::new_v4());
        let err = infer_close_friends::<_, TestComment>(&[], &[post], &[]).unwrap_err();
        assert!(matches!(err, RankingError::InvalidInput(_)));

        let post = TestPost(Uuid::new_v4());
        let err = infer_close_friends::<_, TestComment>(&[Uuid::nil()], &[post], &[]).unwrap_err();
        assert!(matches!(err, RankingError::InvalidInput(_)));
    }
}
