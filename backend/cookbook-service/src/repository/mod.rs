//! PostgreSQL repositories, one per table group

pub mod chat;
pub mod comments;
pub mod follows;
pub mod learning_plans;
pub mod likes;
pub mod posts;
pub mod progress;
pub mod users;

pub use chat::ChatRepository;
pub use comments::CommentRepository;
pub use follows::FollowRepository;
pub use learning_plans::LearningPlanRepository;
pub use likes::LikeRepository;
pub use posts::PostRepository;
pub use progress::ProgressRepository;
pub use users::UserRepository;
