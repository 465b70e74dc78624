// Service exports
pub mod cache;
pub mod postgres;
pub mod social;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use postgres::{PostgresClient, PostgresError};
pub use social::{SocialReachClient, SocialReachError};
