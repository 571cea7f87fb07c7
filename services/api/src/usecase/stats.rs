use lms_domain::subscription::STATUS_ACTIVE;

use crate::domain::repository::UserRepository;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub all_user_count: u64,
    pub subscribed_users_count: u64,
}

pub struct UserStatsUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UserStatsUseCase<R> {
    pub async fn execute(&self) -> Result<UserStats, ApiError> {
        Ok(UserStats {
            all_user_count: self.repo.count_all().await?,
            subscribed_users_count: self.repo.count_by_subscription_status(STATUS_ACTIVE).await?,
        })
    }
}
