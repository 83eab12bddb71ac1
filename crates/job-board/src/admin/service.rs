use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::accounts::{AccountService, Identity, Role, RoleChange, User};
use crate::applications::Application;
use crate::error::ServiceError;
use crate::jobs::Job;
use crate::query::{Filter, SortOrder, Window};
use crate::store::Collection;

/// Months reported by [`AdminService::monthly_stats`].
pub const STATS_MONTHS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardInfo {
    pub users: u64,
    pub jobs: u64,
    pub applications: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub count: u64,
}

/// Board-wide figures and role management. Every call requires an admin.
pub struct AdminService<U, J, A> {
    accounts: Arc<AccountService<U>>,
    users: Arc<U>,
    jobs: Arc<J>,
    applications: Arc<A>,
}

impl<U, J, A> AdminService<U, J, A>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    pub fn new(
        accounts: Arc<AccountService<U>>,
        users: Arc<U>,
        jobs: Arc<J>,
        applications: Arc<A>,
    ) -> Self {
        Self {
            accounts,
            users,
            jobs,
            applications,
        }
    }

    pub fn info(&self, identity: &Identity) -> Result<BoardInfo, ServiceError> {
        identity.require_any(&[Role::Admin])?;
        let everything = Filter::default();
        Ok(BoardInfo {
            users: self.users.count(&everything)?,
            jobs: self.jobs.count(&everything)?,
            applications: self.applications.count(&everything)?,
        })
    }

    /// Applications per `YYYY-MM`, for the latest months that have any,
    /// oldest first.
    pub fn monthly_stats(&self, identity: &Identity) -> Result<Vec<MonthlyCount>, ServiceError> {
        identity.require_any(&[Role::Admin])?;
        let applications =
            self.applications
                .find(&Filter::default(), SortOrder::Oldest, Window::all())?;

        let mut per_month: BTreeMap<String, u64> = BTreeMap::new();
        for application in &applications {
            let month = application.created_at.format("%Y-%m").to_string();
            *per_month.entry(month).or_default() += 1;
        }

        let skip = per_month.len().saturating_sub(STATS_MONTHS);
        Ok(per_month
            .into_iter()
            .skip(skip)
            .map(|(month, count)| MonthlyCount { month, count })
            .collect())
    }

    pub fn update_role(&self, identity: &Identity, change: RoleChange) -> Result<User, ServiceError> {
        self.accounts.change_role(identity, change)
    }
}
