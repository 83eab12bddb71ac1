use job_board::accounts::{AccountService, TokenAuthority, User};
use job_board::admin::AdminService;
use job_board::applications::{Application, ApplicationService};
use job_board::jobs::{Job, JobService};
use job_board::store::MemoryCollection;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type Users = MemoryCollection<User>;
pub(crate) type Jobs = MemoryCollection<Job>;
pub(crate) type Applications = MemoryCollection<Application>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-wide collections, created once at startup.
#[derive(Clone, Default)]
pub(crate) struct BoardStore {
    pub(crate) users: Arc<Users>,
    pub(crate) jobs: Arc<Jobs>,
    pub(crate) applications: Arc<Applications>,
}

/// Every service the routers need, sharing one [`BoardStore`] and one token
/// authority.
pub(crate) struct BoardServices {
    pub(crate) tokens: Arc<TokenAuthority>,
    pub(crate) accounts: Arc<AccountService<Users>>,
    pub(crate) jobs: Arc<JobService<Users, Jobs, Applications>>,
    pub(crate) applications: Arc<ApplicationService<Jobs, Applications>>,
    pub(crate) admin: Arc<AdminService<Users, Jobs, Applications>>,
}

impl BoardServices {
    pub(crate) fn new(store: &BoardStore, tokens: Arc<TokenAuthority>, admin_email: &str) -> Self {
        let accounts = Arc::new(AccountService::new(
            store.users.clone(),
            tokens.clone(),
            admin_email,
        ));
        let jobs = Arc::new(JobService::new(
            store.users.clone(),
            store.jobs.clone(),
            store.applications.clone(),
        ));
        let applications = Arc::new(ApplicationService::new(
            store.jobs.clone(),
            store.applications.clone(),
        ));
        let admin = Arc::new(AdminService::new(
            accounts.clone(),
            store.users.clone(),
            store.jobs.clone(),
            store.applications.clone(),
        ));

        Self {
            tokens,
            accounts,
            jobs,
            applications,
            admin,
        }
    }
}
