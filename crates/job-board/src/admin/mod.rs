//! Admin-only board figures and role management.

pub mod router;
pub mod service;

pub use router::admin_router;
pub use service::{AdminService, BoardInfo, MonthlyCount, STATS_MONTHS};
