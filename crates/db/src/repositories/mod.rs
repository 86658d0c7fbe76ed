//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod dashboard_repo;
pub mod host_repo;
pub mod profile_repo;
pub mod user_repo;
pub mod widget_repo;

pub use dashboard_repo::DashboardRepo;
pub use host_repo::HostRepo;
pub use profile_repo::ProfileRepo;
pub use user_repo::UserRepo;
pub use widget_repo::WidgetRepo;
