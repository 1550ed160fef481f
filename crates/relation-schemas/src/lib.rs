//! Relation resource schemas
//!
//! Declared configuration shapes for the Uptime Kuma relation resources. The
//! applied state a provider returns has the same shape as the configuration,
//! so an import followed by a plan shows no difference.

pub mod maintenance_monitors;
pub mod maintenance_status_pages;
pub mod monitor_tags;
pub mod references;

pub use maintenance_monitors::*;
pub use maintenance_status_pages::*;
pub use monitor_tags::*;
pub use references::*;

/// Common surface of every relation resource configuration
pub trait RelationSpec {
    /// Resource type name used by the host
    const RESOURCE_TYPE: &'static str;

    /// Identifier of the owning entity
    fn parent_id(&self) -> i64;
}

/// Every relation resource type this crate describes
pub const RESOURCE_TYPES: [&str; 3] = [
    MaintenanceStatusPagesSpec::RESOURCE_TYPE,
    MaintenanceMonitorsSpec::RESOURCE_TYPE,
    MonitorTagsSpec::RESOURCE_TYPE,
];
