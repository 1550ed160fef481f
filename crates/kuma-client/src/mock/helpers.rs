//! Helper functions for creating Uptime Kuma model types in tests

use crate::models::*;

/// Build a manual maintenance window
pub fn test_maintenance(id: i64, title: &str) -> Maintenance {
    Maintenance {
        id,
        title: title.to_string(),
        description: String::new(),
        active: true,
        strategy: "manual".to_string(),
    }
}

/// Build an HTTP monitor
pub fn test_monitor(id: i64, name: &str) -> Monitor {
    Monitor {
        id,
        name: name.to_string(),
        monitor_type: "http".to_string(),
        active: true,
    }
}
