//! Prints the JSON Schema of every relation resource configuration as YAML.
//!
//! Usage: `schemagen > schemas.yaml`

use relation_schemas::{
    MaintenanceMonitorsSpec, MaintenanceStatusPagesSpec, MonitorTagsSpec, RelationSpec,
};
use std::collections::BTreeMap;

fn main() -> anyhow::Result<()> {
    let mut schemas = BTreeMap::new();
    schemas.insert(
        MaintenanceStatusPagesSpec::RESOURCE_TYPE,
        schemars::schema_for!(MaintenanceStatusPagesSpec),
    );
    schemas.insert(
        MaintenanceMonitorsSpec::RESOURCE_TYPE,
        schemars::schema_for!(MaintenanceMonitorsSpec),
    );
    schemas.insert(
        MonitorTagsSpec::RESOURCE_TYPE,
        schemars::schema_for!(MonitorTagsSpec),
    );

    print!("{}", serde_yaml::to_string(&schemas)?);
    Ok(())
}
