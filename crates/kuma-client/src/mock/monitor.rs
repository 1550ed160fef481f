//! Monitor operations for MockKumaClient
//!
//! Handles monitors and their tags

use super::MockKumaClient;
use crate::error::KumaError;
use crate::models::*;

pub async fn get_monitor(client: &MockKumaClient, id: i64) -> Result<Monitor, KumaError> {
    client.record("get_monitor")?;
    client.monitors
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| KumaError::NotFound(format!("Monitor {} not found", id)))
}

pub async fn get_monitor_tags(client: &MockKumaClient, id: i64) -> Result<Vec<MonitorTag>, KumaError> {
    client.record("get_monitor_tags")?;
    client.monitor_tags
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| KumaError::NotFound(format!("Monitor {} not found", id)))
}

pub async fn set_monitor_tags(client: &MockKumaClient, id: i64, tags: &[MonitorTag]) -> Result<(), KumaError> {
    client.record("set_monitor_tags")?;
    let mut relations = client.monitor_tags.lock().unwrap();
    let Some(current) = relations.get_mut(&id) else {
        return Err(KumaError::NotFound(format!("Monitor {} not found", id)));
    };
    client.take_conflict(&format!("Monitor {}", id))?;
    *current = tags.to_vec();
    Ok(())
}
