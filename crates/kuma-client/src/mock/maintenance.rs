//! Maintenance operations for MockKumaClient
//!
//! Handles maintenance windows and their status page / monitor relations

use super::MockKumaClient;
use crate::error::KumaError;
use crate::models::*;

pub async fn get_maintenance(client: &MockKumaClient, id: i64) -> Result<Maintenance, KumaError> {
    client.record("get_maintenance")?;
    client.maintenances
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| KumaError::NotFound(format!("Maintenance {} not found", id)))
}

pub async fn get_maintenance_status_pages(client: &MockKumaClient, id: i64) -> Result<Vec<i64>, KumaError> {
    client.record("get_maintenance_status_pages")?;
    client.maintenance_status_pages
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| KumaError::NotFound(format!("Maintenance {} not found", id)))
}

pub async fn set_maintenance_status_pages(client: &MockKumaClient, id: i64, status_page_ids: &[i64]) -> Result<(), KumaError> {
    client.record("set_maintenance_status_pages")?;
    let mut relations = client.maintenance_status_pages.lock().unwrap();
    let Some(current) = relations.get_mut(&id) else {
        return Err(KumaError::NotFound(format!("Maintenance {} not found", id)));
    };
    client.take_conflict(&format!("Maintenance {}", id))?;
    *current = status_page_ids.to_vec();
    Ok(())
}

pub async fn get_maintenance_monitors(client: &MockKumaClient, id: i64) -> Result<Vec<i64>, KumaError> {
    client.record("get_maintenance_monitors")?;
    client.maintenance_monitors
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| KumaError::NotFound(format!("Maintenance {} not found", id)))
}

pub async fn set_maintenance_monitors(client: &MockKumaClient, id: i64, monitor_ids: &[i64]) -> Result<(), KumaError> {
    client.record("set_maintenance_monitors")?;
    let mut relations = client.maintenance_monitors.lock().unwrap();
    let Some(current) = relations.get_mut(&id) else {
        return Err(KumaError::NotFound(format!("Maintenance {} not found", id)));
    };
    client.take_conflict(&format!("Maintenance {}", id))?;
    *current = monitor_ids.to_vec();
    Ok(())
}
