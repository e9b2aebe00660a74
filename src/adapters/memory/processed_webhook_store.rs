//! In-memory processed-delivery store.
//!
//! Suitable for a single-process deployment and for tests. Records are lost
//! on restart, after which Yoco redeliveries would be processed again; the
//! ledger's per-event idempotency covers that case.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::ports::{PortError, ProcessedWebhookStore, SaveResult, WebhookDeliveryRecord};

/// Processed webhook deliveries keyed by `webhook-id`.
#[derive(Default)]
pub struct InMemoryProcessedWebhookStore {
    records: RwLock<HashMap<String, WebhookDeliveryRecord>>,
}

impl InMemoryProcessedWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ProcessedWebhookStore for InMemoryProcessedWebhookStore {
    async fn find_by_webhook_id(
        &self,
        webhook_id: &str,
    ) -> Result<Option<WebhookDeliveryRecord>, PortError> {
        Ok(self.records.read().await.get(webhook_id).cloned())
    }

    async fn save(&self, record: WebhookDeliveryRecord) -> Result<SaveResult, PortError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.webhook_id) {
            return Ok(SaveResult::AlreadyExists);
        }
        records.insert(record.webhook_id.clone(), record);
        Ok(SaveResult::Inserted)
    }

    async fn delete_before(&self, timestamp: DateTime<Utc>) -> Result<u64, PortError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.processed_at >= timestamp);
        Ok((before - records.len()) as u64)
    }
}
