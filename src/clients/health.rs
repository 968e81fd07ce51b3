use std::{collections::HashMap, sync::Arc, time::Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    clients::store::MessageStore,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

pub struct HealthChecker {
    store: Arc<MessageStore>,
    database_configured: bool,
}

impl HealthChecker {
    pub fn new(store: Arc<MessageStore>, database_configured: bool) -> Self {
        Self {
            store,
            database_configured,
        }
    }

    pub async fn check_all(&self, template_count: usize) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        checks.insert("message_store".to_string(), self.check_store().await);
        checks.insert(
            "template_catalog".to_string(),
            if template_count > 0 {
                ServiceHealth::healthy(0)
            } else {
                ServiceHealth::unhealthy("Template catalog is empty".to_string())
            },
        );

        let overall_status = self.determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now(),
            checks,
        }
    }

    async fn check_store(&self) -> ServiceHealth {
        let backend = self.store.backend();

        if let MessageStore::Memory(_) = self.store.as_ref()
            && self.database_configured
        {
            return ServiceHealth::degraded(
                "Database unavailable, history is kept in memory".to_string(),
            )
            .with_backend(backend);
        }

        let start = Instant::now();

        match self.store.health_check().await {
            Ok(_) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(backend, response_time_ms = elapsed, "Message store health check passed");
                ServiceHealth::healthy(elapsed).with_backend(backend)
            }
            Err(e) => {
                warn!(backend, error = %e, "Message store health check failed");
                ServiceHealth::unhealthy(format!("Health check query failed: {}", e))
                    .with_backend(backend)
            }
        }
    }

    fn determine_overall_status(&self, checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
        let has_unhealthy = checks
            .values()
            .any(|health| health.status == HealthStatus::Unhealthy);

        let has_degraded = checks
            .values()
            .any(|health| health.status == HealthStatus::Degraded);

        if has_unhealthy {
            HealthStatus::Unhealthy
        } else if has_degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}
