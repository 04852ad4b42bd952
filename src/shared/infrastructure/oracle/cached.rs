// Caching decorator for the PermissionOracle port.
//
// Answers are memoised for a short TTL. Cache failures are logged and the inner
// oracle is asked directly.

use crate::shared::infrastructure::cache::{Cache, get_json, set_json};
use crate::shared::infrastructure::oracle::{OracleError, PermissionOracle};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct CachingPermissionOracle {
    inner: Arc<dyn PermissionOracle>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachingPermissionOracle {
    pub fn new(inner: Arc<dyn PermissionOracle>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }
}

pub fn permission_key(
    actor_id: Uuid,
    org_id: Uuid,
    resource_kind: &str,
    resource_id: Option<Uuid>,
    activity: &str,
) -> String {
    let resource = resource_id.map(|id| id.to_string()).unwrap_or_default();
    format!("permission:{actor_id}:{org_id}:{resource_kind}:{resource}:{activity}")
}

#[async_trait::async_trait]
impl PermissionOracle for CachingPermissionOracle {
    async fn may(
        &self,
        actor_id: Uuid,
        org_id: Uuid,
        resource_kind: &str,
        resource_id: Option<Uuid>,
        activity: &str,
    ) -> Result<bool, OracleError> {
        let key = permission_key(actor_id, org_id, resource_kind, resource_id, activity);
        match get_json::<bool>(self.cache.as_ref(), &key).await {
            Ok(Some(answer)) => return Ok(answer),
            Ok(None) => {}
            Err(error) => tracing::warn!(%key, %error, "permission cache read failed"),
        }

        let answer = self
            .inner
            .may(actor_id, org_id, resource_kind, resource_id, activity)
            .await?;
        if let Err(error) = set_json(self.cache.as_ref(), &key, &answer, self.ttl).await {
            tracing::warn!(%key, %error, "permission cache write failed");
        }
        Ok(answer)
    }
}
