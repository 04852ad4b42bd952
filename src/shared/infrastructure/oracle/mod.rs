// Oracle ports: permission answers and wage lookups owned by other bounded contexts.
//
// Contract
// - Side-effect free from the caller's perspective; answers may be cached.
// - Permissions are granted to a role or to a person (PermissionSubject); both are
//   consulted and OR-ed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::core::primitives::Money;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "resource_type", content = "resource_id", rename_all = "snake_case")]
pub enum PermissionSubject {
    Role(Uuid),
    Person(Uuid),
}

#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn may(
        &self,
        actor_id: Uuid,
        org_id: Uuid,
        resource_kind: &str,
        resource_id: Option<Uuid>,
        activity: &str,
    ) -> Result<bool, OracleError>;
}

#[async_trait]
pub trait WageSource: Send + Sync {
    async fn org_default_wage(&self, org_id: Uuid) -> Result<Money, OracleError>;
    async fn member_wage(
        &self,
        person_id: Uuid,
        org_id: Uuid,
    ) -> Result<Option<Money>, OracleError>;
}

pub mod cached;
pub mod in_memory;
