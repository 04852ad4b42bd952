// In memory permission oracle and wage source.
//
// Purpose
// - Stand in for the organization/membership contexts in tests and local runs.
//
// Responsibilities
// - Resolve grants for the person directly and through the roles the person holds in the org.
// - Keep per-org default wages, per-member overrides and the opaque org settings blob.

use crate::shared::core::primitives::Money;
use crate::shared::infrastructure::oracle::{
    OracleError, PermissionOracle, PermissionSubject, WageSource,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const ANY_ACTIVITY: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    pub subject: PermissionSubject,
    pub org_id: Uuid,
    pub resource_kind: String,
    pub resource_id: Option<Uuid>,
    pub activity: String,
}

impl PermissionGrant {
    fn covers(
        &self,
        org_id: Uuid,
        resource_kind: &str,
        resource_id: Option<Uuid>,
        activity: &str,
    ) -> bool {
        self.org_id == org_id
            && self.resource_kind == resource_kind
            && (self.resource_id.is_none() || self.resource_id == resource_id)
            && (self.activity == ANY_ACTIVITY || self.activity == activity)
    }
}

#[derive(Default)]
pub struct InMemoryOracle {
    grants: RwLock<Vec<PermissionGrant>>,
    roles: RwLock<HashMap<(Uuid, Uuid), HashSet<Uuid>>>,
    org_wages: RwLock<HashMap<Uuid, Money>>,
    member_wages: RwLock<HashMap<(Uuid, Uuid), Money>>,
    org_settings: RwLock<HashMap<Uuid, Vec<u8>>>,
    fallback_wage: Money,
    queries: AtomicUsize,
    is_offline: AtomicBool,
}

impl InMemoryOracle {
    pub fn new(fallback_wage: Money) -> Self {
        Self {
            fallback_wage,
            ..Self::default()
        }
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    /// Number of permission questions answered so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub async fn grant(&self, grant: PermissionGrant) {
        self.grants.write().await.push(grant);
    }

    /// Grants every meeting activity in the org to the person.
    pub async fn grant_all(&self, person_id: Uuid, org_id: Uuid, resource_kind: &str) {
        self.grant(PermissionGrant {
            subject: PermissionSubject::Person(person_id),
            org_id,
            resource_kind: resource_kind.to_string(),
            resource_id: None,
            activity: ANY_ACTIVITY.to_string(),
        })
        .await;
    }

    pub async fn assign_role(&self, person_id: Uuid, org_id: Uuid, role_id: Uuid) {
        self.roles
            .write()
            .await
            .entry((person_id, org_id))
            .or_default()
            .insert(role_id);
    }

    pub async fn set_org_wage(&self, org_id: Uuid, wage: Money) {
        self.org_wages.write().await.insert(org_id, wage);
    }

    pub async fn set_member_wage(&self, person_id: Uuid, org_id: Uuid, wage: Money) {
        self.member_wages.write().await.insert((person_id, org_id), wage);
    }

    pub async fn store_settings(&self, org_id: Uuid, blob: Vec<u8>) {
        self.org_settings.write().await.insert(org_id, blob);
    }

    pub async fn settings(&self, org_id: Uuid) -> Option<Vec<u8>> {
        self.org_settings.read().await.get(&org_id).cloned()
    }

    fn ensure_online(&self) -> Result<(), OracleError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(OracleError::Unavailable("Oracle offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PermissionOracle for InMemoryOracle {
    async fn may(
        &self,
        actor_id: Uuid,
        org_id: Uuid,
        resource_kind: &str,
        resource_id: Option<Uuid>,
        activity: &str,
    ) -> Result<bool, OracleError> {
        self.ensure_online()?;
        self.queries.fetch_add(1, Ordering::SeqCst);

        let roles = self
            .roles
            .read()
            .await
            .get(&(actor_id, org_id))
            .cloned()
            .unwrap_or_default();
        let grants = self.grants.read().await;

        let by_person = grants.iter().any(|grant| {
            grant.subject == PermissionSubject::Person(actor_id)
                && grant.covers(org_id, resource_kind, resource_id, activity)
        });
        let by_role = grants.iter().any(|grant| match grant.subject {
            PermissionSubject::Role(role_id) => {
                roles.contains(&role_id)
                    && grant.covers(org_id, resource_kind, resource_id, activity)
            }
            PermissionSubject::Person(_) => false,
        });
        Ok(by_person || by_role)
    }
}

#[async_trait::async_trait]
impl WageSource for InMemoryOracle {
    async fn org_default_wage(&self, org_id: Uuid) -> Result<Money, OracleError> {
        self.ensure_online()?;
        Ok(self
            .org_wages
            .read()
            .await
            .get(&org_id)
            .copied()
            .unwrap_or(self.fallback_wage))
    }

    async fn member_wage(
        &self,
        person_id: Uuid,
        org_id: Uuid,
    ) -> Result<Option<Money>, OracleError> {
        self.ensure_online()?;
        Ok(self.member_wages.read().await.get(&(person_id, org_id)).copied())
    }
}
