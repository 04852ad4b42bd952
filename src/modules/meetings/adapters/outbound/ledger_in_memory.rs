// In memory implementation of the LedgerStore port.
//
// Purpose
// - Serve tests and single-process deployments with the same transactional
//   guarantees a relational store gives the engine.
//
// Responsibilities
// - Per-meeting row locks held by the transaction until commit or rollback.
// - Stage writes inside the transaction and apply them atomically at commit.
// - Enforce external id uniqueness among live meetings and the single-open-increment
//   constraint at commit.
// - Simulate outages (toggle_offline), transient faults (fail_transiently) and slow
//   commits (set_delay_commit_ms).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::modules::meetings::adapters::outbound::ledger::{
    LedgerError, LedgerStore, LedgerTransaction, MeetingFilter, Page,
};
use crate::modules::meetings::core::meeting::{Increment, Meeting, Participant};

#[derive(Default)]
struct Tables {
    meetings: HashMap<Uuid, Meeting>,
    increments: HashMap<Uuid, Increment>,
    participants: HashMap<Uuid, Participant>,
}

struct Shared {
    tables: RwLock<Tables>,
    row_locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
    is_offline: AtomicBool,
    transient_failures: AtomicU32,
    commit_delay_ms: AtomicU64,
    commits: AtomicU64,
}

impl Shared {
    fn ensure_available(&self) -> Result<(), LedgerError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(LedgerError::Transient("Ledger offline".into()));
        }
        let injected = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if injected.is_ok() {
            return Err(LedgerError::Transient("Injected transient failure".into()));
        }
        Ok(())
    }

    fn row_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.row_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(id).or_default().clone()
    }

    fn prune_row_locks(&self) {
        let mut locks = self.row_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

#[derive(Clone)]
pub struct InMemoryLedger {
    shared: Arc<Shared>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                tables: RwLock::new(Tables::default()),
                row_locks: StdMutex::new(HashMap::new()),
                is_offline: AtomicBool::new(false),
                transient_failures: AtomicU32::new(0),
                commit_delay_ms: AtomicU64::new(0),
                commits: AtomicU64::new(0),
            }),
        }
    }

    pub fn toggle_offline(&self) {
        self.shared.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    /// The next `count` ledger operations fail with a transient error.
    pub fn fail_transiently(&self, count: u32) {
        self.shared.transient_failures.store(count, Ordering::SeqCst);
    }

    pub fn set_delay_commit_ms(&self, ms: u64) {
        self.shared.commit_delay_ms.store(ms, Ordering::SeqCst);
    }

    pub fn commits(&self) -> u64 {
        self.shared.commits.load(Ordering::SeqCst)
    }

    /// Raw row access, tombstoned meetings included.
    pub async fn meeting_row(&self, id: Uuid) -> Option<Meeting> {
        self.shared.tables.read().await.meetings.get(&id).cloned()
    }

    pub async fn increment_rows(&self, meeting_id: Uuid) -> Vec<Increment> {
        let tables = self.shared.tables.read().await;
        sorted_increments(
            tables
                .increments
                .values()
                .filter(|i| i.meeting_id == meeting_id)
                .cloned(),
        )
    }
}

fn sorted_increments(increments: impl Iterator<Item = Increment>) -> Vec<Increment> {
    let mut increments: Vec<Increment> = increments.collect();
    increments.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then(a.created_at.cmp(&b.created_at))
    });
    increments
}

fn meeting_not_found(id: Uuid) -> LedgerError {
    LedgerError::NotFound { entity: "meeting", id }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>, LedgerError> {
        self.shared.ensure_available()?;
        Ok(Box::new(InMemoryTransaction {
            shared: self.shared.clone(),
            row_guards: HashMap::new(),
            staged: Staged::default(),
        }))
    }

    async fn get_meeting(&self, id: Uuid) -> Result<Meeting, LedgerError> {
        self.shared.ensure_available()?;
        self.shared
            .tables
            .read()
            .await
            .meetings
            .get(&id)
            .filter(|m| !m.is_deleted())
            .cloned()
            .ok_or_else(|| meeting_not_found(id))
    }

    async fn list_increments(&self, meeting_id: Uuid) -> Result<Vec<Increment>, LedgerError> {
        self.shared.ensure_available()?;
        Ok(self.increment_rows(meeting_id).await)
    }

    async fn list_participants(&self, meeting_id: Uuid) -> Result<Vec<Participant>, LedgerError> {
        self.shared.ensure_available()?;
        let tables = self.shared.tables.read().await;
        let mut participants: Vec<Participant> = tables
            .participants
            .values()
            .filter(|p| p.meeting_id == meeting_id)
            .cloned()
            .collect();
        participants.sort_by_key(|p| p.joined_at);
        Ok(participants)
    }

    async fn get_meeting_with_increments(
        &self,
        meeting_id: Uuid,
    ) -> Result<(Meeting, Vec<Increment>), LedgerError> {
        self.shared.ensure_available()?;
        let tables = self.shared.tables.read().await;
        let meeting = tables
            .meetings
            .get(&meeting_id)
            .filter(|m| !m.is_deleted())
            .cloned()
            .ok_or_else(|| meeting_not_found(meeting_id))?;
        let increments = sorted_increments(
            tables
                .increments
                .values()
                .filter(|i| i.meeting_id == meeting_id)
                .cloned(),
        );
        Ok((meeting, increments))
    }

    async fn list_meetings(
        &self,
        org_id: Uuid,
        filter: &MeetingFilter,
        page: Page,
    ) -> Result<(Vec<Meeting>, u64), LedgerError> {
        self.shared.ensure_available()?;
        let tables = self.shared.tables.read().await;
        let mut matches: Vec<&Meeting> = tables
            .meetings
            .values()
            .filter(|m| m.org_id == org_id && !m.is_deleted() && filter.matches(m))
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(page.offset())
            .take(page.page_size as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }
}

enum Write<T> {
    Insert(T),
    Update(T),
    Delete,
}

impl<T> Write<T> {
    fn value(&self) -> Option<&T> {
        match self {
            Write::Insert(v) | Write::Update(v) => Some(v),
            Write::Delete => None,
        }
    }
}

#[derive(Default)]
struct Staged {
    meetings: HashMap<Uuid, Write<Meeting>>,
    increments: HashMap<Uuid, Write<Increment>>,
    participants: HashMap<Uuid, Write<Participant>>,
}

pub struct InMemoryTransaction {
    shared: Arc<Shared>,
    row_guards: HashMap<Uuid, OwnedMutexGuard<()>>,
    staged: Staged,
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        self.row_guards.clear();
        self.shared.prune_row_locks();
    }
}

impl InMemoryTransaction {
    async fn visible_meeting(&self, id: Uuid) -> Option<Meeting> {
        if let Some(write) = self.staged.meetings.get(&id) {
            return write.value().cloned();
        }
        self.shared.tables.read().await.meetings.get(&id).cloned()
    }

    async fn visible_increments(&self, meeting_id: Uuid) -> Vec<Increment> {
        let tables = self.shared.tables.read().await;
        overlay_increments(&tables, &self.staged, meeting_id)
    }

    fn stage<T>(map: &mut HashMap<Uuid, Write<T>>, id: Uuid, value: T, exists_in_base: bool) {
        let write = match map.get(&id) {
            Some(Write::Insert(_)) => Write::Insert(value),
            _ if exists_in_base => Write::Update(value),
            _ => Write::Insert(value),
        };
        map.insert(id, write);
    }
}

fn overlay_increments(tables: &Tables, staged: &Staged, meeting_id: Uuid) -> Vec<Increment> {
    let base = tables
        .increments
        .values()
        .filter(|i| i.meeting_id == meeting_id && !staged.increments.contains_key(&i.id))
        .cloned();
    let staged = staged
        .increments
        .values()
        .filter_map(Write::value)
        .filter(|i| i.meeting_id == meeting_id)
        .cloned();
    sorted_increments(base.chain(staged))
}

fn check_external_uniqueness(tables: &Tables, staged: &Staged) -> Result<(), LedgerError> {
    let live_staged: Vec<&Meeting> = staged
        .meetings
        .values()
        .filter_map(Write::value)
        .filter(|m| !m.is_deleted())
        .collect();

    for meeting in &live_staged {
        let Some(key) = meeting.external_key() else {
            continue;
        };
        let clash_in_base = tables.meetings.values().any(|other| {
            other.id != meeting.id
                && !staged.meetings.contains_key(&other.id)
                && !other.is_deleted()
                && other.external_key() == Some(key)
        });
        let clash_in_staged = live_staged
            .iter()
            .any(|other| other.id != meeting.id && other.external_key() == Some(key));
        if clash_in_base || clash_in_staged {
            return Err(LedgerError::Conflict(format!(
                "external id {}:{} already used by a live meeting",
                key.0, key.1
            )));
        }
    }
    Ok(())
}

fn check_existence<T>(
    base: &HashMap<Uuid, T>,
    staged: &HashMap<Uuid, Write<T>>,
    entity: &'static str,
) -> Result<(), LedgerError> {
    for (id, write) in staged {
        match write {
            Write::Insert(_) if base.contains_key(id) => {
                return Err(LedgerError::Conflict(format!("{entity} {id} already exists")));
            }
            Write::Update(_) | Write::Delete if !base.contains_key(id) => {
                return Err(LedgerError::NotFound { entity, id: *id });
            }
            _ => {}
        }
    }
    Ok(())
}

fn apply<T>(base: &mut HashMap<Uuid, T>, staged: HashMap<Uuid, Write<T>>) {
    for (id, write) in staged {
        match write {
            Write::Insert(v) | Write::Update(v) => {
                base.insert(id, v);
            }
            Write::Delete => {
                base.remove(&id);
            }
        }
    }
}

#[async_trait]
impl LedgerTransaction for InMemoryTransaction {
    async fn lock_meeting(&mut self, id: Uuid) -> Result<Meeting, LedgerError> {
        self.shared.ensure_available()?;
        if !self.row_guards.contains_key(&id) {
            let guard = self.shared.row_lock(id).lock_owned().await;
            self.row_guards.insert(id, guard);
        }
        self.get_meeting(id).await
    }

    async fn get_meeting(&mut self, id: Uuid) -> Result<Meeting, LedgerError> {
        self.visible_meeting(id)
            .await
            .filter(|m| !m.is_deleted())
            .ok_or_else(|| meeting_not_found(id))
    }

    async fn insert_meeting(&mut self, meeting: &Meeting) -> Result<(), LedgerError> {
        self.shared.ensure_available()?;
        if self.visible_meeting(meeting.id).await.is_some() {
            return Err(LedgerError::Conflict(format!("meeting {} already exists", meeting.id)));
        }
        self.staged.meetings.insert(meeting.id, Write::Insert(meeting.clone()));
        Ok(())
    }

    async fn update_meeting(&mut self, meeting: &Meeting) -> Result<(), LedgerError> {
        self.shared.ensure_available()?;
        let in_base = self.shared.tables.read().await.meetings.contains_key(&meeting.id);
        if !in_base && !self.staged.meetings.contains_key(&meeting.id) {
            return Err(meeting_not_found(meeting.id));
        }
        Self::stage(&mut self.staged.meetings, meeting.id, meeting.clone(), in_base);
        Ok(())
    }

    async fn soft_delete_meeting(
        &mut self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let mut meeting = self.get_meeting(id).await?;
        meeting.deleted_at = Some(at);
        meeting.updated_at = at;
        self.update_meeting(&meeting).await
    }

    async fn lookup_by_external(
        &mut self,
        external_type: &str,
        external_id: &str,
    ) -> Result<Option<Meeting>, LedgerError> {
        self.shared.ensure_available()?;
        let key = Some((external_type, external_id));
        if let Some(staged) = self
            .staged
            .meetings
            .values()
            .filter_map(Write::value)
            .find(|m| !m.is_deleted() && m.external_key() == key)
        {
            return Ok(Some(staged.clone()));
        }
        let tables = self.shared.tables.read().await;
        Ok(tables
            .meetings
            .values()
            .filter(|m| !self.staged.meetings.contains_key(&m.id))
            .find(|m| !m.is_deleted() && m.external_key() == key)
            .cloned())
    }

    async fn list_open_increment(
        &mut self,
        meeting_id: Uuid,
    ) -> Result<Option<Increment>, LedgerError> {
        self.shared.ensure_available()?;
        let mut open = self
            .visible_increments(meeting_id)
            .await
            .into_iter()
            .filter(Increment::is_open);
        let tail = open.next();
        if open.next().is_some() {
            return Err(LedgerError::InvariantViolation(format!(
                "meeting {meeting_id} has more than one open increment"
            )));
        }
        Ok(tail)
    }

    async fn insert_increment(&mut self, increment: &Increment) -> Result<(), LedgerError> {
        self.shared.ensure_available()?;
        let exists = self.shared.tables.read().await.increments.contains_key(&increment.id)
            || self.staged.increments.contains_key(&increment.id);
        if exists {
            return Err(LedgerError::Conflict(format!("increment {} already exists", increment.id)));
        }
        self.staged
            .increments
            .insert(increment.id, Write::Insert(increment.clone()));
        Ok(())
    }

    async fn update_increment(&mut self, increment: &Increment) -> Result<(), LedgerError> {
        self.shared.ensure_available()?;
        let in_base = self.shared.tables.read().await.increments.contains_key(&increment.id);
        let staged_live = self
            .staged
            .increments
            .get(&increment.id)
            .is_some_and(|w| w.value().is_some());
        if !in_base && !staged_live {
            return Err(LedgerError::NotFound {
                entity: "increment",
                id: increment.id,
            });
        }
        Self::stage(&mut self.staged.increments, increment.id, increment.clone(), in_base);
        Ok(())
    }

    async fn delete_increment(&mut self, increment_id: Uuid) -> Result<(), LedgerError> {
        self.shared.ensure_available()?;
        let in_base = self.shared.tables.read().await.increments.contains_key(&increment_id);
        match self.staged.increments.get(&increment_id) {
            Some(Write::Insert(_)) => {
                self.staged.increments.remove(&increment_id);
            }
            Some(Write::Update(_)) => {
                self.staged.increments.insert(increment_id, Write::Delete);
            }
            Some(Write::Delete) | None if !in_base => {
                return Err(LedgerError::NotFound {
                    entity: "increment",
                    id: increment_id,
                });
            }
            _ => {
                self.staged.increments.insert(increment_id, Write::Delete);
            }
        }
        Ok(())
    }

    async fn list_increments(&mut self, meeting_id: Uuid) -> Result<Vec<Increment>, LedgerError> {
        self.shared.ensure_available()?;
        Ok(self.visible_increments(meeting_id).await)
    }

    async fn insert_participant(&mut self, participant: &Participant) -> Result<(), LedgerError> {
        self.shared.ensure_available()?;
        self.staged
            .participants
            .insert(participant.id, Write::Insert(participant.clone()));
        Ok(())
    }

    async fn update_participant(&mut self, participant: &Participant) -> Result<(), LedgerError> {
        self.shared.ensure_available()?;
        let in_base = self
            .shared
            .tables
            .read()
            .await
            .participants
            .contains_key(&participant.id);
        if !in_base && !self.staged.participants.contains_key(&participant.id) {
            return Err(LedgerError::NotFound {
                entity: "participant",
                id: participant.id,
            });
        }
        Self::stage(
            &mut self.staged.participants,
            participant.id,
            participant.clone(),
            in_base,
        );
        Ok(())
    }

    async fn list_participants(
        &mut self,
        meeting_id: Uuid,
    ) -> Result<Vec<Participant>, LedgerError> {
        self.shared.ensure_available()?;
        let tables = self.shared.tables.read().await;
        let base = tables
            .participants
            .values()
            .filter(|p| p.meeting_id == meeting_id && !self.staged.participants.contains_key(&p.id))
            .cloned();
        let staged = self
            .staged
            .participants
            .values()
            .filter_map(Write::value)
            .filter(|p| p.meeting_id == meeting_id)
            .cloned();
        let mut participants: Vec<Participant> = base.chain(staged).collect();
        participants.sort_by_key(|p| p.joined_at);
        Ok(participants)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), LedgerError> {
        let delay = self.shared.commit_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        self.shared.ensure_available()?;

        let staged = std::mem::take(&mut self.staged);
        let mut tables = self.shared.tables.write().await;

        check_existence(&tables.meetings, &staged.meetings, "meeting")?;
        check_existence(&tables.increments, &staged.increments, "increment")?;
        check_existence(&tables.participants, &staged.participants, "participant")?;
        check_external_uniqueness(&tables, &staged)?;

        let mut touched: Vec<Uuid> = staged
            .increments
            .iter()
            .filter_map(|(id, w)| {
                w.value()
                    .map(|i| i.meeting_id)
                    .or_else(|| tables.increments.get(id).map(|i| i.meeting_id))
            })
            .collect();
        touched.sort();
        touched.dedup();
        for meeting_id in touched {
            let open = overlay_increments(&tables, &staged, meeting_id)
                .iter()
                .filter(|i| i.is_open())
                .count();
            if open > 1 {
                return Err(LedgerError::Conflict(format!(
                    "meeting {meeting_id} would have {open} open increments"
                )));
            }
        }

        apply(&mut tables.meetings, staged.meetings);
        apply(&mut tables.increments, staged.increments);
        apply(&mut tables.participants, staged.participants);
        self.shared.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), LedgerError> {
        Ok(())
    }
}
