// Publish ordering per meeting.
//
// A ticket is taken while the meeting row is locked and held until the commit's
// event is on the bus. The next writer of that meeting cannot commit before it
// gets the ticket, so events leave in commit order.

use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

const STRIPES: usize = 64;

pub struct PublishGates {
    stripes: Vec<Arc<Mutex<()>>>,
}

/// Held from inside the transaction until the event has been published.
#[must_use]
pub struct PublishTicket(#[allow(dead_code)] OwnedMutexGuard<()>);

impl PublishGates {
    pub fn new() -> Self {
        Self {
            stripes: (0..STRIPES).map(|_| Arc::new(Mutex::new(()))).collect(),
        }
    }

    pub async fn enter(&self, meeting_id: Uuid) -> PublishTicket {
        let index = (meeting_id.as_u128() % self.stripes.len() as u128) as usize;
        PublishTicket(self.stripes[index].clone().lock_owned().await)
    }
}

impl Default for PublishGates {
    fn default() -> Self {
        Self::new()
    }
}
