// Cache keys and bus topics. Readers and invalidators both derive keys from here.

use uuid::Uuid;

pub fn meeting_key(meeting_id: Uuid) -> String {
    format!("meeting:{meeting_id}")
}

pub fn increments_key(meeting_id: Uuid) -> String {
    format!("meeting:{meeting_id}:increments")
}

pub fn meeting_topic(meeting_id: Uuid) -> String {
    format!("events:meeting:{meeting_id}")
}

/// Every cache key a committed mutation of the meeting may have made stale.
pub fn keys_touched_by_mutation(meeting_id: Uuid) -> [String; 2] {
    [meeting_key(meeting_id), increments_key(meeting_id)]
}
