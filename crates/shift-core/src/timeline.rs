//! Planner chat timelines.
//!
//! A timeline is a named, append-only conversation with the planning
//! assistant. The whole collection is persisted as one value and rewritten
//! after every mutation; at least one timeline exists at all times.

use crate::clock::Clock;
use crate::error::{Result, ShiftError};
use crate::keys;
use crate::store::{self, Store};
use serde::{Deserialize, Serialize};

const GREETING: &str = "Hi! I'm your AI planning assistant. Tell me your goal for this timeline, \
                        and I'll help you break it down into actionable steps.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub id: String,
    pub name: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSet {
    pub timelines: Vec<Timeline>,
    pub active_id: String,
}

/// Draft handed from the planner to the content generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDraft {
    pub text: String,
    pub timeline_name: String,
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// TimelineSet
// ---------------------------------------------------------------------------

impl TimelineSet {
    /// Load the collection, seeding a single greeting timeline when the
    /// stored value is absent or corrupt.
    pub fn load(store: &dyn Store, clock: &dyn Clock) -> Self {
        if let Some(set) = store::read_json::<TimelineSet>(store, keys::PLANNER_TIMELINES) {
            if !set.timelines.is_empty() {
                return set;
            }
        }

        let now = clock.now().timestamp_millis();
        let first = Timeline {
            id: uuid::Uuid::new_v4().to_string(),
            name: "My First Plan".to_string(),
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
                timestamp: now,
            }],
            created_at: now,
        };
        TimelineSet {
            active_id: first.id.clone(),
            timelines: vec![first],
        }
    }

    pub fn save(&self, store: &dyn Store) -> Result<()> {
        store::write_json(store, keys::PLANNER_TIMELINES, self)
    }

    pub fn get(&self, id: &str) -> Result<&Timeline> {
        self.timelines
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ShiftError::TimelineNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Timeline> {
        self.timelines
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ShiftError::TimelineNotFound(id.to_string()))
    }

    pub fn active(&self) -> &Timeline {
        // active_id is kept valid by every mutation; fall back to the first
        // timeline if a stale value was persisted.
        self.timelines
            .iter()
            .find(|t| t.id == self.active_id)
            .unwrap_or(&self.timelines[0])
    }

    /// Create a timeline. A blank name is auto-numbered ("Timeline N").
    /// The new timeline becomes active.
    pub fn create(&mut self, clock: &dyn Clock, name: Option<&str>) -> String {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("Timeline {}", self.timelines.len() + 1),
        };
        let now = clock.now().timestamp_millis();
        let timeline = Timeline {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: "New timeline created. What's your focus?".to_string(),
                timestamp: now,
            }],
            created_at: now,
        };
        let id = timeline.id.clone();
        self.timelines.push(timeline);
        self.active_id = id.clone();
        id
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShiftError::EmptyTimelineName);
        }
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Delete a timeline. The last remaining timeline cannot be deleted;
    /// if the active one goes, the first survivor becomes active.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.get(id)?;
        if self.timelines.len() == 1 {
            return Err(ShiftError::LastTimeline);
        }
        self.timelines.retain(|t| t.id != id);
        if self.active_id == id {
            self.active_id = self.timelines[0].id.clone();
        }
        Ok(())
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        self.get(id)?;
        self.active_id = id.to_string();
        Ok(())
    }

    pub fn append_message(
        &mut self,
        clock: &dyn Clock,
        id: &str,
        role: Role,
        content: &str,
    ) -> Result<()> {
        let message = ChatMessage {
            role,
            content: content.to_string(),
            timestamp: clock.now().timestamp_millis(),
        };
        self.get_mut(id)?.messages.push(message);
        Ok(())
    }

    pub fn last_assistant_reply(&self, id: &str) -> Result<Option<&ChatMessage>> {
        let timeline = self.get(id)?;
        Ok(timeline
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant))
    }

    /// Export the last assistant reply for reuse by the content generator.
    pub fn export_draft(
        &self,
        store: &dyn Store,
        clock: &dyn Clock,
        id: &str,
    ) -> Result<ContentDraft> {
        let timeline = self.get(id)?;
        let reply = self
            .last_assistant_reply(id)?
            .ok_or_else(|| ShiftError::NothingToExport(id.to_string()))?;
        let draft = ContentDraft {
            text: reply.content.clone(),
            timeline_name: timeline.name.clone(),
            timestamp: clock.now().timestamp_millis(),
        };
        store::write_json(store, keys::CONTENT_DRAFT, &draft)?;
        Ok(draft)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
