//! Notification log with priority levels and a persistent journal.
//!
//! Story systems emit `NotificationEvent`s (objective activations,
//! milestone beats, payday); the log keeps the visible toasts and an
//! archived journal. Story notifications persist until dismissed;
//! lower-priority ones auto-dismiss after a per-priority window.

use bevy::prelude::*;

// =============================================================================
// Priority Levels
// =============================================================================

/// Notification priority, from most to least prominent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NotificationPriority {
    /// Story beats (new objective, chapter change). Persist until dismissed.
    Story,
    /// Something went sideways (binding fallback, refused checkout).
    Warning,
    /// General information.
    Info,
    /// Good news (paycheck, quiz passed).
    Positive,
}

impl NotificationPriority {
    /// Auto-dismiss window in seconds. `None` means persist until dismissed.
    pub fn auto_dismiss_secs(&self) -> Option<f32> {
        match self {
            NotificationPriority::Story => None,
            NotificationPriority::Warning => Some(12.0),
            NotificationPriority::Info => Some(6.0),
            NotificationPriority::Positive => Some(6.0),
        }
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationPriority::Story => "STORY",
            NotificationPriority::Warning => "WARNING",
            NotificationPriority::Info => "INFO",
            NotificationPriority::Positive => "POSITIVE",
        }
    }
}

/// A single visible notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub priority: NotificationPriority,
    /// Game day when the notification was created.
    pub day: u32,
    /// Seconds-since-start timestamp, used for auto-dismiss.
    pub created_at: f32,
    pub dismissed: bool,
}

/// An archived notification in the persistent journal.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub text: String,
    pub priority: NotificationPriority,
    pub day: u32,
}

/// Event emitted by story systems to create a notification.
#[derive(Event, Debug, Clone)]
pub struct NotificationEvent {
    pub text: String,
    pub priority: NotificationPriority,
    pub day: u32,
}

// =============================================================================
// NotificationLog Resource
// =============================================================================

/// Active notifications plus the archived journal.
#[derive(Resource)]
pub struct NotificationLog {
    pub active: Vec<Notification>,
    pub journal: Vec<JournalEntry>,
    /// Maximum journal size before old entries are trimmed.
    pub max_journal: usize,
    /// Seconds elapsed since startup, advanced every frame.
    elapsed: f32,
    next_id: u64,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            journal: Vec::new(),
            max_journal: 200,
            elapsed: 0.0,
            next_id: 1,
        }
    }
}

impl NotificationLog {
    pub fn push(&mut self, event: &NotificationEvent) {
        let id = self.next_id;
        self.next_id += 1;
        self.active.push(Notification {
            id,
            text: event.text.clone(),
            priority: event.priority,
            day: event.day,
            created_at: self.elapsed,
            dismissed: false,
        });

        self.journal.push(JournalEntry {
            text: event.text.clone(),
            priority: event.priority,
            day: event.day,
        });
        if self.journal.len() > self.max_journal {
            let excess = self.journal.len() - self.max_journal;
            self.journal.drain(0..excess);
        }
    }

    /// Dismiss by id; the entry leaves the active list on the next sweep.
    pub fn dismiss(&mut self, id: u64) {
        if let Some(n) = self.active.iter_mut().find(|n| n.id == id) {
            n.dismissed = true;
        }
    }

    /// Advance the clock and drop dismissed/expired notifications.
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        let now = self.elapsed;
        self.active.retain(|n| {
            if n.dismissed {
                return false;
            }
            match n.priority.auto_dismiss_secs() {
                Some(ttl) => now - n.created_at < ttl,
                None => true,
            }
        });
    }
}

// =============================================================================
// Systems
// =============================================================================

fn collect_notifications(
    mut events: EventReader<NotificationEvent>,
    mut log: ResMut<NotificationLog>,
) {
    for event in events.read() {
        log.push(event);
    }
}

fn sweep_notifications(mut log: ResMut<NotificationLog>, time: Res<Time>) {
    log.update(time.delta_secs());
}

pub struct NotificationsPlugin;

impl Plugin for NotificationsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NotificationLog>()
            .add_event::<NotificationEvent>()
            .add_systems(Update, (collect_notifications, sweep_notifications).chain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(text: &str) -> NotificationEvent {
        NotificationEvent {
            text: text.to_string(),
            priority: NotificationPriority::Info,
            day: 1,
        }
    }

    #[test]
    fn test_push_archives_in_journal() {
        let mut log = NotificationLog::default();
        log.push(&info("hello"));
        assert_eq!(log.active.len(), 1);
        assert_eq!(log.journal.len(), 1);
        assert_eq!(log.active[0].text, "hello");
    }

    #[test]
    fn test_info_auto_dismisses() {
        let mut log = NotificationLog::default();
        log.push(&info("short-lived"));
        log.update(3.0);
        assert_eq!(log.active.len(), 1);
        log.update(4.0);
        assert!(log.active.is_empty());
        assert_eq!(log.journal.len(), 1);
    }

    #[test]
    fn test_story_persists_until_dismissed() {
        let mut log = NotificationLog::default();
        log.push(&NotificationEvent {
            text: "New objective".to_string(),
            priority: NotificationPriority::Story,
            day: 1,
        });
        log.update(1000.0);
        assert_eq!(log.active.len(), 1);
        let id = log.active[0].id;
        log.dismiss(id);
        log.update(0.0);
        assert!(log.active.is_empty());
    }

    #[test]
    fn test_journal_trimming_keeps_newest() {
        let mut log = NotificationLog {
            max_journal: 5,
            ..Default::default()
        };
        for i in 0..10 {
            log.push(&info(&format!("event {i}")));
        }
        assert_eq!(log.journal.len(), 5);
        assert_eq!(log.journal[0].text, "event 5");
        assert_eq!(log.journal[4].text, "event 9");
    }

    #[test]
    fn test_ids_unique() {
        let mut log = NotificationLog::default();
        for _ in 0..5 {
            log.push(&info("x"));
        }
        let mut ids: Vec<u64> = log.active.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
