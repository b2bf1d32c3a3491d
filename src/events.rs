use std::collections::VecDeque;

use crate::components::{Guid, Revision};

/// Structural edits applied to a scene, each stamped with the revision it produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Created {
        guid: Guid,
        revision: Revision,
    },
    /// Emitted once per destroyed object, children before their parent.
    Destroyed {
        guid: Guid,
        revision: Revision,
    },
    /// Parent and/or sibling position changed. `None` parent means top level.
    Reparented {
        guid: Guid,
        parent: Option<Guid>,
        index: usize,
        revision: Revision,
    },
    Renamed {
        guid: Guid,
        name: String,
        revision: Revision,
    },
}

impl SceneEvent {
    pub fn revision(&self) -> Revision {
        match self {
            SceneEvent::Created { revision, .. }
            | SceneEvent::Destroyed { revision, .. }
            | SceneEvent::Reparented { revision, .. }
            | SceneEvent::Renamed { revision, .. } => *revision,
        }
    }

    /// The object the edit applied to.
    pub fn guid(&self) -> Guid {
        match self {
            SceneEvent::Created { guid, .. }
            | SceneEvent::Destroyed { guid, .. }
            | SceneEvent::Reparented { guid, .. }
            | SceneEvent::Renamed { guid, .. } => *guid,
        }
    }
}

/// Bounded history of scene edits. Once full, the oldest edit is dropped.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<SceneEvent>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Room for the last 1,024 edits.
    pub fn default_capacity() -> Self {
        Self::new(1024)
    }

    pub fn push(&mut self, event: SceneEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &SceneEvent> {
        self.events.iter()
    }

    /// Edits recorded after `revision`, oldest first. Edits already dropped
    /// from the log are not reported.
    pub fn since(&self, revision: Revision) -> impl Iterator<Item = &SceneEvent> {
        // Revisions only grow, so everything past the first match qualifies.
        let start = self.events.partition_point(|e| e.revision() <= revision);
        self.events.range(start..)
    }

    pub fn last(&self) -> Option<&SceneEvent> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renamed(id: u64, rev: u64) -> SceneEvent {
        SceneEvent::Renamed {
            guid: Guid(id),
            name: format!("Object{id}"),
            revision: Revision(rev),
        }
    }

    fn revisions<'a>(events: impl Iterator<Item = &'a SceneEvent>) -> Vec<u64> {
        events.map(|e| e.revision().0).collect()
    }

    #[test]
    fn full_log_drops_oldest() {
        let mut log = EventLog::new(3);
        for i in 1..=5 {
            log.push(renamed(i, i));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(revisions(log.iter()), vec![3, 4, 5]);
        assert_eq!(log.last().map(SceneEvent::guid), Some(Guid(5)));
    }

    #[test]
    fn since_returns_later_edits_only() {
        let mut log = EventLog::new(10);
        for i in 1..=4 {
            log.push(renamed(i, i));
        }
        assert_eq!(revisions(log.since(Revision(2))), vec![3, 4]);
        assert_eq!(revisions(log.since(Revision(0))), vec![1, 2, 3, 4]);
        assert_eq!(log.since(Revision(4)).count(), 0);
    }

    #[test]
    fn since_after_wrap_skips_dropped_edits() {
        let mut log = EventLog::new(2);
        for i in 1..=5 {
            log.push(renamed(i, i));
        }
        assert_eq!(revisions(log.since(Revision(1))), vec![4, 5]);
    }

    #[test]
    fn zero_capacity_still_keeps_the_newest() {
        let mut log = EventLog::new(0);
        assert!(log.is_empty());
        assert!(log.last().is_none());
        log.push(renamed(1, 1));
        log.push(renamed(2, 2));
        assert_eq!(revisions(log.iter()), vec![2]);
    }

    #[test]
    fn every_variant_reports_guid_and_revision() {
        let events = [
            SceneEvent::Created {
                guid: Guid(7),
                revision: Revision(0),
            },
            SceneEvent::Destroyed {
                guid: Guid(7),
                revision: Revision(1),
            },
            SceneEvent::Reparented {
                guid: Guid(7),
                parent: Some(Guid(2)),
                index: 0,
                revision: Revision(2),
            },
            renamed(7, 3),
        ];

        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.revision(), Revision(i as u64));
            assert_eq!(event.guid(), Guid(7));
        }
    }
}
