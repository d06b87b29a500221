//! Mission list and completion flags.

/// Number of missions in a session.
pub const MISSION_COUNT: usize = 5;

/// A fixed mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mission {
    /// Short title.
    pub title: &'static str,
    /// What the player has to do.
    pub description: &'static str,
}

/// The missions, in display order.
pub static MISSIONS: [Mission; MISSION_COUNT] = [
    Mission {
        title: "Gatherer",
        description: "Collect 10 wood and 6 stone.",
    },
    Mission {
        title: "Workbench",
        description: "Build a work post.",
    },
    Mission {
        title: "Defense & Food",
        description: "Build a tower and a farm.",
    },
    Mission {
        title: "Hunter",
        description: "Capture 2 different creatures.",
    },
    Mission {
        title: "Miniboss",
        description: "Defeat the night boss in the woods.",
    },
];

/// Completion state of every mission.
///
/// No gameplay rule completes a mission on its own; [`MissionTracker::complete`]
/// is the hook for rules that do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MissionTracker {
    completed: [bool; MISSION_COUNT],
}

impl MissionTracker {
    /// All missions open.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completed: [false; MISSION_COUNT],
        }
    }

    /// Restore from persisted flags.
    #[must_use]
    pub const fn from_flags(completed: [bool; MISSION_COUNT]) -> Self {
        Self { completed }
    }

    /// Completion flags in mission order.
    #[must_use]
    pub const fn flags(self) -> [bool; MISSION_COUNT] {
        self.completed
    }

    /// Whether mission `index` is done. Unknown indices are never done.
    #[must_use]
    pub fn is_complete(self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    /// Mark mission `index` done. Returns `false` if it was already done or doesn't exist.
    pub fn complete(&mut self, index: usize) -> bool {
        match self.completed.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    /// Number of completed missions.
    #[must_use]
    pub fn completed_count(self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    /// Missions paired with their completion flag.
    pub fn iter(self) -> impl Iterator<Item = (&'static Mission, bool)> {
        MISSIONS.iter().zip(self.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_open() {
        let tracker = MissionTracker::new();
        assert_eq!(tracker.completed_count(), 0);
        assert_eq!(tracker.iter().count(), MISSION_COUNT);
        assert_eq!(tracker.iter().next().unwrap().0.title, "Gatherer");
    }

    #[test]
    fn test_complete_once() {
        let mut tracker = MissionTracker::new();
        assert!(tracker.complete(1));
        assert!(!tracker.complete(1));
        assert!(!tracker.complete(MISSION_COUNT));
        assert!(tracker.is_complete(1));
        assert!(!tracker.is_complete(7));
        assert_eq!(tracker.completed_count(), 1);
    }

    #[test]
    fn test_flags_roundtrip() {
        let flags = [true, false, true, false, false];
        let tracker = MissionTracker::from_flags(flags);
        assert_eq!(tracker.flags(), flags);
        assert_eq!(tracker.completed_count(), 2);
    }
}
