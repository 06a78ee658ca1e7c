// The client data layer's optimistic like/bookmark flip, modeled as an
// explicit two-phase transition instead of ad-hoc component state: a toggle
// enters `Pending` holding the pre-update snapshot, then either adopts the
// server's answer or restores the snapshot. Pure logic, no I/O.

use crate::models::EngagementStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePhase {
    Pending,
    Confirmed,
    Reverted,
}

/// One in-flight optimistic toggle over an engagement snapshot.
#[derive(Debug, Clone)]
pub struct OptimisticToggle {
    snapshot: EngagementStatus,
    current: EngagementStatus,
    phase: TogglePhase,
}

impl OptimisticToggle {
    /// Flip the snapshot locally and enter `Pending`.
    pub fn begin(snapshot: EngagementStatus) -> Self {
        let current = if snapshot.active {
            EngagementStatus {
                active: false,
                count: snapshot.count.saturating_sub(1),
            }
        } else {
            EngagementStatus {
                active: true,
                count: snapshot.count + 1,
            }
        };
        Self {
            snapshot,
            current,
            phase: TogglePhase::Pending,
        }
    }

    /// Adopt the server's confirmed state. Legal only while pending.
    pub fn confirm(&mut self, server: EngagementStatus) -> Result<(), TogglePhase> {
        if self.phase != TogglePhase::Pending {
            return Err(self.phase);
        }
        self.current = server;
        self.phase = TogglePhase::Confirmed;
        Ok(())
    }

    /// Restore the pre-update snapshot. Legal only while pending.
    pub fn revert(&mut self) -> Result<(), TogglePhase> {
        if self.phase != TogglePhase::Pending {
            return Err(self.phase);
        }
        self.current = self.snapshot;
        self.phase = TogglePhase::Reverted;
        Ok(())
    }

    pub fn state(&self) -> EngagementStatus {
        self.current
    }

    pub fn phase(&self) -> TogglePhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inactive(count: u64) -> EngagementStatus {
        EngagementStatus {
            active: false,
            count,
        }
    }

    #[test]
    fn begin_flips_locally() {
        let toggle = OptimisticToggle::begin(inactive(3));
        assert_eq!(toggle.phase(), TogglePhase::Pending);
        assert!(toggle.state().active);
        assert_eq!(toggle.state().count, 4);
    }

    #[test]
    fn begin_on_active_decrements() {
        let toggle = OptimisticToggle::begin(EngagementStatus {
            active: true,
            count: 1,
        });
        assert!(!toggle.state().active);
        assert_eq!(toggle.state().count, 0);
    }

    #[test]
    fn confirm_adopts_server_state() {
        let mut toggle = OptimisticToggle::begin(inactive(3));
        toggle
            .confirm(EngagementStatus {
                active: true,
                count: 7,
            })
            .unwrap();
        assert_eq!(toggle.phase(), TogglePhase::Confirmed);
        assert_eq!(toggle.state().count, 7);
    }

    #[test]
    fn revert_restores_exact_snapshot() {
        let snapshot = inactive(3);
        let mut toggle = OptimisticToggle::begin(snapshot);
        toggle.revert().unwrap();
        assert_eq!(toggle.phase(), TogglePhase::Reverted);
        assert_eq!(toggle.state(), snapshot);
    }

    #[test]
    fn transitions_only_legal_from_pending() {
        let mut toggle = OptimisticToggle::begin(inactive(0));
        toggle.revert().unwrap();
        assert_eq!(toggle.revert().unwrap_err(), TogglePhase::Reverted);
        assert_eq!(
            toggle
                .confirm(EngagementStatus {
                    active: true,
                    count: 1
                })
                .unwrap_err(),
            TogglePhase::Reverted
        );
    }

    #[test]
    fn count_never_underflows() {
        let toggle = OptimisticToggle::begin(EngagementStatus {
            active: true,
            count: 0,
        });
        assert_eq!(toggle.state().count, 0);
    }
}
