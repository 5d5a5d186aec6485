use crate::constants::ghost_points;
use crate::types::GhostRole;

#[derive(Clone, Debug)]
pub struct PowerState {
    active: bool,
    ticks: u32,
    duration: u32,
    eaten: [bool; 4],
}

impl PowerState {
    pub fn new(duration: u32) -> Self {
        Self {
            active: false,
            ticks: 0,
            duration,
            eaten: [false; 4],
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn ticks_left(&self) -> u32 {
        if self.active {
            self.duration.saturating_sub(self.ticks)
        } else {
            0
        }
    }

    pub fn is_eaten(&self, role: GhostRole) -> bool {
        self.eaten[role.index()]
    }

    pub fn eaten_count(&self) -> u32 {
        self.eaten.iter().filter(|eaten| **eaten).count() as u32
    }

    /// A power pellet restarts the cycle even when one is already running.
    pub fn activate(&mut self) {
        self.active = true;
        self.ticks = 0;
        self.eaten = [false; 4];
    }

    /// Returns true on the tick the cycle runs out.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.ticks += 1;
        if self.ticks < self.duration {
            return false;
        }
        self.clear();
        true
    }

    pub fn mark_eaten(&mut self, role: GhostRole) -> u32 {
        self.eaten[role.index()] = true;
        ghost_points(self.eaten_count())
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.ticks = 0;
        self.eaten = [false; 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::POWER_TICKS;

    #[test]
    fn expires_after_exactly_duration_ticks() {
        let mut power = PowerState::new(POWER_TICKS);
        power.activate();
        power.mark_eaten(GhostRole::Flanker);
        for _ in 0..POWER_TICKS - 1 {
            assert!(!power.tick());
        }
        assert!(power.is_active());
        assert_eq!(power.ticks_left(), 1);
        assert!(power.tick());
        assert!(!power.is_active());
        assert!(!power.is_eaten(GhostRole::Flanker));
        assert_eq!(power.ticks_left(), 0);
    }

    #[test]
    fn reactivation_restarts_timer_and_clears_eaten() {
        let mut power = PowerState::new(POWER_TICKS);
        power.activate();
        for _ in 0..400 {
            power.tick();
        }
        power.mark_eaten(GhostRole::Chaser);
        power.activate();
        assert_eq!(power.ticks_left(), POWER_TICKS);
        assert_eq!(power.eaten_count(), 0);
    }

    #[test]
    fn eaten_points_double_per_pursuer() {
        let mut power = PowerState::new(POWER_TICKS);
        power.activate();
        let points: Vec<u32> = GhostRole::ALL
            .iter()
            .map(|role| power.mark_eaten(*role))
            .collect();
        assert_eq!(points, vec![200, 400, 800, 1600]);
    }

    #[test]
    fn inactive_tick_is_noop() {
        let mut power = PowerState::new(POWER_TICKS);
        assert!(!power.tick());
        assert!(!power.is_active());
    }
}
