use crate::constants::{schedule_duration_ticks, MODE_SCHEDULE};
use crate::types::Phase;

#[derive(Clone, Debug)]
pub struct ModeScheduler {
    index: usize,
    timer: u64,
    phase: Phase,
    tick_rate: u32,
}

impl ModeScheduler {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            index: 0,
            timer: 0,
            phase: MODE_SCHEDULE[0].0,
            tick_rate,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the new phase when an entry boundary is crossed.
    pub fn advance(&mut self) -> Option<Phase> {
        self.timer += 1;
        let duration = schedule_duration_ticks(self.index, self.tick_rate)?;
        if self.timer < duration {
            return None;
        }
        self.timer = 0;
        self.index = (self.index + 1) % MODE_SCHEDULE.len();
        self.phase = MODE_SCHEDULE[self.index].0;
        Some(self.phase)
    }
}
