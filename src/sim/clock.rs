use super::types::HOURS_PER_DAY;

/// Hour counter for one simulated day.
///
/// Hands out hours `0..total` strictly in order and is terminal afterwards,
/// which is what keeps battery state and committed demands flowing forward
/// one hour at a time.
///
/// # Examples
///
/// ```
/// use mg_game_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3);
/// let mut hours = Vec::new();
///
/// clock.run(|hour| hours.push(hour));
/// assert_eq!(hours, vec![0, 1, 2]);
/// assert!(clock.is_finished());
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Next hour to hand out.
    current: usize,
    /// Hours in the horizon.
    total: usize,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(HOURS_PER_DAY)
    }
}

impl Clock {
    /// Creates a clock over `total` hours.
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Hands out the next hour, or `None` once the day is over.
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let hour = self.current;
            self.current += 1;
            Some(hour)
        } else {
            None
        }
    }

    /// Hour that the next `tick` will return.
    pub fn next_hour(&self) -> usize {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.total
    }

    /// Calls `f` for every remaining hour.
    pub fn run(&mut self, mut f: impl FnMut(usize)) {
        while let Some(hour) = self.tick() {
            f(hour);
        }
    }

    /// Calls `f` for every remaining hour, stopping at the first error.
    ///
    /// The failing hour counts as consumed.
    pub fn try_run<E>(&mut self, mut f: impl FnMut(usize) -> Result<(), E>) -> Result<(), E> {
        while let Some(hour) = self.tick() {
            f(hour)?;
        }
        Ok(())
    }
}
