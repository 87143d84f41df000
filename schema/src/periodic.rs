/// A unit of work run once per timer firing
pub trait Periodic: Send + Sync + 'static {
    /// Short name used when logging
    fn name(&self) -> &'static str;

    /// Process the current snapshot of registrations once.
    /// Failures of individual items must not abort the round.
    fn tick(&self) -> TickReport;
}

/// Outcome of a single round
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Number of registrations visited
    pub visited: usize,
    /// Number of those which failed
    pub failed: usize,
}

impl TickReport {
    pub fn succeeded(&self) -> usize {
        self.visited - self.failed
    }
}
