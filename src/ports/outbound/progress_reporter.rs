/// ProgressReporter port for reporting progress during resolution
///
/// This port abstracts user-facing progress output (e.g., a spinner on
/// stderr). Diagnostic records go through `tracing` instead.
pub trait ProgressReporter: Send + Sync {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress as a fraction of sections resolved
    ///
    /// # Arguments
    /// * `current` - Sections finished so far
    /// * `total` - Sections due this cycle
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning that does not abort the request
    fn report_error(&self, message: &str);

    /// Reports completion of the request
    fn report_completion(&self, message: &str);
}
