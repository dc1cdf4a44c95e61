//! Where decoded telemetry goes.

/// The host's view of the UPS.
///
/// Alarms and status are replaced as a whole: the driver opens a transaction, sets every active
/// entry, then commits. [`TelemetrySink::get_status`] answers for the last committed status.
pub trait TelemetrySink {
    /// Publish `value` under the variable `name`.
    fn set(&mut self, name: &str, value: &str);

    /// The last exchange failed. Previously published values remain, flagged as stale.
    fn mark_stale(&mut self);

    /// Fresh data was published.
    fn mark_ok(&mut self);

    fn begin_alarms(&mut self);
    fn raise_alarm(&mut self, name: &str);
    fn commit_alarms(&mut self);

    fn begin_status(&mut self);
    fn set_status(&mut self, token: &str);
    fn commit_status(&mut self);

    /// Whether `token` is part of the committed status.
    fn get_status(&self, token: &str) -> bool;
}
