use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What the booking service does when a storage lookup it only uses as a
/// pre-check fails.
///
/// Covers the guest and room availability checks, the read before a patch,
/// single reads and listing. Writes always propagate their errors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PrecheckPolicy {
    /// Log the failure and carry on as if the lookup found nothing.
    FailOpen,
    /// Return the storage error to the caller.
    #[default]
    FailClosed,
}
