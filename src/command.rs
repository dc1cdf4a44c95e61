//! Instant commands the host can ask the UPS to carry out.

use strum_macros::{AsRefStr, EnumIter, EnumString};

/// The commands the UPS accepts through the remote command frame.
///
/// Names parse case-insensitively, so `Load.ON` is the same command as `load.on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum InstantCommand {
    #[strum(serialize = "test.battery.start")]
    BatteryTestStart,
    #[strum(serialize = "test.battery.stop")]
    BatteryTestStop,
    #[strum(serialize = "load.on")]
    LoadOn,
    #[strum(serialize = "load.off")]
    LoadOff,
}

impl InstantCommand {
    /// INFO sent with the remote command frame.
    pub const fn payload(self) -> &'static [u8; 4] {
        match self {
            InstantCommand::BatteryTestStart => b"1002",
            InstantCommand::BatteryTestStop => b"1003",
            InstantCommand::LoadOn => b"2001",
            InstantCommand::LoadOff => b"2003",
        }
    }

    /// Look a command up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

/// What became of an instant command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// The UPS acknowledged the command.
    Handled,
    /// The UPS never acknowledged the command. It may still have acted on it.
    Failed,
    /// No such command. The UPS was not contacted.
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(InstantCommand::from_name("Load.ON"), Some(InstantCommand::LoadOn));
        assert_eq!(InstantCommand::from_name("load.on"), Some(InstantCommand::LoadOn));
        assert_eq!(
            InstantCommand::from_name("TEST.BATTERY.START"),
            Some(InstantCommand::BatteryTestStart)
        );
    }

    #[test]
    fn unknown_names() {
        assert_eq!(InstantCommand::from_name("load.reset"), None);
        assert_eq!(InstantCommand::from_name(""), None);
    }

    #[test]
    fn payloads() {
        let expected = [
            ("test.battery.start", b"1002"),
            ("test.battery.stop", b"1003"),
            ("load.on", b"2001"),
            ("load.off", b"2003"),
        ];
        assert_eq!(InstantCommand::iter().count(), expected.len());
        for (cmd, (name, payload)) in InstantCommand::iter().zip(expected) {
            assert_eq!(cmd.as_ref(), name);
            assert_eq!(cmd.payload(), payload);
        }
    }
}
