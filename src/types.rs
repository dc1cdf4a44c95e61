//! This module contains types decoded from, or published about, the UPS.

use modular_bitfield::prelude::*;
use strum_macros::{AsRefStr, Display, EnumIter};

/// Which telemetry frame the next poll step requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PollState {
    #[strum(serialize = "ONOFF")]
    OnOff,
    #[strum(serialize = "ANALOG")]
    Analog,
    #[strum(serialize = "WARNING")]
    Warning,
    /// Full parameter read, scheduled at startup and after every command.
    #[default]
    #[strum(serialize = "SYSPARAM")]
    SysParam,
}

/// "DATAFLAG" byte leading the on/off and analog responses.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFlag {
    /// A warning was raised since the last warning read.
    pub warning_pending: bool,
    #[skip]
    reserved_low: B3,
    /// The on/off status changed since the last on/off read.
    pub onoff_changed: bool,
    #[skip]
    reserved_high: B3,
}

impl DataFlag {
    /// Pick the next poll state, letting a pending warning win over an on/off change.
    pub fn redirect(&self, default: PollState) -> PollState {
        if self.warning_pending() {
            PollState::Warning
        } else if self.onoff_changed() {
            PollState::OnOff
        } else {
            default
        }
    }
}

impl From<u8> for DataFlag {
    fn from(value: u8) -> Self {
        DataFlag::from_bytes([value])
    }
}

/// Tokens of the host's status word which this driver sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter)]
pub enum StatusToken {
    /// Online.
    #[strum(serialize = "OL")]
    Online,
    /// On battery.
    #[strum(serialize = "OB")]
    OnBattery,
    #[strum(serialize = "BYPASS")]
    Bypass,
}

/// Power path reported by the on/off frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsStatus {
    Online,
    OnBattery,
    OnBypass,
}

impl UpsStatus {
    /// "Power supply" field: load fed by the UPS.
    pub const SUPPLY_UPS: u8 = 0x01;
    /// "Power supply" field: load fed by the bypass.
    pub const SUPPLY_BYPASS: u8 = 0x02;
    /// "Rectifier supply" field: rectifier running from the battery.
    pub const RECTIFIER_BATTERY: u8 = 0xE2;

    /// Combine the power supply and rectifier supply fields.
    pub fn from_supply(power: u8, rectifier: u8) -> Option<Self> {
        match (power, rectifier) {
            (Self::SUPPLY_UPS, Self::RECTIFIER_BATTERY) => Some(UpsStatus::OnBattery),
            (Self::SUPPLY_UPS, _) => Some(UpsStatus::Online),
            (Self::SUPPLY_BYPASS, _) => Some(UpsStatus::OnBypass),
            _ => None,
        }
    }

    pub fn tokens(&self) -> &'static [StatusToken] {
        match self {
            UpsStatus::Online => &[StatusToken::Online],
            UpsStatus::OnBattery => &[StatusToken::OnBattery],
            UpsStatus::OnBypass => &[StatusToken::Online, StatusToken::Bypass],
        }
    }
}

/// Battery charger state, published as `battery.charger.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ChargerStatus {
    Resting,
    Charging,
    Discharging,
}

impl TryFrom<u8> for ChargerStatus {
    type Error = ();
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0xE0 => Ok(ChargerStatus::Resting),
            // Float and boost charge.
            0xE1 | 0xE2 => Ok(ChargerStatus::Charging),
            0xE3 => Ok(ChargerStatus::Discharging),
            _ => Err(()),
        }
    }
}

/// Battery self-test state, published as `ups.test.result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum BatteryTestState {
    #[strum(serialize = "In progress")]
    InProgress,
    #[strum(serialize = "Idle")]
    Idle,
}

impl TryFrom<u8> for BatteryTestState {
    type Error = ();
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0xE0 => Ok(BatteryTestState::InProgress),
            0xE1 => Ok(BatteryTestState::Idle),
            _ => Err(()),
        }
    }
}

/// Every variable this driver publishes, with the name the host knows it by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter)]
pub enum Metric {
    #[strum(serialize = "ups.mfr")]
    Manufacturer,
    #[strum(serialize = "ups.model")]
    Model,
    #[strum(serialize = "ups.id")]
    Id,
    #[strum(serialize = "input.voltage")]
    InputVoltage,
    #[strum(serialize = "output.voltage")]
    OutputVoltage,
    #[strum(serialize = "output.current")]
    OutputCurrent,
    #[strum(serialize = "battery.voltage")]
    BatteryVoltage,
    #[strum(serialize = "output.frequency")]
    OutputFrequency,
    #[strum(serialize = "input.frequency")]
    InputFrequency,
    #[strum(serialize = "ups.realpower")]
    RealPower,
    #[strum(serialize = "ups.power")]
    ApparentPower,
    #[strum(serialize = "battery.runtime.low")]
    RuntimeLow,
    #[strum(serialize = "output.voltage.nominal")]
    NominalVoltage,
    #[strum(serialize = "output.frequency.nominal")]
    NominalFrequency,
    /// Only published while the UPS reports the limit as enabled.
    #[strum(serialize = "input.transfer.bypass.high")]
    BypassHigh,
    /// Only published while the UPS reports the limit as enabled.
    #[strum(serialize = "input.transfer.bypass.low")]
    BypassLow,
    #[strum(serialize = "ups.test.interval")]
    TestInterval,
    #[strum(serialize = "battery.charger.status")]
    ChargerStatus,
    #[strum(serialize = "ups.test.result")]
    TestResult,
}
