//! This module is used to define where each field sits inside the INFO of a response.
//!
//! All offsets are in hex characters from the start of INFO. One byte fields are two characters
//! wide and two byte fields are four.

/// DATAFLAG, leading the on/off and analog responses.
pub const DATA_FLAG: usize = 0;

/// Shortest INFO of each response, in characters.
pub mod min_info_len {
    pub const ON_OFF: usize = 0x14;
    pub const ANALOG: usize = 0x56;
    pub const WARNING: usize = 0x36;
    pub const SYS_PARAM: usize = 0x6A;
    /// The vendor info response must carry the full model name.
    pub const VENDOR_INFO: usize = 22;
    /// Command acknowledgements carry no INFO.
    pub const COMMAND: usize = 0;
}

/// Fields of the on/off status response. One byte each.
#[derive(Debug, Copy, Clone)]
#[repr(usize)]
pub enum OnOffField {
    /// Field 1 - Power supply.
    /// * `01` - UPS.
    /// * `02` - Bypass.
    PowerSupply = 2,
    /// Field 3 - Rectifier power supply.
    /// * `E0` - None.
    /// * `E1` - Mains.
    /// * `E2` - Battery.
    RectifierSupply = 6,
    /// Field 4 - Battery status.
    ///
    /// See [`ChargerStatus`](crate::types::ChargerStatus).
    BatteryStatus = 8,
    /// Field 5 - Battery test state.
    ///
    /// See [`BatteryTestState`](crate::types::BatteryTestState).
    BatteryTest = 10,
}

/// Fields of the analog measurement response. Two bytes each, fixed point.
#[derive(Debug, Copy, Clone)]
#[repr(usize)]
pub enum AnalogField {
    /// Field 1 - AC input voltage, centivolts.
    InputVoltage = 2,
    /// Field 4 - AC output voltage, centivolts.
    OutputVoltage = 14,
    /// Field 7 - AC output current, centiamps.
    OutputCurrent = 26,
    /// Field 10 - DC (battery) voltage, centivolts.
    BatteryVoltage = 38,
    /// Field 11 - AC output frequency, centihertz.
    OutputFrequency = 42,
    /// Field 15 - AC input frequency, centihertz.
    InputFrequency = 54,
    /// Field 18 - Output real power, tens of watts.
    RealPower = 66,
    /// Field 19 - Output apparent power, tens of VA.
    ApparentPower = 70,
    /// Field 22 - Battery backup time, hundredths of an hour.
    BackupTime = 82,
}

/// Fields of the system parameter response. Two bytes each.
#[derive(Debug, Copy, Clone)]
#[repr(usize)]
pub enum SysParamField {
    /// Field 6 - Nominal output voltage, volts.
    NominalVoltage = 18,
    /// Field 7 - Nominal output frequency, hertz.
    NominalFrequency = 22,
    /// Field 10 - Bypass working voltage maximum enabled. Always 115% of nominal.
    BypassHighEnabled = 34,
    /// Field 11 - Bypass working voltage minimum enabled.
    BypassLowEnabled = 38,
    /// Field 21 - Battery test interval, in units of three months.
    TestInterval = 78,
}

impl From<OnOffField> for usize {
    fn from(value: OnOffField) -> Self {
        value as usize
    }
}

impl From<AnalogField> for usize {
    fn from(value: AnalogField) -> Self {
        value as usize
    }
}

impl From<SysParamField> for usize {
    fn from(value: SysParamField) -> Self {
        value as usize
    }
}

/// Offset and width of the model name in the vendor info response.
pub const MODEL_NAME: usize = 0;
pub const MODEL_NAME_WIDTH: usize = 20;

/// Warning descriptions, positioned as the one byte fields of the warning response.
///
/// `None` marks a position which carries no warning (the DATAFLAG and user defined fields).
pub const WARNINGS: [Option<&str>; 26] = [
    None,
    Some("Inverter Out-of-Sync"),
    Some("Unhealthy Main Circuit"),
    Some("Rectifier Failure"),
    Some("Inverter Failure"),
    Some("Unhealthy Bypass"),
    Some("Unhealthy Battery Voltage"),
    None,
    None,
    Some("Power Module Overheated"),
    Some("Unhealthy Fan"),
    Some("Neutral Input Missing"),
    Some("Master Line Abnormally Turned-off"),
    Some("Charger Failure"),
    Some("Battery Discharge Declined"),
    Some("Backup Power Supply Failure"),
    Some("Output Overloaded"),
    Some("Output Shorted"),
    Some("Overload Timed-out"),
    Some("Unhealthy Parallel Machine Current"),
    Some("Parallel Machine Connection Failure"),
    Some("Parallel Machine Address Error"),
    Some("Unhealthy Internal Communication"),
    Some("System Overloaded"),
    Some("Battery Installed Backwards"),
    Some("Battery Not Found"),
];

/// INFO offset of the warning at `index` in [`WARNINGS`].
pub const fn warning_offset(index: usize) -> usize {
    2 + index * 2
}
