//! Decoders for each telemetry response of the poll cycle.
//!
//! Decoding is separate from publishing so each frame's contents can be inspected on their own.
//! Unexpected field values are logged and left out, never treated as an error. Only a field
//! missing from the received bytes fails a decode.

use crate::{
    error::FrameError,
    fields::{AnalogField, DATA_FLAG, OnOffField, SysParamField, WARNINGS, warning_offset},
    frame::Response,
    scaling::Scaling,
    types::{BatteryTestState, ChargerStatus, DataFlag, UpsStatus},
};

/// Contents of the on/off status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnOffStatus {
    pub flag: DataFlag,
    pub status: Option<UpsStatus>,
    pub charger: Option<ChargerStatus>,
    pub battery_test: Option<BatteryTestState>,
}

impl OnOffStatus {
    pub fn decode(response: &Response<'_>) -> Result<Self, FrameError> {
        let flag = DataFlag::from(response.hex_u8(DATA_FLAG)?);

        let power = response.hex_u8(OnOffField::PowerSupply)?;
        let rectifier = response.hex_u8(OnOffField::RectifierSupply)?;
        let status = UpsStatus::from_supply(power, rectifier);
        if status.is_none() {
            log::warn!("unknown ups state: {:x} {:x}", power, rectifier);
        }

        let charger_raw = response.hex_u8(OnOffField::BatteryStatus)?;
        let charger = ChargerStatus::try_from(charger_raw).ok();
        if charger.is_none() {
            log::warn!("unknown battery status {:x}, ignored", charger_raw);
        }

        let test_raw = response.hex_u8(OnOffField::BatteryTest)?;
        let battery_test = BatteryTestState::try_from(test_raw).ok();
        if battery_test.is_none() {
            log::warn!("unknown battery test state {:x}, ignored", test_raw);
        }

        Ok(Self {
            flag,
            status,
            charger,
            battery_test,
        })
    }
}

/// Raw contents of the analog measurement response. See [`AnalogField`] for units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogMeasurements {
    pub flag: DataFlag,
    pub input_voltage: u16,
    pub output_voltage: u16,
    pub output_current: u16,
    pub battery_voltage: u16,
    pub output_frequency: u16,
    pub input_frequency: u16,
    pub real_power: u16,
    pub apparent_power: u16,
    pub backup_time: u16,
}

impl AnalogMeasurements {
    pub fn decode(response: &Response<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            // The UPS does not always set this reliably in analog responses.
            flag: DataFlag::from(response.hex_u8(DATA_FLAG)?),
            input_voltage: response.hex_u16(AnalogField::InputVoltage)?,
            output_voltage: response.hex_u16(AnalogField::OutputVoltage)?,
            output_current: response.hex_u16(AnalogField::OutputCurrent)?,
            battery_voltage: response.hex_u16(AnalogField::BatteryVoltage)?,
            output_frequency: response.hex_u16(AnalogField::OutputFrequency)?,
            input_frequency: response.hex_u16(AnalogField::InputFrequency)?,
            real_power: response.hex_u16(AnalogField::RealPower)?,
            apparent_power: response.hex_u16(AnalogField::ApparentPower)?,
            backup_time: response.hex_u16(AnalogField::BackupTime)?,
        })
    }

    /// Input voltage in whole volts, truncated.
    pub fn input_volts(&self) -> u64 {
        Scaling::CENTI.to_integer(self.input_voltage)
    }
}

/// Contents of the system parameter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemParameters {
    pub nominal_voltage: u16,
    pub nominal_frequency: u16,
    pub bypass_high_enabled: bool,
    pub bypass_low_enabled: bool,
    pub test_interval: u16,
}

impl SystemParameters {
    pub fn decode(response: &Response<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            nominal_voltage: response.hex_u16(SysParamField::NominalVoltage)?,
            nominal_frequency: response.hex_u16(SysParamField::NominalFrequency)?,
            bypass_high_enabled: response.hex_u16(SysParamField::BypassHighEnabled)? == 1,
            bypass_low_enabled: response.hex_u16(SysParamField::BypassLowEnabled)? == 1,
            test_interval: response.hex_u16(SysParamField::TestInterval)?,
        })
    }
}

/// Active warnings from the warning response, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WarningReport {
    pub active: heapless::Vec<&'static str, { WARNINGS.len() }>,
}

impl WarningReport {
    pub fn decode(response: &Response<'_>) -> Result<Self, FrameError> {
        let mut report = Self::default();
        for (index, name) in WARNINGS.into_iter().enumerate() {
            let Some(name) = name else {
                continue;
            };
            match response.hex_u8(warning_offset(index))? {
                0x00 => {}
                0x01..=0x03 | 0xF0 => {
                    // Capacity matches the table, so this cannot fail.
                    let _ = report.active.push(name);
                }
                other => log::warn!("unexpected warning val {:x} for {}", other, name),
            }
        }
        Ok(report)
    }
}
