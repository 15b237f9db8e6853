/*
 * This file is part of Hyperfan.
 *
 * Copyright (C) 2025 Hyperfan contributors
 *
 * Hyperfan is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Hyperfan is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Hyperfan. If not, see <https://www.gnu.org/licenses/>.
 */

//! Semantic sensor types
//!
//! Maps libsensors' numeric codes onto enums. Every mapping is total: codes
//! this crate does not know about (a newer libsensors, say) land on
//! [`BusType::Any`], [`FeatureType::Unknown`] or [`SubfeatureType::Unknown`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ffi::*;

/// Bus a chip is attached through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusType {
    Any,
    I2c,
    Isa,
    Pci,
    Spi,
    Virtual,
    Acpi,
    Hid,
    Mdio,
    Scsi,
}

impl BusType {
    pub fn from_native(code: i16) -> Self {
        match code {
            SENSORS_BUS_TYPE_I2C => BusType::I2c,
            SENSORS_BUS_TYPE_ISA => BusType::Isa,
            SENSORS_BUS_TYPE_PCI => BusType::Pci,
            SENSORS_BUS_TYPE_SPI => BusType::Spi,
            SENSORS_BUS_TYPE_VIRTUAL => BusType::Virtual,
            SENSORS_BUS_TYPE_ACPI => BusType::Acpi,
            SENSORS_BUS_TYPE_HID => BusType::Hid,
            SENSORS_BUS_TYPE_MDIO => BusType::Mdio,
            SENSORS_BUS_TYPE_SCSI => BusType::Scsi,
            _ => BusType::Any,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BusType::Any => "any",
            BusType::I2c => "i2c",
            BusType::Isa => "isa",
            BusType::Pci => "pci",
            BusType::Spi => "spi",
            BusType::Virtual => "virtual",
            BusType::Acpi => "acpi",
            BusType::Hid => "hid",
            BusType::Mdio => "mdio",
            BusType::Scsi => "scsi",
        }
    }
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of measurement a feature groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    In,
    Fan,
    Temp,
    Power,
    Energy,
    Current,
    Humidity,
    Vid,
    Intrusion,
    Beep,
    Unknown,
}

impl FeatureType {
    pub fn from_native(code: i32) -> Self {
        match code {
            SENSORS_FEATURE_IN => FeatureType::In,
            SENSORS_FEATURE_FAN => FeatureType::Fan,
            SENSORS_FEATURE_TEMP => FeatureType::Temp,
            SENSORS_FEATURE_POWER => FeatureType::Power,
            SENSORS_FEATURE_ENERGY => FeatureType::Energy,
            SENSORS_FEATURE_CURR => FeatureType::Current,
            SENSORS_FEATURE_HUMIDITY => FeatureType::Humidity,
            SENSORS_FEATURE_VID => FeatureType::Vid,
            SENSORS_FEATURE_INTRUSION => FeatureType::Intrusion,
            SENSORS_FEATURE_BEEP_ENABLE => FeatureType::Beep,
            _ => FeatureType::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeatureType::In => "in",
            FeatureType::Fan => "fan",
            FeatureType::Temp => "temp",
            FeatureType::Power => "power",
            FeatureType::Energy => "energy",
            FeatureType::Current => "current",
            FeatureType::Humidity => "humidity",
            FeatureType::Vid => "vid",
            FeatureType::Intrusion => "intrusion",
            FeatureType::Beep => "beep",
            FeatureType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a subfeature within its feature.
///
/// Several native codes share one variant: `in0_input`, `fan1_input` and
/// `temp1_input` are all [`SubfeatureType::Input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubfeatureType {
    Input,
    InputLowest,
    InputHighest,
    Cap,
    CapHyst,
    CapAlarm,
    Min,
    MinHyst,
    MinAlarm,
    Max,
    MaxHyst,
    MaxAlarm,
    Average,
    Lowest,
    Highest,
    AverageLowest,
    AverageHighest,
    AverageInterval,
    Crit,
    CritHyst,
    CritAlarm,
    LCrit,
    LCritHyst,
    LCritAlarm,
    Alarm,
    Fault,
    Emergency,
    EmergencyHyst,
    EmergencyAlarm,
    Type,
    Offset,
    Div,
    Beep,
    Pulses,
    Vid,
    Enable,
    Unknown,
}

impl SubfeatureType {
    pub fn from_native(code: i32) -> Self {
        use SubfeatureType::*;

        match code {
            SENSORS_SUBFEATURE_IN_INPUT
            | SENSORS_SUBFEATURE_FAN_INPUT
            | SENSORS_SUBFEATURE_TEMP_INPUT
            | SENSORS_SUBFEATURE_POWER_INPUT
            | SENSORS_SUBFEATURE_ENERGY_INPUT
            | SENSORS_SUBFEATURE_CURR_INPUT
            | SENSORS_SUBFEATURE_HUMIDITY_INPUT => Input,

            SENSORS_SUBFEATURE_POWER_INPUT_LOWEST => InputLowest,
            SENSORS_SUBFEATURE_POWER_INPUT_HIGHEST => InputHighest,

            SENSORS_SUBFEATURE_POWER_CAP => Cap,
            SENSORS_SUBFEATURE_POWER_CAP_ALARM => CapAlarm,
            SENSORS_SUBFEATURE_POWER_CAP_HYST => CapHyst,

            SENSORS_SUBFEATURE_IN_MIN
            | SENSORS_SUBFEATURE_FAN_MIN
            | SENSORS_SUBFEATURE_TEMP_MIN
            | SENSORS_SUBFEATURE_POWER_MIN
            | SENSORS_SUBFEATURE_CURR_MIN => Min,

            SENSORS_SUBFEATURE_IN_MIN_ALARM
            | SENSORS_SUBFEATURE_FAN_MIN_ALARM
            | SENSORS_SUBFEATURE_TEMP_MIN_ALARM
            | SENSORS_SUBFEATURE_POWER_MIN_ALARM
            | SENSORS_SUBFEATURE_CURR_MIN_ALARM => MinAlarm,

            SENSORS_SUBFEATURE_TEMP_MIN_HYST => MinHyst,

            SENSORS_SUBFEATURE_IN_MAX
            | SENSORS_SUBFEATURE_FAN_MAX
            | SENSORS_SUBFEATURE_TEMP_MAX
            | SENSORS_SUBFEATURE_POWER_MAX
            | SENSORS_SUBFEATURE_CURR_MAX => Max,

            SENSORS_SUBFEATURE_IN_MAX_ALARM
            | SENSORS_SUBFEATURE_FAN_MAX_ALARM
            | SENSORS_SUBFEATURE_TEMP_MAX_ALARM
            | SENSORS_SUBFEATURE_POWER_MAX_ALARM
            | SENSORS_SUBFEATURE_CURR_MAX_ALARM => MaxAlarm,

            SENSORS_SUBFEATURE_TEMP_MAX_HYST => MaxHyst,

            SENSORS_SUBFEATURE_IN_LOWEST
            | SENSORS_SUBFEATURE_TEMP_LOWEST
            | SENSORS_SUBFEATURE_CURR_LOWEST => Lowest,

            SENSORS_SUBFEATURE_IN_HIGHEST
            | SENSORS_SUBFEATURE_TEMP_HIGHEST
            | SENSORS_SUBFEATURE_CURR_HIGHEST => Highest,

            SENSORS_SUBFEATURE_IN_AVERAGE
            | SENSORS_SUBFEATURE_POWER_AVERAGE
            | SENSORS_SUBFEATURE_CURR_AVERAGE => Average,

            SENSORS_SUBFEATURE_POWER_AVERAGE_LOWEST => AverageLowest,
            SENSORS_SUBFEATURE_POWER_AVERAGE_HIGHEST => AverageHighest,
            SENSORS_SUBFEATURE_POWER_AVERAGE_INTERVAL => AverageInterval,

            SENSORS_SUBFEATURE_IN_LCRIT
            | SENSORS_SUBFEATURE_TEMP_LCRIT
            | SENSORS_SUBFEATURE_POWER_LCRIT
            | SENSORS_SUBFEATURE_CURR_LCRIT => LCrit,

            SENSORS_SUBFEATURE_IN_LCRIT_ALARM
            | SENSORS_SUBFEATURE_TEMP_LCRIT_ALARM
            | SENSORS_SUBFEATURE_POWER_LCRIT_ALARM
            | SENSORS_SUBFEATURE_CURR_LCRIT_ALARM => LCritAlarm,

            SENSORS_SUBFEATURE_TEMP_LCRIT_HYST => LCritHyst,

            SENSORS_SUBFEATURE_IN_CRIT
            | SENSORS_SUBFEATURE_TEMP_CRIT
            | SENSORS_SUBFEATURE_POWER_CRIT
            | SENSORS_SUBFEATURE_CURR_CRIT => Crit,

            SENSORS_SUBFEATURE_IN_CRIT_ALARM
            | SENSORS_SUBFEATURE_TEMP_CRIT_ALARM
            | SENSORS_SUBFEATURE_POWER_CRIT_ALARM
            | SENSORS_SUBFEATURE_CURR_CRIT_ALARM => CritAlarm,

            SENSORS_SUBFEATURE_TEMP_CRIT_HYST => CritHyst,

            SENSORS_SUBFEATURE_IN_BEEP
            | SENSORS_SUBFEATURE_FAN_BEEP
            | SENSORS_SUBFEATURE_TEMP_BEEP
            | SENSORS_SUBFEATURE_CURR_BEEP
            | SENSORS_SUBFEATURE_INTRUSION_BEEP => Beep,

            SENSORS_SUBFEATURE_FAN_DIV => Div,
            SENSORS_SUBFEATURE_FAN_PULSES => Pulses,
            SENSORS_SUBFEATURE_BEEP_ENABLE => Enable,
            SENSORS_SUBFEATURE_TEMP_TYPE => Type,
            SENSORS_SUBFEATURE_TEMP_OFFSET => Offset,
            SENSORS_SUBFEATURE_VID => Vid,

            SENSORS_SUBFEATURE_IN_ALARM
            | SENSORS_SUBFEATURE_FAN_ALARM
            | SENSORS_SUBFEATURE_TEMP_ALARM
            | SENSORS_SUBFEATURE_POWER_ALARM
            | SENSORS_SUBFEATURE_CURR_ALARM
            | SENSORS_SUBFEATURE_INTRUSION_ALARM => Alarm,

            SENSORS_SUBFEATURE_FAN_FAULT | SENSORS_SUBFEATURE_TEMP_FAULT => Fault,

            SENSORS_SUBFEATURE_TEMP_EMERGENCY => Emergency,
            SENSORS_SUBFEATURE_TEMP_EMERGENCY_ALARM => EmergencyAlarm,
            SENSORS_SUBFEATURE_TEMP_EMERGENCY_HYST => EmergencyHyst,

            _ => Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        use SubfeatureType::*;

        match self {
            Input => "input",
            InputLowest => "input_lowest",
            InputHighest => "input_highest",
            Cap => "cap",
            CapHyst => "cap_hyst",
            CapAlarm => "cap_alarm",
            Min => "min",
            MinHyst => "min_hyst",
            MinAlarm => "min_alarm",
            Max => "max",
            MaxHyst => "max_hyst",
            MaxAlarm => "max_alarm",
            Average => "average",
            Lowest => "lowest",
            Highest => "highest",
            AverageLowest => "average_lowest",
            AverageHighest => "average_highest",
            AverageInterval => "average_interval",
            Crit => "crit",
            CritHyst => "crit_hyst",
            CritAlarm => "crit_alarm",
            LCrit => "l_crit",
            LCritHyst => "l_crit_hyst",
            LCritAlarm => "l_crit_alarm",
            Alarm => "alarm",
            Fault => "fault",
            Emergency => "emergency",
            EmergencyHyst => "emergency_hyst",
            EmergencyAlarm => "emergency_alarm",
            Type => "type",
            Offset => "offset",
            Div => "div",
            Beep => "beep",
            Pulses => "pulses",
            Vid => "vid",
            Enable => "enable",
            Unknown => "unknown",
        }
    }
}

impl fmt::Display for SubfeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
