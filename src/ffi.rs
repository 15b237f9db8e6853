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

//! Raw libsensors ABI
//!
//! Struct layouts, numeric codes and entry point signatures from
//! `<sensors/sensors.h>` and `<sensors/error.h>` (lm-sensors 3.x).

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int, c_short, c_uint};

// ============================================================================
// Structures
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct sensors_bus_id {
    pub type_: c_short,
    pub nr: c_short,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct sensors_chip_name {
    pub prefix: *mut c_char,
    pub bus: sensors_bus_id,
    pub addr: c_int,
    pub path: *mut c_char,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct sensors_feature {
    pub name: *mut c_char,
    pub number: c_int,
    pub type_: c_int,
    pub first_subfeature: c_int,
    pub padding1: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct sensors_subfeature {
    pub name: *mut c_char,
    pub number: c_int,
    pub type_: c_int,
    pub mapping: c_int,
    pub flags: c_uint,
}

// ============================================================================
// Entry points
// ============================================================================

pub type sensors_init_fn = unsafe extern "C" fn(input: *mut libc::FILE) -> c_int;
pub type sensors_cleanup_fn = unsafe extern "C" fn();
pub type sensors_get_detected_chips_fn =
    unsafe extern "C" fn(match_: *const sensors_chip_name, nr: *mut c_int) -> *const sensors_chip_name;
pub type sensors_get_features_fn =
    unsafe extern "C" fn(name: *const sensors_chip_name, nr: *mut c_int) -> *const sensors_feature;
pub type sensors_get_all_subfeatures_fn = unsafe extern "C" fn(
    name: *const sensors_chip_name,
    feature: *const sensors_feature,
    nr: *mut c_int,
) -> *const sensors_subfeature;
pub type sensors_get_label_fn =
    unsafe extern "C" fn(name: *const sensors_chip_name, feature: *const sensors_feature) -> *mut c_char;
pub type sensors_get_value_fn =
    unsafe extern "C" fn(name: *const sensors_chip_name, subfeat_nr: c_int, value: *mut f64) -> c_int;
pub type sensors_set_value_fn =
    unsafe extern "C" fn(name: *const sensors_chip_name, subfeat_nr: c_int, value: f64) -> c_int;
pub type sensors_snprintf_chip_name_fn =
    unsafe extern "C" fn(str_: *mut c_char, size: libc::size_t, chip: *const sensors_chip_name) -> c_int;
pub type sensors_get_adapter_name_fn = unsafe extern "C" fn(bus: *const sensors_bus_id) -> *const c_char;
pub type sensors_strerror_fn = unsafe extern "C" fn(errnum: c_int) -> *const c_char;

// ============================================================================
// Subfeature flags
// ============================================================================

pub const SENSORS_MODE_R: u32 = 1;
pub const SENSORS_MODE_W: u32 = 2;
pub const SENSORS_COMPUTE_MAPPING: u32 = 4;

// ============================================================================
// Error codes (returned negated)
// ============================================================================

pub const SENSORS_ERR_WILDCARDS: i32 = 1;
pub const SENSORS_ERR_NO_ENTRY: i32 = 2;
pub const SENSORS_ERR_ACCESS_R: i32 = 3;
pub const SENSORS_ERR_KERNEL: i32 = 4;
pub const SENSORS_ERR_DIV_ZERO: i32 = 5;
pub const SENSORS_ERR_CHIP_NAME: i32 = 6;
pub const SENSORS_ERR_BUS_NAME: i32 = 7;
pub const SENSORS_ERR_PARSE: i32 = 8;
pub const SENSORS_ERR_ACCESS_W: i32 = 9;
pub const SENSORS_ERR_IO: i32 = 10;
pub const SENSORS_ERR_RECURSION: i32 = 11;

/// libsensors' own `errorlist`, indexed by the absolute error code
const ERROR_LIST: [&str; 12] = [
    "Unknown error",
    "Wildcard found in chip name",
    "No such subfeature known",
    "Can't read",
    "Kernel interface error",
    "Divide by zero",
    "Can't parse chip name",
    "Can't parse bus name",
    "General parse error",
    "Can't write",
    "I/O error",
    "Evaluation recurses too deep",
];

/// Render an error code the way `sensors_strerror` does.
///
/// Used where no library is loaded to ask.
pub fn strerror(code: i32) -> &'static str {
    let idx = code.unsigned_abs() as usize;
    ERROR_LIST.get(idx).copied().unwrap_or(ERROR_LIST[0])
}

// ============================================================================
// Bus types
// ============================================================================

pub const SENSORS_BUS_TYPE_ANY: i16 = -1;
pub const SENSORS_BUS_TYPE_I2C: i16 = 0;
pub const SENSORS_BUS_TYPE_ISA: i16 = 1;
pub const SENSORS_BUS_TYPE_PCI: i16 = 2;
pub const SENSORS_BUS_TYPE_SPI: i16 = 3;
pub const SENSORS_BUS_TYPE_VIRTUAL: i16 = 4;
pub const SENSORS_BUS_TYPE_ACPI: i16 = 5;
pub const SENSORS_BUS_TYPE_HID: i16 = 6;
pub const SENSORS_BUS_TYPE_MDIO: i16 = 7;
pub const SENSORS_BUS_TYPE_SCSI: i16 = 8;

pub const SENSORS_BUS_NR_ANY: i16 = -1;
pub const SENSORS_BUS_NR_IGNORE: i16 = -2;

// ============================================================================
// Feature types
// ============================================================================

pub const SENSORS_FEATURE_IN: i32 = 0x00;
pub const SENSORS_FEATURE_FAN: i32 = 0x01;
pub const SENSORS_FEATURE_TEMP: i32 = 0x02;
pub const SENSORS_FEATURE_POWER: i32 = 0x03;
pub const SENSORS_FEATURE_ENERGY: i32 = 0x04;
pub const SENSORS_FEATURE_CURR: i32 = 0x05;
pub const SENSORS_FEATURE_HUMIDITY: i32 = 0x06;
pub const SENSORS_FEATURE_VID: i32 = 0x10;
pub const SENSORS_FEATURE_INTRUSION: i32 = 0x11;
pub const SENSORS_FEATURE_BEEP_ENABLE: i32 = 0x18;
pub const SENSORS_FEATURE_UNKNOWN: i32 = i32::MAX;

// ============================================================================
// Subfeature types
// ============================================================================

const IN: i32 = SENSORS_FEATURE_IN << 8;
pub const SENSORS_SUBFEATURE_IN_INPUT: i32 = IN;
pub const SENSORS_SUBFEATURE_IN_MIN: i32 = IN | 0x01;
pub const SENSORS_SUBFEATURE_IN_MAX: i32 = IN | 0x02;
pub const SENSORS_SUBFEATURE_IN_LCRIT: i32 = IN | 0x03;
pub const SENSORS_SUBFEATURE_IN_CRIT: i32 = IN | 0x04;
pub const SENSORS_SUBFEATURE_IN_AVERAGE: i32 = IN | 0x05;
pub const SENSORS_SUBFEATURE_IN_LOWEST: i32 = IN | 0x06;
pub const SENSORS_SUBFEATURE_IN_HIGHEST: i32 = IN | 0x07;
pub const SENSORS_SUBFEATURE_IN_ALARM: i32 = IN | 0x80;
pub const SENSORS_SUBFEATURE_IN_MIN_ALARM: i32 = IN | 0x81;
pub const SENSORS_SUBFEATURE_IN_MAX_ALARM: i32 = IN | 0x82;
pub const SENSORS_SUBFEATURE_IN_BEEP: i32 = IN | 0x83;
pub const SENSORS_SUBFEATURE_IN_LCRIT_ALARM: i32 = IN | 0x84;
pub const SENSORS_SUBFEATURE_IN_CRIT_ALARM: i32 = IN | 0x85;

const FAN: i32 = SENSORS_FEATURE_FAN << 8;
pub const SENSORS_SUBFEATURE_FAN_INPUT: i32 = FAN;
pub const SENSORS_SUBFEATURE_FAN_MIN: i32 = FAN | 0x01;
pub const SENSORS_SUBFEATURE_FAN_MAX: i32 = FAN | 0x02;
pub const SENSORS_SUBFEATURE_FAN_ALARM: i32 = FAN | 0x80;
pub const SENSORS_SUBFEATURE_FAN_FAULT: i32 = FAN | 0x81;
pub const SENSORS_SUBFEATURE_FAN_DIV: i32 = FAN | 0x82;
pub const SENSORS_SUBFEATURE_FAN_BEEP: i32 = FAN | 0x83;
pub const SENSORS_SUBFEATURE_FAN_PULSES: i32 = FAN | 0x84;
pub const SENSORS_SUBFEATURE_FAN_MIN_ALARM: i32 = FAN | 0x85;
pub const SENSORS_SUBFEATURE_FAN_MAX_ALARM: i32 = FAN | 0x86;

const TEMP: i32 = SENSORS_FEATURE_TEMP << 8;
pub const SENSORS_SUBFEATURE_TEMP_INPUT: i32 = TEMP;
pub const SENSORS_SUBFEATURE_TEMP_MAX: i32 = TEMP | 0x01;
pub const SENSORS_SUBFEATURE_TEMP_MAX_HYST: i32 = TEMP | 0x02;
pub const SENSORS_SUBFEATURE_TEMP_MIN: i32 = TEMP | 0x03;
pub const SENSORS_SUBFEATURE_TEMP_CRIT: i32 = TEMP | 0x04;
pub const SENSORS_SUBFEATURE_TEMP_CRIT_HYST: i32 = TEMP | 0x05;
pub const SENSORS_SUBFEATURE_TEMP_LCRIT: i32 = TEMP | 0x06;
pub const SENSORS_SUBFEATURE_TEMP_EMERGENCY: i32 = TEMP | 0x07;
pub const SENSORS_SUBFEATURE_TEMP_EMERGENCY_HYST: i32 = TEMP | 0x08;
pub const SENSORS_SUBFEATURE_TEMP_LOWEST: i32 = TEMP | 0x09;
pub const SENSORS_SUBFEATURE_TEMP_HIGHEST: i32 = TEMP | 0x0a;
pub const SENSORS_SUBFEATURE_TEMP_MIN_HYST: i32 = TEMP | 0x0b;
pub const SENSORS_SUBFEATURE_TEMP_LCRIT_HYST: i32 = TEMP | 0x0c;
pub const SENSORS_SUBFEATURE_TEMP_ALARM: i32 = TEMP | 0x80;
pub const SENSORS_SUBFEATURE_TEMP_MAX_ALARM: i32 = TEMP | 0x81;
pub const SENSORS_SUBFEATURE_TEMP_MIN_ALARM: i32 = TEMP | 0x82;
pub const SENSORS_SUBFEATURE_TEMP_CRIT_ALARM: i32 = TEMP | 0x83;
pub const SENSORS_SUBFEATURE_TEMP_FAULT: i32 = TEMP | 0x84;
pub const SENSORS_SUBFEATURE_TEMP_TYPE: i32 = TEMP | 0x85;
pub const SENSORS_SUBFEATURE_TEMP_OFFSET: i32 = TEMP | 0x86;
pub const SENSORS_SUBFEATURE_TEMP_BEEP: i32 = TEMP | 0x87;
pub const SENSORS_SUBFEATURE_TEMP_EMERGENCY_ALARM: i32 = TEMP | 0x88;
pub const SENSORS_SUBFEATURE_TEMP_LCRIT_ALARM: i32 = TEMP | 0x89;

const POWER: i32 = SENSORS_FEATURE_POWER << 8;
pub const SENSORS_SUBFEATURE_POWER_AVERAGE: i32 = POWER;
pub const SENSORS_SUBFEATURE_POWER_AVERAGE_HIGHEST: i32 = POWER | 0x01;
pub const SENSORS_SUBFEATURE_POWER_AVERAGE_LOWEST: i32 = POWER | 0x02;
pub const SENSORS_SUBFEATURE_POWER_INPUT: i32 = POWER | 0x03;
pub const SENSORS_SUBFEATURE_POWER_INPUT_HIGHEST: i32 = POWER | 0x04;
pub const SENSORS_SUBFEATURE_POWER_INPUT_LOWEST: i32 = POWER | 0x05;
pub const SENSORS_SUBFEATURE_POWER_CAP: i32 = POWER | 0x06;
pub const SENSORS_SUBFEATURE_POWER_CAP_HYST: i32 = POWER | 0x07;
pub const SENSORS_SUBFEATURE_POWER_MAX: i32 = POWER | 0x08;
pub const SENSORS_SUBFEATURE_POWER_CRIT: i32 = POWER | 0x09;
pub const SENSORS_SUBFEATURE_POWER_MIN: i32 = POWER | 0x0a;
pub const SENSORS_SUBFEATURE_POWER_LCRIT: i32 = POWER | 0x0b;
pub const SENSORS_SUBFEATURE_POWER_AVERAGE_INTERVAL: i32 = POWER | 0x80;
pub const SENSORS_SUBFEATURE_POWER_ALARM: i32 = POWER | 0x81;
pub const SENSORS_SUBFEATURE_POWER_CAP_ALARM: i32 = POWER | 0x82;
pub const SENSORS_SUBFEATURE_POWER_MAX_ALARM: i32 = POWER | 0x83;
pub const SENSORS_SUBFEATURE_POWER_CRIT_ALARM: i32 = POWER | 0x84;
pub const SENSORS_SUBFEATURE_POWER_MIN_ALARM: i32 = POWER | 0x85;
pub const SENSORS_SUBFEATURE_POWER_LCRIT_ALARM: i32 = POWER | 0x86;

pub const SENSORS_SUBFEATURE_ENERGY_INPUT: i32 = SENSORS_FEATURE_ENERGY << 8;

const CURR: i32 = SENSORS_FEATURE_CURR << 8;
pub const SENSORS_SUBFEATURE_CURR_INPUT: i32 = CURR;
pub const SENSORS_SUBFEATURE_CURR_MIN: i32 = CURR | 0x01;
pub const SENSORS_SUBFEATURE_CURR_MAX: i32 = CURR | 0x02;
pub const SENSORS_SUBFEATURE_CURR_LCRIT: i32 = CURR | 0x03;
pub const SENSORS_SUBFEATURE_CURR_CRIT: i32 = CURR | 0x04;
pub const SENSORS_SUBFEATURE_CURR_AVERAGE: i32 = CURR | 0x05;
pub const SENSORS_SUBFEATURE_CURR_LOWEST: i32 = CURR | 0x06;
pub const SENSORS_SUBFEATURE_CURR_HIGHEST: i32 = CURR | 0x07;
pub const SENSORS_SUBFEATURE_CURR_ALARM: i32 = CURR | 0x80;
pub const SENSORS_SUBFEATURE_CURR_MIN_ALARM: i32 = CURR | 0x81;
pub const SENSORS_SUBFEATURE_CURR_MAX_ALARM: i32 = CURR | 0x82;
pub const SENSORS_SUBFEATURE_CURR_BEEP: i32 = CURR | 0x83;
pub const SENSORS_SUBFEATURE_CURR_LCRIT_ALARM: i32 = CURR | 0x84;
pub const SENSORS_SUBFEATURE_CURR_CRIT_ALARM: i32 = CURR | 0x85;

pub const SENSORS_SUBFEATURE_HUMIDITY_INPUT: i32 = SENSORS_FEATURE_HUMIDITY << 8;

pub const SENSORS_SUBFEATURE_VID: i32 = SENSORS_FEATURE_VID << 8;

pub const SENSORS_SUBFEATURE_INTRUSION_ALARM: i32 = SENSORS_FEATURE_INTRUSION << 8;
pub const SENSORS_SUBFEATURE_INTRUSION_BEEP: i32 = (SENSORS_FEATURE_INTRUSION << 8) | 0x01;

pub const SENSORS_SUBFEATURE_BEEP_ENABLE: i32 = SENSORS_FEATURE_BEEP_ENABLE << 8;

pub const SENSORS_SUBFEATURE_UNKNOWN: i32 = i32::MAX;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strerror_matches_library_table() {
        assert_eq!(strerror(-SENSORS_ERR_ACCESS_R), "Can't read");
        assert_eq!(strerror(SENSORS_ERR_ACCESS_W), "Can't write");
        assert_eq!(strerror(-SENSORS_ERR_KERNEL), "Kernel interface error");
        assert_eq!(strerror(0), "Unknown error");
        assert_eq!(strerror(-42), "Unknown error");
        assert_eq!(strerror(i32::MIN), "Unknown error");
    }

    #[test]
    fn test_subfeature_codes_follow_header_layout() {
        assert_eq!(SENSORS_SUBFEATURE_TEMP_INPUT, 0x200);
        assert_eq!(SENSORS_SUBFEATURE_TEMP_LCRIT_ALARM, 0x289);
        assert_eq!(SENSORS_SUBFEATURE_POWER_AVERAGE_INTERVAL, 0x380);
        assert_eq!(SENSORS_SUBFEATURE_INTRUSION_BEEP, 0x1101);
        assert_eq!(SENSORS_SUBFEATURE_BEEP_ENABLE, 0x1800);
    }
}
