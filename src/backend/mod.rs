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

//! The libsensors API surface
//!
//! [`SensorsBackend`] mirrors the C entry points one to one, with records
//! copied into owned Rust values. Two implementations ship with the crate:
//!
//! - [`native::NativeBackend`]: the real libsensors, loaded at runtime
//! - [`memory::MemoryBackend`]: an in-memory emulation for tests and
//!   machines without hwmon hardware
//!
//! Enumeration keeps the C cursor style (`nr` is advanced by each call) so
//! callers can stop scanning at the first match.

pub mod memory;
pub mod native;

use crate::config::ConfigFile;

/// Native result: `Err` carries the (negative) libsensors error code
pub type NativeResult<T> = std::result::Result<T, i32>;

/// Opaque identity of a record inside the backend's tables.
///
/// For libsensors this is the address of the library-owned struct; it is
/// only meaningful until the next `cleanup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey(pub usize);

/// `sensors_bus_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusRecord {
    pub kind: i16,
    pub nr: i16,
}

/// `sensors_chip_name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipRecord {
    pub prefix: String,
    pub bus: BusRecord,
    pub addr: i32,
    pub path: String,
    pub key: RecordKey,
}

/// `sensors_feature`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub name: String,
    pub number: i32,
    pub kind: i32,
    pub first_subfeature: i32,
    pub key: RecordKey,
}

/// `sensors_subfeature`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubfeatureRecord {
    pub name: String,
    pub number: i32,
    pub kind: i32,
    pub mapping: i32,
    pub flags: u32,
    pub key: RecordKey,
}

/// Entry points of the monitoring library
#[cfg_attr(test, mockall::automock)]
pub trait SensorsBackend: Send {
    /// `sensors_init`
    fn init(&mut self, config: &ConfigFile) -> NativeResult<()>;

    /// `sensors_cleanup`
    fn cleanup(&mut self);

    /// `sensors_get_detected_chips(NULL, nr)`
    fn next_detected_chip(&self, nr: &mut i32) -> Option<ChipRecord>;

    /// `sensors_get_features`
    fn next_feature(&self, chip: &ChipRecord, nr: &mut i32) -> Option<FeatureRecord>;

    /// `sensors_get_all_subfeatures`
    fn next_subfeature(
        &self,
        chip: &ChipRecord,
        feature: &FeatureRecord,
        nr: &mut i32,
    ) -> Option<SubfeatureRecord>;

    /// `sensors_get_label`; `None` when the library returns NULL
    fn label(&self, chip: &ChipRecord, feature: &FeatureRecord) -> Option<String>;

    /// `sensors_get_value`
    fn value(&self, chip: &ChipRecord, number: i32) -> NativeResult<f64>;

    /// `sensors_set_value`
    fn set_value(&self, chip: &ChipRecord, number: i32, value: f64) -> NativeResult<()>;

    /// `sensors_snprintf_chip_name`, with snprintf semantics: returns the
    /// full length (or a negative error) and writes at most `buf.len() - 1`
    /// bytes plus a NUL. An empty `buf` only queries the length.
    fn snprintf_chip_name(&self, chip: &ChipRecord, buf: &mut [u8]) -> i32;

    /// `sensors_get_adapter_name`
    fn adapter_name(&self, bus: &BusRecord) -> Option<String>;

    /// `sensors_strerror`
    fn strerror(&self, code: i32) -> String;

    /// `libsensors_version`, when the library exports it
    fn version(&self) -> Option<String>;
}
