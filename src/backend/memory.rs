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

//! In-memory libsensors
//!
//! Behaves like libsensors over a fixed set of chips: features are numbered
//! per chip from 0, subfeatures are numbered per chip across all features,
//! read/write honour the mode flags and errors use libsensors' codes and
//! strings. Values written are read back until the next `cleanup`.
//!
//! ```
//! use hf_sensors::backend::memory::{MemoryBackend, MemoryChip, MemoryFeature, MemorySubfeature};
//! use hf_sensors::ffi;
//!
//! let backend = MemoryBackend::new().chip(
//!     MemoryChip::new("coretemp", "/sys/class/hwmon/hwmon0")
//!         .bus(ffi::SENSORS_BUS_TYPE_ISA, 0)
//!         .feature(
//!             MemoryFeature::new("temp1", ffi::SENSORS_FEATURE_TEMP)
//!                 .label("Package id 0")
//!                 .subfeature(MemorySubfeature::new("temp1_input", ffi::SENSORS_SUBFEATURE_TEMP_INPUT).value(42.0)),
//!         ),
//! );
//! hf_sensors::set_backend(Box::new(backend));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::{
    BusRecord, ChipRecord, FeatureRecord, NativeResult, RecordKey, SensorsBackend, SubfeatureRecord,
};
use crate::config::ConfigFile;
use crate::ffi::{self, *};

/// Shared view of what the library was asked to do
#[derive(Debug, Clone, Default)]
pub struct MemoryTally {
    inner: Arc<TallyState>,
}

#[derive(Debug, Default)]
struct TallyState {
    inits: AtomicUsize,
    cleanups: AtomicUsize,
    last_config: Mutex<Option<String>>,
}

impl MemoryTally {
    /// Number of `init` calls, failed ones included
    pub fn init_count(&self) -> usize {
        self.inner.inits.load(Ordering::SeqCst)
    }

    pub fn cleanup_count(&self) -> usize {
        self.inner.cleanups.load(Ordering::SeqCst)
    }

    /// Config path passed to the latest `init`; empty for the default
    pub fn last_config(&self) -> Option<String> {
        self.inner.last_config.lock().clone()
    }
}

#[derive(Debug, Clone)]
pub struct MemorySubfeature {
    name: String,
    kind: i32,
    flags: u32,
    value: f64,
    read_error: Option<i32>,
}

impl MemorySubfeature {
    /// Readable, with the compute-mapping flag set and a value of 0
    pub fn new(name: impl Into<String>, kind: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            flags: SENSORS_MODE_R | SENSORS_COMPUTE_MAPPING,
            value: 0.0,
            read_error: None,
        }
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn writable(mut self) -> Self {
        self.flags |= SENSORS_MODE_W;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Make every read fail with `code` (a negative libsensors error)
    pub fn read_error(mut self, code: i32) -> Self {
        self.read_error = Some(code);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MemoryFeature {
    name: String,
    kind: i32,
    label: Option<String>,
    subfeatures: Vec<MemorySubfeature>,
}

impl MemoryFeature {
    pub fn new(name: impl Into<String>, kind: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            subfeatures: Vec::new(),
        }
    }

    /// Without a label, `label()` reports the feature name like libsensors
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn subfeature(mut self, subfeature: MemorySubfeature) -> Self {
        self.subfeatures.push(subfeature);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MemoryChip {
    prefix: String,
    path: String,
    bus: BusRecord,
    addr: i32,
    features: Vec<MemoryFeature>,
}

impl MemoryChip {
    /// A chip on the ISA bus at address 0
    pub fn new(prefix: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            path: path.into(),
            bus: BusRecord {
                kind: SENSORS_BUS_TYPE_ISA,
                nr: 0,
            },
            addr: 0,
            features: Vec::new(),
        }
    }

    pub fn bus(mut self, kind: i16, nr: i16) -> Self {
        self.bus = BusRecord { kind, nr };
        self
    }

    pub fn address(mut self, addr: i32) -> Self {
        self.addr = addr;
        self
    }

    pub fn feature(mut self, feature: MemoryFeature) -> Self {
        self.features.push(feature);
        self
    }

    /// (feature index, subfeature) pairs in library numbering order
    fn numbered_subfeatures(&self) -> impl Iterator<Item = (usize, &MemorySubfeature)> {
        self.features
            .iter()
            .enumerate()
            .flat_map(|(fi, feature)| feature.subfeatures.iter().map(move |sub| (fi, sub)))
    }

    fn subfeature_by_number(&self, number: i32) -> Option<&MemorySubfeature> {
        let number = usize::try_from(number).ok()?;
        self.numbered_subfeatures().nth(number).map(|(_, sub)| sub)
    }

    fn first_subfeature(&self, feature_idx: usize) -> usize {
        self.features[..feature_idx]
            .iter()
            .map(|f| f.subfeatures.len())
            .sum()
    }
}

/// Emulated libsensors over a fixed chip table
#[derive(Debug)]
pub struct MemoryBackend {
    chips: Vec<MemoryChip>,
    i2c_adapters: HashMap<i16, String>,
    values: Mutex<HashMap<(usize, i32), f64>>,
    init_error: Option<i32>,
    version: Option<String>,
    loaded: bool,
    tally: MemoryTally,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            chips: Vec::new(),
            i2c_adapters: HashMap::new(),
            values: Mutex::new(HashMap::new()),
            init_error: None,
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            loaded: false,
            tally: MemoryTally::default(),
        }
    }

    /// Add a detected chip; enumeration follows insertion order
    pub fn chip(mut self, chip: MemoryChip) -> Self {
        self.chips.push(chip);
        self
    }

    /// Name reported for I2C bus `nr`
    pub fn i2c_adapter(mut self, nr: i16, name: impl Into<String>) -> Self {
        self.i2c_adapters.insert(nr, name.into());
        self
    }

    /// Make every `init` fail with `code` (a negative libsensors error)
    pub fn init_error(mut self, code: i32) -> Self {
        self.init_error = Some(code);
        self
    }

    pub fn version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Handle for observing init/cleanup after the backend is installed
    pub fn tally(&self) -> MemoryTally {
        self.tally.clone()
    }

    fn loaded_chip(&self, chip: &ChipRecord) -> Option<(usize, &MemoryChip)> {
        if !self.loaded {
            return None;
        }
        let idx = chip.key.0;
        self.chips.get(idx).map(|c| (idx, c))
    }

    fn chip_record(idx: usize, chip: &MemoryChip) -> ChipRecord {
        ChipRecord {
            prefix: chip.prefix.clone(),
            bus: chip.bus,
            addr: chip.addr,
            path: chip.path.clone(),
            key: RecordKey(idx),
        }
    }

    fn format_chip_name(chip: &ChipRecord) -> Option<String> {
        let (prefix, nr, addr) = (&chip.prefix, chip.bus.nr, chip.addr);
        let name = match chip.bus.kind {
            SENSORS_BUS_TYPE_ISA => format!("{}-isa-{:04x}", prefix, addr),
            SENSORS_BUS_TYPE_PCI => format!("{}-pci-{:04x}", prefix, addr),
            SENSORS_BUS_TYPE_I2C => format!("{}-i2c-{}-{:02x}", prefix, nr, addr),
            SENSORS_BUS_TYPE_SPI => format!("{}-spi-{}-{:x}", prefix, nr, addr),
            SENSORS_BUS_TYPE_VIRTUAL => format!("{}-virtual-{:x}", prefix, addr),
            SENSORS_BUS_TYPE_ACPI => format!("{}-acpi-{:x}", prefix, addr),
            SENSORS_BUS_TYPE_HID => format!("{}-hid-{}-{:x}", prefix, nr, addr),
            SENSORS_BUS_TYPE_MDIO => format!("{}-mdio-{:x}", prefix, addr),
            SENSORS_BUS_TYPE_SCSI => format!("{}-scsi-{}-{:x}", prefix, nr, addr),
            _ => return None,
        };
        Some(name)
    }
}

impl SensorsBackend for MemoryBackend {
    fn init(&mut self, config: &ConfigFile) -> NativeResult<()> {
        self.tally.inner.inits.fetch_add(1, Ordering::SeqCst);
        *self.tally.inner.last_config.lock() = Some(config.path().to_string());

        if let Some(code) = self.init_error {
            return Err(code);
        }

        let mut values = HashMap::new();
        for (ci, chip) in self.chips.iter().enumerate() {
            for (number, (_, sub)) in chip.numbered_subfeatures().enumerate() {
                values.insert((ci, number as i32), sub.value);
            }
        }
        *self.values.get_mut() = values;
        self.loaded = true;
        Ok(())
    }

    fn cleanup(&mut self) {
        self.tally.inner.cleanups.fetch_add(1, Ordering::SeqCst);
        self.values.get_mut().clear();
        self.loaded = false;
    }

    fn next_detected_chip(&self, nr: &mut i32) -> Option<ChipRecord> {
        if !self.loaded {
            return None;
        }
        let idx = usize::try_from(*nr).ok()?;
        let chip = self.chips.get(idx)?;
        *nr += 1;
        Some(Self::chip_record(idx, chip))
    }

    fn next_feature(&self, chip: &ChipRecord, nr: &mut i32) -> Option<FeatureRecord> {
        let (_, memory_chip) = self.loaded_chip(chip)?;
        let idx = usize::try_from(*nr).ok()?;
        let feature = memory_chip.features.get(idx)?;
        *nr += 1;
        Some(FeatureRecord {
            name: feature.name.clone(),
            number: idx as i32,
            kind: feature.kind,
            first_subfeature: memory_chip.first_subfeature(idx) as i32,
            key: RecordKey(idx),
        })
    }

    fn next_subfeature(
        &self,
        chip: &ChipRecord,
        feature: &FeatureRecord,
        nr: &mut i32,
    ) -> Option<SubfeatureRecord> {
        let (_, memory_chip) = self.loaded_chip(chip)?;
        let memory_feature = memory_chip.features.get(feature.key.0)?;
        let idx = usize::try_from(*nr).ok()?;
        let sub = memory_feature.subfeatures.get(idx)?;
        *nr += 1;

        let number = feature.first_subfeature + idx as i32;
        trace!(feature = %feature.name, subfeature = %sub.name, number, "Emulated subfeature");
        Some(SubfeatureRecord {
            name: sub.name.clone(),
            number,
            kind: sub.kind,
            mapping: feature.number,
            flags: sub.flags,
            key: RecordKey(number as usize),
        })
    }

    fn label(&self, chip: &ChipRecord, feature: &FeatureRecord) -> Option<String> {
        let (_, memory_chip) = self.loaded_chip(chip)?;
        let memory_feature = memory_chip.features.get(feature.key.0)?;
        Some(
            memory_feature
                .label
                .clone()
                .unwrap_or_else(|| memory_feature.name.clone()),
        )
    }

    fn value(&self, chip: &ChipRecord, number: i32) -> NativeResult<f64> {
        let (ci, memory_chip) = self.loaded_chip(chip).ok_or(-SENSORS_ERR_NO_ENTRY)?;
        let sub = memory_chip
            .subfeature_by_number(number)
            .ok_or(-SENSORS_ERR_NO_ENTRY)?;
        if sub.flags & SENSORS_MODE_R == 0 {
            return Err(-SENSORS_ERR_ACCESS_R);
        }
        if let Some(code) = sub.read_error {
            return Err(code);
        }
        self.values
            .lock()
            .get(&(ci, number))
            .copied()
            .ok_or(-SENSORS_ERR_KERNEL)
    }

    fn set_value(&self, chip: &ChipRecord, number: i32, value: f64) -> NativeResult<()> {
        let (ci, memory_chip) = self.loaded_chip(chip).ok_or(-SENSORS_ERR_NO_ENTRY)?;
        let sub = memory_chip
            .subfeature_by_number(number)
            .ok_or(-SENSORS_ERR_NO_ENTRY)?;
        if sub.flags & SENSORS_MODE_W == 0 {
            return Err(-SENSORS_ERR_ACCESS_W);
        }
        self.values.lock().insert((ci, number), value);
        Ok(())
    }

    fn snprintf_chip_name(&self, chip: &ChipRecord, buf: &mut [u8]) -> i32 {
        let name = match Self::format_chip_name(chip) {
            Some(name) => name,
            None => return -SENSORS_ERR_CHIP_NAME,
        };
        if let Some(room) = buf.len().checked_sub(1) {
            let n = room.min(name.len());
            buf[..n].copy_from_slice(&name.as_bytes()[..n]);
            buf[n] = 0;
        }
        name.len() as i32
    }

    fn adapter_name(&self, bus: &BusRecord) -> Option<String> {
        let name = match bus.kind {
            SENSORS_BUS_TYPE_ISA => "ISA adapter",
            SENSORS_BUS_TYPE_PCI => "PCI adapter",
            SENSORS_BUS_TYPE_SPI => "SPI adapter",
            SENSORS_BUS_TYPE_VIRTUAL => "Virtual device",
            SENSORS_BUS_TYPE_ACPI => "ACPI interface",
            SENSORS_BUS_TYPE_HID => "HID adapter",
            SENSORS_BUS_TYPE_MDIO => "MDIO adapter",
            SENSORS_BUS_TYPE_SCSI => "SCSI adapter",
            SENSORS_BUS_TYPE_I2C => return self.i2c_adapters.get(&bus.nr).cloned(),
            _ => return None,
        };
        Some(name.to_string())
    }

    fn strerror(&self, code: i32) -> String {
        ffi::strerror(code).to_string()
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }
}
