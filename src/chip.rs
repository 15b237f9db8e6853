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

//! Detected hardware monitoring chips

use std::fmt;

use hf_error::{ErrorKind, Result, SensorsError};
use tracing::{debug, trace};

use crate::backend::{BusRecord, ChipRecord, SensorsBackend};
use crate::feature::Feature;
use crate::handle::{self, Generation};
use crate::path;
use crate::snapshot::Snapshot;
use crate::types::BusType;

/// Bus a chip is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusId {
    record: BusRecord,
}

impl BusId {
    pub fn kind(&self) -> BusType {
        BusType::from_native(self.record.kind)
    }

    /// Adapter number on the bus (meaningful for I2C, SPI, HID and SCSI)
    pub fn nr(&self) -> i16 {
        self.record.nr
    }

    /// Adapter description, e.g. "ISA adapter" or the I2C adapter name.
    /// Empty when the library has no name for this bus.
    pub fn adapter_name(&self) -> Result<String> {
        handle::with_loaded(|backend, _| Ok(backend.adapter_name(&self.record).unwrap_or_default()))
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind(), self.record.nr)
    }
}

/// One chip detected by libsensors
#[derive(Debug, Clone, PartialEq)]
pub struct Chip(Snapshot<ChipRecord>);

impl Chip {
    fn new(record: ChipRecord, generation: Generation) -> Self {
        Self(Snapshot::new(record, (), generation))
    }

    /// Find the chip whose sysfs directory contains `path`.
    ///
    /// `path` may be the chip directory itself or any attribute below it,
    /// e.g. `/sys/class/hwmon/hwmon0/temp1_input`. The first detected chip
    /// whose path is an ancestor wins.
    pub fn resolve(path: &str) -> Result<Chip> {
        handle::with_loaded(|backend, generation| {
            let mut nr = 0;
            while let Some(record) = backend.next_detected_chip(&mut nr) {
                trace!(prefix = %record.prefix, chip_path = %record.path, "Scanning chip");
                if path::is_within(&record.path, path) {
                    debug!(prefix = %record.prefix, chip_path = %record.path, "Resolved chip for {}", path);
                    return Ok(Chip::new(record, generation));
                }
            }
            Err(SensorsError::parse(format!("No chip found at {}", path)))
        })
    }

    pub fn address(&self) -> i32 {
        self.record().addr
    }

    pub fn bus(&self) -> BusId {
        BusId {
            record: self.record().bus,
        }
    }

    /// Driver name, e.g. `coretemp`
    pub fn prefix(&self) -> &str {
        &self.record().prefix
    }

    /// sysfs directory of the chip
    pub fn path(&self) -> &str {
        &self.record().path
    }

    /// Full chip name as printed by `sensors`, e.g. `nct6775-isa-0290`
    pub fn name(&self) -> Result<String> {
        self.live(|backend, record| {
            let len = backend.snprintf_chip_name(record, &mut []);
            if len < 0 {
                return Err(SensorsError::from_code(ErrorKind::Io, len, |c| backend.strerror(c)));
            }

            let mut buf = vec![0u8; len as usize + 1];
            let written = backend.snprintf_chip_name(record, &mut buf);
            if written < 0 {
                return Err(SensorsError::from_code(ErrorKind::Io, written, |c| backend.strerror(c)));
            }

            let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
            Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
        })
    }

    /// All features of this chip, in library order
    pub fn features(&self) -> Result<Vec<Feature>> {
        self.live(|backend, record| {
            let mut nr = 0;
            let features = std::iter::from_fn(|| backend.next_feature(record, &mut nr))
                .map(|feature| Feature::new(feature, self.clone()))
                .collect::<Vec<_>>();
            trace!(prefix = %record.prefix, count = features.len(), "Enumerated features");
            Ok(features)
        })
    }

    /// Feature named exactly `name`, if the chip has one
    pub(crate) fn find_feature(&self, name: &str) -> Result<Option<Feature>> {
        self.live(|backend, record| {
            let mut nr = 0;
            while let Some(feature) = backend.next_feature(record, &mut nr) {
                trace!(feature = %feature.name, "Scanning feature");
                if feature.name == name {
                    return Ok(Some(Feature::new(feature, self.clone())));
                }
            }
            Ok(None)
        })
    }

    pub(crate) fn record(&self) -> &ChipRecord {
        self.0.record()
    }

    pub(crate) fn generation(&self) -> Generation {
        self.0.generation()
    }

    /// Run `f` against the library this chip was resolved from
    pub(crate) fn live<T>(&self, f: impl FnOnce(&dyn SensorsBackend, &ChipRecord) -> Result<T>) -> Result<T> {
        handle::with_live(self.generation(), |backend| f(backend, self.record()))
    }
}

/// Every chip libsensors detected, in enumeration order
pub fn detected_chips() -> Result<Vec<Chip>> {
    handle::with_loaded(|backend, generation| {
        let mut nr = 0;
        let chips: Vec<Chip> = std::iter::from_fn(|| backend.next_detected_chip(&mut nr))
            .map(|record| Chip::new(record, generation))
            .collect();
        debug!("Detected {} chips", chips.len());
        Ok(chips)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryBackend, MemoryChip};
    use crate::ffi::{SENSORS_BUS_TYPE_ANY, SENSORS_ERR_CHIP_NAME};
    use crate::test_utils::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_detected_chips_in_order() {
        install_fixture();
        let chips = detected_chips().unwrap();
        let prefixes: Vec<_> = chips.iter().map(|c| c.prefix().to_string()).collect();
        assert_eq!(prefixes, vec!["coretemp", "nct6775", "jc42"]);
        assert_eq!(chips[1].address(), 0x290);
        assert_eq!(chips[2].bus().kind(), BusType::I2c);
        assert_eq!(chips[2].bus().nr(), 3);
    }

    #[test]
    #[serial]
    fn test_resolve_from_attribute_path() {
        install_fixture();
        let chip = Chip::resolve("/sys/class/hwmon/hwmon0/temp1_input").unwrap();
        assert_eq!(chip.prefix(), "coretemp");
        assert_eq!(chip.path(), CORETEMP_PATH);
    }

    #[test]
    #[serial]
    fn test_resolve_does_not_match_partial_component() {
        install_fixture();
        let chip = Chip::resolve("/sys/class/hwmon/hwmon10/temp1_input").unwrap();
        assert_eq!(chip.prefix(), "jc42");
    }

    #[test]
    #[serial]
    fn test_resolve_unknown_path_is_parse_error() {
        install_fixture();
        let err = Chip::resolve("/sys/class/hwmon/hwmon7/temp1_input").unwrap_err();
        assert!(err.is_parse());
        assert_eq!(err.message(), "No chip found at /sys/class/hwmon/hwmon7/temp1_input");
    }

    #[test]
    #[serial]
    fn test_resolve_loads_lazily() {
        let tally = install_fixture();
        assert_eq!(tally.init_count(), 0);
        Chip::resolve(CORETEMP_PATH).unwrap();
        Chip::resolve(JC42_PATH).unwrap();
        assert_eq!(tally.init_count(), 1);
    }

    #[test]
    #[serial]
    fn test_chip_names() {
        install_fixture();
        let chips = detected_chips().unwrap();
        assert_eq!(chips[0].name().unwrap(), "coretemp-isa-0000");
        assert_eq!(chips[1].name().unwrap(), "nct6775-isa-0290");
        assert_eq!(chips[2].name().unwrap(), "jc42-i2c-3-18");
    }

    #[test]
    #[serial]
    fn test_unnameable_chip_is_io_error() {
        install(MemoryBackend::new().chip(MemoryChip::new("odd", "/sys/class/hwmon/hwmon4").bus(SENSORS_BUS_TYPE_ANY, 0)));
        let chip = Chip::resolve("/sys/class/hwmon/hwmon4").unwrap();
        let err = chip.name().unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.message(), "Can't parse chip name");
    }

    #[test]
    #[serial]
    fn test_chip_name_format_failure_is_io_error() {
        let mut mock = mock_single_chip();
        // The size query succeeds, formatting into the buffer fails
        mock.expect_snprintf_chip_name()
            .times(2)
            .returning(|_, buf| if buf.is_empty() { 3 } else { -SENSORS_ERR_CHIP_NAME });
        handle::set_backend(Box::new(mock));

        let chip = Chip::resolve(MOCK_CHIP_PATH).unwrap();
        let err = chip.name().unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.message(), "Can't parse chip name");

        release_mock();
    }

    #[test]
    #[serial]
    fn test_adapter_names() {
        install_fixture();
        let chips = detected_chips().unwrap();
        assert_eq!(chips[0].bus().adapter_name().unwrap(), "ISA adapter");
        assert_eq!(chips[2].bus().adapter_name().unwrap(), SMBUS_ADAPTER);

        install(MemoryBackend::new().chip(MemoryChip::new("x", "/x").bus(crate::ffi::SENSORS_BUS_TYPE_I2C, 9)));
        let chip = Chip::resolve("/x").unwrap();
        assert_eq!(chip.bus().adapter_name().unwrap(), "");
        assert_eq!(chip.bus().to_string(), "i2c-9");
    }

    #[test]
    #[serial]
    fn test_features_pair_with_chip() {
        install_fixture();
        let chip = Chip::resolve(NCT6775_PATH).unwrap();
        let features = chip.features().unwrap();
        let names: Vec<_> = features.iter().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["in0", "fan1", "temp7", "intrusion0", "beep_enable"]);
        assert!(features.iter().all(|f| f.chip() == &chip));
        assert!(chip.find_feature("fan2").unwrap().is_none());
    }

    #[test]
    #[serial]
    fn test_chip_is_stale_after_reload() {
        install_fixture();
        let chip = Chip::resolve(CORETEMP_PATH).unwrap();
        handle::cleanup();

        assert!(chip.features().unwrap_err().is_io());
        assert!(chip.name().unwrap_err().is_io());
        // Cached attributes survive
        assert_eq!(chip.prefix(), "coretemp");

        let fresh = Chip::resolve(CORETEMP_PATH).unwrap();
        assert_ne!(fresh, chip);
        assert_eq!(fresh.features().unwrap().len(), 2);
    }
}
