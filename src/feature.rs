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

//! Features: one measurement channel of a chip (`temp1`, `fan2`, `in0`...)

use hf_error::{Result, SensorsError};
use tracing::{debug, trace};

use crate::backend::{FeatureRecord, SensorsBackend, SubfeatureRecord};
use crate::chip::Chip;
use crate::path;
use crate::snapshot::Snapshot;
use crate::subfeature::Subfeature;
use crate::types::{FeatureType, SubfeatureType};

#[derive(Debug, Clone, PartialEq)]
pub struct Feature(Snapshot<FeatureRecord, Chip>);

impl Feature {
    pub(crate) fn new(record: FeatureRecord, chip: Chip) -> Self {
        let generation = chip.generation();
        Self(Snapshot::new(record, chip, generation))
    }

    /// Resolve the feature an attribute file belongs to.
    ///
    /// `/sys/class/hwmon/hwmon0/temp1_input` names feature `temp1` on the
    /// chip at `/sys/class/hwmon/hwmon0`. Longer suffixes
    /// (`temp1_crit_alarm`) and feature names containing an underscore
    /// (`beep_enable`) resolve too.
    pub fn resolve(path: &str) -> Result<Feature> {
        let (chip_path, segment) = path::split_filename(path)
            .ok_or_else(|| SensorsError::parse(format!("No feature name in path {}", path)))?;
        let candidates = path::feature_name_candidates(segment);
        let chip = Chip::resolve(chip_path)?;

        for candidate in &candidates {
            if let Some(feature) = chip.find_feature(candidate)? {
                debug!(feature = candidate, prefix = chip.prefix(), "Resolved feature for {}", path);
                return Ok(feature);
            }
        }
        Err(not_found(candidates[0], &chip))
    }

    /// Resolve feature `name` on the chip at `chip_path`
    pub fn resolve_on_chip(chip_path: &str, name: &str) -> Result<Feature> {
        let chip = Chip::resolve(chip_path)?;
        chip.find_feature(name)?.ok_or_else(|| not_found(name, &chip))
    }

    pub fn chip(&self) -> &Chip {
        self.0.owner()
    }

    pub fn name(&self) -> &str {
        &self.record().name
    }

    pub fn number(&self) -> i32 {
        self.record().number
    }

    pub fn kind(&self) -> FeatureType {
        FeatureType::from_native(self.record().kind)
    }

    /// Raw `sensors_feature_type` code
    pub fn native_kind(&self) -> i32 {
        self.record().kind
    }

    /// Number of the first subfeature belonging to this feature
    pub fn first_subfeature(&self) -> i32 {
        self.record().first_subfeature
    }

    /// Label from the sensors configuration, or the feature name when none
    /// is configured
    pub fn label(&self) -> Result<String> {
        self.live(|backend, chip, feature| {
            backend
                .label(chip.record(), feature)
                .ok_or_else(|| SensorsError::io(format!("Failed to get label for feature {}", feature.name)))
        })
    }

    /// All subfeatures, in library order
    pub fn subfeatures(&self) -> Result<Vec<Subfeature>> {
        self.scan(|_| true, usize::MAX)
    }

    /// First subfeature of the given type
    pub fn subfeature(&self, kind: SubfeatureType) -> Result<Option<Subfeature>> {
        Ok(self
            .scan(|sub| SubfeatureType::from_native(sub.kind) == kind, 1)?
            .into_iter()
            .next())
    }

    /// Subfeature whose attribute file is `name`
    pub(crate) fn find_subfeature(&self, name: &str) -> Result<Option<Subfeature>> {
        Ok(self.scan(|sub| sub.name == name, 1)?.into_iter().next())
    }

    pub(crate) fn record(&self) -> &FeatureRecord {
        self.0.record()
    }

    /// Collect up to `limit` subfeatures matching `keep`
    fn scan(&self, mut keep: impl FnMut(&SubfeatureRecord) -> bool, limit: usize) -> Result<Vec<Subfeature>> {
        self.live(|backend, chip, feature| {
            let mut found = Vec::new();
            let mut nr = 0;
            while let Some(sub) = backend.next_subfeature(chip.record(), feature, &mut nr) {
                trace!(feature = %feature.name, subfeature = %sub.name, "Scanning subfeature");
                if keep(&sub) {
                    found.push(Subfeature::new(sub, self.clone()));
                    if found.len() >= limit {
                        break;
                    }
                }
            }
            Ok(found)
        })
    }

    fn live<T>(&self, f: impl FnOnce(&dyn SensorsBackend, &Chip, &FeatureRecord) -> Result<T>) -> Result<T> {
        let chip = self.chip();
        chip.live(|backend, _| f(backend, chip, self.record()))
    }
}

fn not_found(name: &str, chip: &Chip) -> SensorsError {
    SensorsError::parse(format!("Feature {} not found on chip {}", name, chip.prefix()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryBackend, MemoryChip, MemoryFeature, MemorySubfeature};
    use crate::ffi::*;
    use crate::handle;
    use crate::test_utils::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_resolve_from_input_path() {
        install_fixture();
        let feature = Feature::resolve("/sys/class/hwmon/hwmon0/temp1_input").unwrap();
        assert_eq!(feature.name(), "temp1");
        assert_eq!(feature.number(), 0);
        assert_eq!(feature.kind(), FeatureType::Temp);
        assert_eq!(feature.chip().prefix(), "coretemp");
    }

    #[test]
    #[serial]
    fn test_resolve_multi_part_suffix() {
        install_fixture();
        let feature = Feature::resolve("/sys/class/hwmon/hwmon0/temp1_crit_alarm").unwrap();
        assert_eq!(feature.name(), "temp1");
    }

    #[test]
    #[serial]
    fn test_resolve_name_with_underscore() {
        install_fixture();
        let feature = Feature::resolve("/sys/class/hwmon/hwmon1/beep_enable").unwrap();
        assert_eq!(feature.name(), "beep_enable");
        assert_eq!(feature.kind(), FeatureType::Beep);
    }

    #[test]
    #[serial]
    fn test_resolve_unknown_feature() {
        install_fixture();
        let err = Feature::resolve("/sys/class/hwmon/hwmon0/fan3_input").unwrap_err();
        assert!(err.is_parse());
        assert_eq!(err.message(), "Feature fan3 not found on chip coretemp");
    }

    #[test]
    #[serial]
    fn test_resolve_without_segment() {
        install_fixture();
        assert!(Feature::resolve("/sys/class/hwmon/hwmon0/").unwrap_err().is_parse());
    }

    #[test]
    #[serial]
    fn test_resolve_on_chip() {
        install_fixture();
        let feature = Feature::resolve_on_chip(NCT6775_PATH, "fan1").unwrap();
        assert_eq!(feature.number(), 1);
        assert_eq!(feature.first_subfeature(), 3);

        let err = Feature::resolve_on_chip("/sys/class/hwmon/hwmon9", "fan1").unwrap_err();
        assert_eq!(err.message(), "No chip found at /sys/class/hwmon/hwmon9");
        let err = Feature::resolve_on_chip(NCT6775_PATH, "fan9").unwrap_err();
        assert_eq!(err.message(), "Feature fan9 not found on chip nct6775");
    }

    #[test]
    #[serial]
    fn test_labels() {
        install_fixture();
        assert_eq!(Feature::resolve_on_chip(CORETEMP_PATH, "temp2").unwrap().label().unwrap(), "Core 0");
        // Unlabelled features report their name
        assert_eq!(Feature::resolve_on_chip(NCT6775_PATH, "fan1").unwrap().label().unwrap(), "fan1");
    }

    #[test]
    #[serial]
    fn test_missing_label_is_io_error() {
        let mut mock = mock_single_chip();
        mock.expect_label().times(1).returning(|_, _| None);
        handle::set_backend(Box::new(mock));

        let feature = Feature::resolve_on_chip(MOCK_CHIP_PATH, "temp1").unwrap();
        let err = feature.label().unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.message(), "Failed to get label for feature temp1");

        release_mock();
    }

    #[test]
    #[serial]
    fn test_subfeature_by_kind_takes_first_in_order() {
        install(MemoryBackend::new().chip(
            MemoryChip::new("lm75", "/sys/class/hwmon/hwmon5").feature(
                MemoryFeature::new("temp1", SENSORS_FEATURE_TEMP)
                    .subfeature(MemorySubfeature::new("temp1_input", SENSORS_SUBFEATURE_TEMP_INPUT).value(30.0))
                    .subfeature(MemorySubfeature::new("temp1_alarm", SENSORS_SUBFEATURE_TEMP_ALARM).value(1.0))
                    .subfeature(MemorySubfeature::new("temp1_max_alarm", SENSORS_SUBFEATURE_TEMP_ALARM))
                    .subfeature(MemorySubfeature::new("temp1_min", SENSORS_SUBFEATURE_TEMP_MIN))
                    .subfeature(MemorySubfeature::new("temp1_in_min", SENSORS_SUBFEATURE_IN_MIN)),
            ),
        ));

        let feature = Feature::resolve_on_chip("/sys/class/hwmon/hwmon5", "temp1").unwrap();
        let alarm = feature.subfeature(SubfeatureType::Alarm).unwrap().unwrap();
        assert_eq!(alarm.name(), "temp1_alarm");
        assert_eq!(alarm.number(), 1);

        let min = feature.subfeature(SubfeatureType::Min).unwrap().unwrap();
        assert_eq!(min.name(), "temp1_min");
    }

    #[test]
    #[serial]
    fn test_subfeatures_and_lookup_by_kind() {
        install_fixture();
        let feature = Feature::resolve_on_chip(CORETEMP_PATH, "temp1").unwrap();
        let names: Vec<_> = feature
            .subfeatures()
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["temp1_input", "temp1_max", "temp1_crit", "temp1_crit_alarm"]);

        let crit = feature.subfeature(SubfeatureType::Crit).unwrap().unwrap();
        assert_eq!(crit.name(), "temp1_crit");
        assert_eq!(crit.feature(), &feature);
        assert!(feature.subfeature(SubfeatureType::Fault).unwrap().is_none());
    }

    #[test]
    #[serial]
    fn test_resolved_feature_matches_enumerated() {
        install_fixture();
        for chip in crate::chip::detected_chips().unwrap() {
            for feature in chip.features().unwrap() {
                let path = format!("{}/{}_input", chip.path(), feature.name());
                let resolved = Feature::resolve(&path).unwrap();
                assert_eq!(resolved, feature);
            }
        }
    }

    #[test]
    #[serial]
    fn test_stale_feature() {
        install_fixture();
        let feature = Feature::resolve_on_chip(CORETEMP_PATH, "temp1").unwrap();
        handle::load_config("").unwrap();
        assert!(feature.label().is_ok());

        handle::cleanup();
        assert!(feature.label().unwrap_err().is_io());
        assert!(feature.subfeatures().unwrap_err().is_io());
        assert_eq!(feature.name(), "temp1");
    }
}
