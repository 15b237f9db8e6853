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

//! Subfeatures: the individual readable/writable values of a feature

use hf_error::{ErrorKind, Result, SensorsError};
use tracing::debug;

use crate::backend::SubfeatureRecord;
use crate::feature::Feature;
use crate::ffi::{SENSORS_COMPUTE_MAPPING, SENSORS_MODE_R, SENSORS_MODE_W};
use crate::path;
use crate::snapshot::Snapshot;
use crate::types::SubfeatureType;

#[derive(Debug, Clone, PartialEq)]
pub struct Subfeature(Snapshot<SubfeatureRecord, Feature>);

impl Subfeature {
    pub(crate) fn new(record: SubfeatureRecord, feature: Feature) -> Self {
        let generation = feature.chip().generation();
        Self(Snapshot::new(record, feature, generation))
    }

    /// Resolve the subfeature behind an attribute file such as
    /// `/sys/class/hwmon/hwmon0/temp1_input`
    pub fn resolve(path: &str) -> Result<Subfeature> {
        let (_, name) = path::split_filename(path)
            .ok_or_else(|| SensorsError::parse(format!("No subfeature name in path {}", path)))?;

        let feature = Feature::resolve(path)?;
        let subfeature = feature
            .find_subfeature(name)?
            .ok_or_else(|| SensorsError::parse(format!("Subfeature not found: {}", name)))?;
        debug!(subfeature = name, number = subfeature.number(), "Resolved subfeature for {}", path);
        Ok(subfeature)
    }

    pub fn feature(&self) -> &Feature {
        self.0.owner()
    }

    pub fn name(&self) -> &str {
        &self.record().name
    }

    pub fn number(&self) -> i32 {
        self.record().number
    }

    pub fn kind(&self) -> SubfeatureType {
        SubfeatureType::from_native(self.record().kind)
    }

    /// Raw `sensors_subfeature_type` code
    pub fn native_kind(&self) -> i32 {
        self.record().kind
    }

    /// Number of the main subfeature this one belongs to
    pub fn mapping(&self) -> i32 {
        self.record().mapping
    }

    pub fn flags(&self) -> u32 {
        self.record().flags
    }

    pub fn readable(&self) -> bool {
        self.flags() & SENSORS_MODE_R != 0
    }

    pub fn writable(&self) -> bool {
        self.flags() & SENSORS_MODE_W != 0
    }

    /// Whether the configuration's compute statements apply to this value
    pub fn compute_mapping(&self) -> bool {
        self.flags() & SENSORS_COMPUTE_MAPPING != 0
    }

    /// Current value, after any compute statement from the configuration
    pub fn read(&self) -> Result<f64> {
        let number = self.number();
        self.feature().chip().live(|backend, chip| {
            backend
                .value(chip, number)
                .map_err(|code| SensorsError::from_code(ErrorKind::Io, code, |c| backend.strerror(c)))
        })
    }

    /// Write `value`; the library applies the inverse compute statement
    pub fn write(&self, value: f64) -> Result<()> {
        let number = self.number();
        self.feature().chip().live(|backend, chip| {
            backend
                .set_value(chip, number, value)
                .map_err(|code| SensorsError::from_code(ErrorKind::Io, code, |c| backend.strerror(c)))
        })?;
        debug!(subfeature = self.name(), value, "Wrote subfeature");
        Ok(())
    }

    fn record(&self) -> &SubfeatureRecord {
        self.0.record()
    }
}
