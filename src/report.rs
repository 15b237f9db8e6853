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

//! Point-in-time readings of every chip
//!
//! Reports are plain data: they serialize with serde for `--json` output and
//! print in the layout of the `sensors` utility. A subfeature that cannot be
//! read keeps its error text instead of failing the whole report.

use std::fmt;

use hf_error::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::chip::{self, Chip};
use crate::constants::units;
use crate::feature::Feature;
use crate::subfeature::Subfeature;
use crate::types::{BusType, FeatureType, SubfeatureType};

#[derive(Debug, Clone, Serialize)]
pub struct ChipReport {
    pub name: String,
    pub prefix: String,
    pub path: String,
    pub bus: BusType,
    pub bus_nr: i16,
    pub adapter: String,
    pub address: i32,
    pub features: Vec<FeatureReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub name: String,
    pub label: String,
    pub kind: FeatureType,
    pub number: i32,
    pub subfeatures: Vec<SubfeatureReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubfeatureReport {
    pub name: String,
    pub kind: SubfeatureType,
    pub number: i32,
    pub readable: bool,
    pub writable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChipReport {
    pub fn collect(chip: &Chip) -> Result<Self> {
        let bus = chip.bus();
        let features = chip
            .features()?
            .iter()
            .map(FeatureReport::collect)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: chip.name()?,
            prefix: chip.prefix().to_string(),
            path: chip.path().to_string(),
            bus: bus.kind(),
            bus_nr: bus.nr(),
            adapter: bus.adapter_name()?,
            address: chip.address(),
            features,
        })
    }
}

impl FeatureReport {
    pub fn collect(feature: &Feature) -> Result<Self> {
        let subfeatures = feature
            .subfeatures()?
            .iter()
            .map(SubfeatureReport::collect)
            .collect();

        Ok(Self {
            name: feature.name().to_string(),
            label: feature.label()?,
            kind: feature.kind(),
            number: feature.number(),
            subfeatures,
        })
    }

    /// The main reading, normally `*_input`
    pub fn input(&self) -> Option<&SubfeatureReport> {
        self.subfeatures.iter().find(|s| s.kind == SubfeatureType::Input)
    }
}

impl SubfeatureReport {
    pub fn collect(subfeature: &Subfeature) -> Self {
        let (value, error) = if subfeature.readable() {
            match subfeature.read() {
                Ok(value) => (Some(value), None),
                Err(e) => {
                    debug!("Could not read {}: {}", subfeature.name(), e);
                    (None, Some(e.to_string()))
                }
            }
        } else {
            (None, None)
        };

        Self {
            name: subfeature.name().to_string(),
            kind: subfeature.kind(),
            number: subfeature.number(),
            readable: subfeature.readable(),
            writable: subfeature.writable(),
            value,
            error,
        }
    }
}

/// Report on every detected chip
pub fn collect_all() -> Result<Vec<ChipReport>> {
    let chips = chip::detected_chips()?;
    let reports = chips.iter().map(ChipReport::collect).collect::<Result<Vec<_>>>()?;

    let failed = reports
        .iter()
        .flat_map(|c| &c.features)
        .flat_map(|f| &f.subfeatures)
        .filter(|s| s.error.is_some())
        .count();
    if failed > 0 {
        warn!("{} sensor values could not be read", failed);
    }
    Ok(reports)
}

// Flags and enumerations print as bare numbers
fn carries_unit(kind: SubfeatureType) -> bool {
    use SubfeatureType::*;

    !matches!(
        kind,
        Alarm
            | MinAlarm
            | MaxAlarm
            | CritAlarm
            | LCritAlarm
            | EmergencyAlarm
            | CapAlarm
            | Fault
            | Beep
            | Enable
            | Type
            | Div
            | Pulses
            | AverageInterval
            | Unknown
    )
}

fn format_value(value: f64, kind: SubfeatureType, feature: FeatureType) -> String {
    if carries_unit(kind) {
        match feature {
            FeatureType::Fan => format!("{:.0}{}", value, units::suffix(feature)),
            _ => format!("{:+.2}{}", value, units::suffix(feature)),
        }
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for ChipReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Adapter: {}", self.adapter)?;
        for feature in &self.features {
            writeln!(f, "{}", feature)?;
        }
        Ok(())
    }
}

impl fmt::Display for FeatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16}", format!("{}:", self.label))?;

        match self.input() {
            Some(input) => match input.value {
                Some(v) => write!(f, " {:>12}", format_value(v, input.kind, self.kind))?,
                None => write!(f, " {:>12}", "N/A")?,
            },
            None => write!(f, " {:>12}", "")?,
        }

        let extras: Vec<String> = self
            .subfeatures
            .iter()
            .filter(|s| s.kind != SubfeatureType::Input)
            .filter_map(|s| s.value.map(|v| format!("{} = {}", s.kind, format_value(v, s.kind, self.kind))))
            .collect();
        if !extras.is_empty() {
            write!(f, "  ({})", extras.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_collect_all_keeps_going_past_failures() {
        install_fixture();
        let reports = collect_all().unwrap();
        assert_eq!(reports.len(), 3);

        let nct = &reports[1];
        assert_eq!(nct.name, "nct6775-isa-0290");
        assert_eq!(nct.adapter, "ISA adapter");
        let temp7 = nct.features.iter().find(|f| f.name == "temp7").unwrap();
        let input = temp7.input().unwrap();
        assert_eq!(input.value, None);
        assert_eq!(input.error.as_deref(), Some("Kernel interface error"));

        let fan1 = nct.features.iter().find(|f| f.name == "fan1").unwrap();
        assert_eq!(fan1.input().unwrap().value, Some(1180.0));
    }

    #[test]
    #[serial]
    fn test_json_shape() {
        install_fixture();
        let reports = collect_all().unwrap();
        let json = serde_json::to_value(&reports[2]).unwrap();
        assert_eq!(json["prefix"], "jc42");
        assert_eq!(json["bus"], "i2c");
        assert_eq!(json["adapter"], SMBUS_ADAPTER);
        assert_eq!(json["features"][0]["kind"], "temp");
        assert_eq!(json["features"][0]["subfeatures"][0]["kind"], "input");
        assert_eq!(json["features"][0]["subfeatures"][0]["value"], 35.5);
        assert!(json["features"][0]["subfeatures"][0].get("error").is_none());
    }

    #[test]
    #[serial]
    fn test_display_like_sensors() {
        install_fixture();
        let chip = Chip::resolve(CORETEMP_PATH).unwrap();
        let text = ChipReport::collect(&chip).unwrap().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "coretemp-isa-0000");
        assert_eq!(lines[1], "Adapter: ISA adapter");
        assert!(lines[2].starts_with("Package id 0:"));
        assert!(lines[2].contains("+42.00°C"));
        assert!(lines[2].contains("crit = +100.00°C"));
        assert!(lines[2].contains("crit_alarm = 0"));
        assert!(lines[3].starts_with("Core 0:"));
    }

    #[test]
    fn test_fan_values_have_no_decimals() {
        assert_eq!(format_value(1180.0, SubfeatureType::Input, FeatureType::Fan), "1180 RPM");
        assert_eq!(format_value(1.0, SubfeatureType::Alarm, FeatureType::Fan), "1");
        assert_eq!(format_value(1.02, SubfeatureType::Input, FeatureType::In), "+1.02 V");
    }
}
