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

//! Constants for the sensor bindings

/// Shared objects tried, in order, when loading libsensors.
/// lm-sensors 3.5+ ships `.so.5`; 3.0-3.4 ship the ABI-compatible `.so.4`.
pub const LIBSENSORS_SONAMES: &[&str] = &["libsensors.so.5", "libsensors.so.4", "libsensors.so"];

/// Environment variable the CLI reads a configuration override from
pub const CONFIG_ENV: &str = "HF_SENSORS_CONFIG";

/// Display units by feature type
pub mod units {
    use crate::types::FeatureType;

    pub fn suffix(kind: FeatureType) -> &'static str {
        match kind {
            FeatureType::In => " V",
            FeatureType::Fan => " RPM",
            FeatureType::Temp => "°C",
            FeatureType::Power => " W",
            FeatureType::Energy => " J",
            FeatureType::Current => " A",
            FeatureType::Humidity => " %RH",
            FeatureType::Vid => " V",
            FeatureType::Intrusion | FeatureType::Beep | FeatureType::Unknown => "",
        }
    }
}
