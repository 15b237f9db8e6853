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

//! hf-sensors - owned, typed access to libsensors
//!
//! Chips, features and subfeatures are resolved from hwmon paths or
//! enumerated, and subfeature values are read and written as `f64`. The
//! library is loaded and initialised on first use; see [`handle`] for the
//! lifecycle and reload rules.
//!
//! ```no_run
//! use hf_sensors::{Subfeature, SubfeatureType, Feature};
//!
//! # fn main() -> hf_sensors::Result<()> {
//! let input = Subfeature::resolve("/sys/class/hwmon/hwmon0/temp1_input")?;
//! println!("{}: {}", input.feature().label()?, input.read()?);
//!
//! let fan = Feature::resolve_on_chip("/sys/class/hwmon/hwmon2", "fan1")?;
//! if let Some(min) = fan.subfeature(SubfeatureType::Min)? {
//!     min.write(600.0)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod chip;
pub mod config;
pub mod constants;
pub mod feature;
pub mod ffi;
pub mod handle;
mod path;
pub mod report;
mod snapshot;
pub mod subfeature;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use chip::{detected_chips, BusId, Chip};
pub use feature::Feature;
pub use handle::{cleanup, config_path, ensure_loaded, is_loaded, library_version, load_config, set_backend};
pub use hf_error::{ErrorKind, Result, SensorsError};
pub use subfeature::Subfeature;
pub use types::{BusType, FeatureType, SubfeatureType};
