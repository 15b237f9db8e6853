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

//! libsensors, loaded at runtime
//!
//! The shared object is opened with `libloading` rather than linked, so the
//! crate builds and its tests run on machines without lm-sensors installed.
//! A missing library surfaces as an init error on first use.

use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::ptr;

use hf_error::{Result, SensorsError};
use libloading::Library;
use tracing::{debug, info};

use super::{
    BusRecord, ChipRecord, FeatureRecord, NativeResult, RecordKey, SensorsBackend, SubfeatureRecord,
};
use crate::config::ConfigFile;
use crate::constants::LIBSENSORS_SONAMES;
use crate::ffi::*;

struct Api {
    init: sensors_init_fn,
    cleanup: sensors_cleanup_fn,
    get_detected_chips: sensors_get_detected_chips_fn,
    get_features: sensors_get_features_fn,
    get_all_subfeatures: sensors_get_all_subfeatures_fn,
    get_label: sensors_get_label_fn,
    get_value: sensors_get_value_fn,
    set_value: sensors_set_value_fn,
    snprintf_chip_name: sensors_snprintf_chip_name_fn,
    get_adapter_name: sensors_get_adapter_name_fn,
    strerror: sensors_strerror_fn,
}

/// The system libsensors
pub struct NativeBackend {
    api: Api,
    version: Option<String>,
    // Keeps every pointer in `api` alive
    _lib: Library,
}

impl NativeBackend {
    /// Load the first libsensors found among [`LIBSENSORS_SONAMES`]
    pub fn load() -> Result<Self> {
        let mut last_error = String::from("no candidates");
        for name in LIBSENSORS_SONAMES {
            match Self::open(name) {
                Ok(backend) => {
                    info!(
                        library = name,
                        version = backend.version.as_deref().unwrap_or("unknown"),
                        "Loaded libsensors"
                    );
                    return Ok(backend);
                }
                Err(e) => {
                    debug!("Could not load {}: {}", name, e);
                    last_error = e.to_string();
                }
            }
        }
        Err(SensorsError::init(format!("Failed to load libsensors ({})", last_error)))
    }

    /// Load libsensors from an explicit file name or path
    pub fn open(name: &str) -> std::result::Result<Self, libloading::Error> {
        // SAFETY: libsensors runs no initialisation routines on load; all
        // state is set up by sensors_init.
        let lib = unsafe { Library::new(name)? };

        // SAFETY: the signatures below match <sensors/sensors.h> and
        // <sensors/error.h>. The copied function pointers stay valid for as
        // long as `lib` is held, which is the lifetime of Self.
        let api = unsafe {
            Api {
                init: *lib.get::<sensors_init_fn>(b"sensors_init\0")?,
                cleanup: *lib.get::<sensors_cleanup_fn>(b"sensors_cleanup\0")?,
                get_detected_chips: *lib
                    .get::<sensors_get_detected_chips_fn>(b"sensors_get_detected_chips\0")?,
                get_features: *lib.get::<sensors_get_features_fn>(b"sensors_get_features\0")?,
                get_all_subfeatures: *lib
                    .get::<sensors_get_all_subfeatures_fn>(b"sensors_get_all_subfeatures\0")?,
                get_label: *lib.get::<sensors_get_label_fn>(b"sensors_get_label\0")?,
                get_value: *lib.get::<sensors_get_value_fn>(b"sensors_get_value\0")?,
                set_value: *lib.get::<sensors_set_value_fn>(b"sensors_set_value\0")?,
                snprintf_chip_name: *lib
                    .get::<sensors_snprintf_chip_name_fn>(b"sensors_snprintf_chip_name\0")?,
                get_adapter_name: *lib
                    .get::<sensors_get_adapter_name_fn>(b"sensors_get_adapter_name\0")?,
                strerror: *lib.get::<sensors_strerror_fn>(b"sensors_strerror\0")?,
            }
        };

        // SAFETY: `libsensors_version` is a `const char *` variable; the
        // symbol resolves to its address.
        let version = unsafe {
            lib.get::<*const *const c_char>(b"libsensors_version\0")
                .ok()
                .and_then(|sym| {
                    let addr = *sym;
                    if addr.is_null() {
                        None
                    } else {
                        let value = *addr;
                        (!value.is_null()).then(|| owned(value))
                    }
                })
        };

        Ok(Self {
            api,
            version,
            _lib: lib,
        })
    }
}

/// Copy a C string out of library memory; NULL becomes empty
unsafe fn owned(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

// Records keep the address of the library's own struct as their key. The
// handle module only lets a key reach this backend while the load it came
// from is still active, so the addresses below point at live tables.

fn chip_ptr(chip: &ChipRecord) -> *const sensors_chip_name {
    chip.key.0 as *const sensors_chip_name
}

fn feature_ptr(feature: &FeatureRecord) -> *const sensors_feature {
    feature.key.0 as *const sensors_feature
}

unsafe fn chip_record(ptr: *const sensors_chip_name) -> ChipRecord {
    let raw = &*ptr;
    ChipRecord {
        prefix: owned(raw.prefix),
        bus: BusRecord {
            kind: raw.bus.type_,
            nr: raw.bus.nr,
        },
        addr: raw.addr,
        path: owned(raw.path),
        key: RecordKey(ptr as usize),
    }
}

unsafe fn feature_record(ptr: *const sensors_feature) -> FeatureRecord {
    let raw = &*ptr;
    FeatureRecord {
        name: owned(raw.name),
        number: raw.number,
        kind: raw.type_,
        first_subfeature: raw.first_subfeature,
        key: RecordKey(ptr as usize),
    }
}

unsafe fn subfeature_record(ptr: *const sensors_subfeature) -> SubfeatureRecord {
    let raw = &*ptr;
    SubfeatureRecord {
        name: owned(raw.name),
        number: raw.number,
        kind: raw.type_,
        mapping: raw.mapping,
        flags: raw.flags,
        key: RecordKey(ptr as usize),
    }
}

impl SensorsBackend for NativeBackend {
    fn init(&mut self, config: &ConfigFile) -> NativeResult<()> {
        // SAFETY: the FILE* is either NULL or open for reading.
        let rc = unsafe { (self.api.init)(config.as_ptr()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(rc)
        }
    }

    fn cleanup(&mut self) {
        // SAFETY: valid at any time, including when nothing is loaded.
        unsafe { (self.api.cleanup)() }
    }

    fn next_detected_chip(&self, nr: &mut i32) -> Option<ChipRecord> {
        // SAFETY: NULL match means "any chip"; nr is a valid cursor.
        let ptr = unsafe { (self.api.get_detected_chips)(ptr::null(), nr) };
        if ptr.is_null() {
            None
        } else {
            // SAFETY: non-NULL results point into the detected-chip table.
            Some(unsafe { chip_record(ptr) })
        }
    }

    fn next_feature(&self, chip: &ChipRecord, nr: &mut i32) -> Option<FeatureRecord> {
        // SAFETY: see the note on record keys above.
        let ptr = unsafe { (self.api.get_features)(chip_ptr(chip), nr) };
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { feature_record(ptr) })
        }
    }

    fn next_subfeature(
        &self,
        chip: &ChipRecord,
        feature: &FeatureRecord,
        nr: &mut i32,
    ) -> Option<SubfeatureRecord> {
        // SAFETY: see the note on record keys above.
        let ptr = unsafe { (self.api.get_all_subfeatures)(chip_ptr(chip), feature_ptr(feature), nr) };
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { subfeature_record(ptr) })
        }
    }

    fn label(&self, chip: &ChipRecord, feature: &FeatureRecord) -> Option<String> {
        // SAFETY: see the note on record keys above. The result is malloc'd
        // and ours to free.
        unsafe {
            let raw = (self.api.get_label)(chip_ptr(chip), feature_ptr(feature));
            if raw.is_null() {
                return None;
            }
            let label = owned(raw);
            libc::free(raw as *mut c_void);
            Some(label)
        }
    }

    fn value(&self, chip: &ChipRecord, number: i32) -> NativeResult<f64> {
        let mut value = 0.0;
        // SAFETY: see the note on record keys above.
        let rc = unsafe { (self.api.get_value)(chip_ptr(chip), number, &mut value) };
        if rc == 0 {
            Ok(value)
        } else {
            Err(rc)
        }
    }

    fn set_value(&self, chip: &ChipRecord, number: i32, value: f64) -> NativeResult<()> {
        // SAFETY: see the note on record keys above.
        let rc = unsafe { (self.api.set_value)(chip_ptr(chip), number, value) };
        if rc == 0 {
            Ok(())
        } else {
            Err(rc)
        }
    }

    fn snprintf_chip_name(&self, chip: &ChipRecord, buf: &mut [u8]) -> i32 {
        let (out, size) = if buf.is_empty() {
            (ptr::null_mut(), 0)
        } else {
            (buf.as_mut_ptr().cast::<c_char>(), buf.len())
        };
        // SAFETY: `out` is NULL with size 0, or a writable buffer of `size`
        // bytes; the chip pointer is live (see above).
        unsafe { (self.api.snprintf_chip_name)(out, size, chip_ptr(chip)) }
    }

    fn adapter_name(&self, bus: &BusRecord) -> Option<String> {
        let raw = sensors_bus_id {
            type_: bus.kind,
            nr: bus.nr,
        };
        // SAFETY: the library only reads the struct; the returned string is
        // static or owned by the library.
        unsafe {
            let name = (self.api.get_adapter_name)(&raw);
            (!name.is_null()).then(|| owned(name))
        }
    }

    fn strerror(&self, code: i32) -> String {
        // SAFETY: sensors_strerror accepts any integer and returns a static
        // string.
        unsafe { owned((self.api.strerror)(code)) }
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }
}
