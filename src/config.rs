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

//! libsensors configuration override
//!
//! `sensors_init` takes a C `FILE*`, so the override is opened through libc
//! and kept open until the library has been cleaned up.

use std::ffi::CString;
use std::io;
use std::ptr;

use hf_error::{Result, SensorsError};

/// An open configuration file, or the library default when the path is empty
#[derive(Debug)]
pub struct ConfigFile {
    path: String,
    file: *mut libc::FILE,
}

// SAFETY: the FILE* is owned exclusively by this value and only handed to
// libsensors while the resource lock is held.
unsafe impl Send for ConfigFile {}

impl ConfigFile {
    /// No override: libsensors falls back to its default configuration
    pub fn none() -> Self {
        Self {
            path: String::new(),
            file: ptr::null_mut(),
        }
    }

    /// Open `path` for reading. An empty path means no override.
    pub fn open(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Ok(Self::none());
        }

        let c_path = CString::new(path).map_err(|_| {
            SensorsError::init(format!("Failed to open config file (path contains NUL byte: {:?})", path))
        })?;

        // SAFETY: both arguments are valid NUL-terminated strings.
        let file = unsafe { libc::fopen(c_path.as_ptr(), b"r\0".as_ptr().cast()) };
        if file.is_null() {
            let err = io::Error::last_os_error();
            return Err(SensorsError::init(format!("Failed to open config file ({})", err)));
        }

        Ok(Self {
            path: path.to_string(),
            file,
        })
    }

    /// Path this file was opened from; empty for the default configuration
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_override(&self) -> bool {
        !self.file.is_null()
    }

    /// Raw handle for `sensors_init`; null without an override
    pub fn as_ptr(&self) -> *mut libc::FILE {
        self.file
    }
}

impl Drop for ConfigFile {
    fn drop(&mut self) {
        if !self.file.is_null() {
            // SAFETY: opened by fopen above and closed exactly once.
            unsafe {
                libc::fclose(self.file);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_path_is_default() {
        let config = ConfigFile::open("").unwrap();
        assert!(!config.is_override());
        assert!(config.as_ptr().is_null());
        assert_eq!(config.path(), "");
    }

    #[test]
    fn test_open_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chip \"coretemp-*\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = ConfigFile::open(&path).unwrap();
        assert!(config.is_override());
        assert_eq!(config.path(), path);
    }

    #[test]
    fn test_missing_file_is_init_error() {
        let err = ConfigFile::open("/nonexistent/hf-sensors/sensors3.conf").unwrap_err();
        assert!(err.is_init());
        assert!(err.message().starts_with("Failed to open config file ("));
    }

    #[test]
    fn test_nul_in_path_is_init_error() {
        let err = ConfigFile::open("bad\0path").unwrap_err();
        assert!(err.is_init());
    }
}
