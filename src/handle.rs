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

//! Process-wide libsensors handle
//!
//! libsensors keeps all of its state in globals, so there is exactly one
//! handle per process. It is created on first use (any chip, feature or
//! subfeature lookup), replaced by [`load_config`] when the configuration
//! path changes, and torn down by [`cleanup`] or at process exit.
//!
//! # Reloading
//!
//! Chips, features and subfeatures point into tables that libsensors frees
//! on cleanup. Every load gets a new generation; entities remember theirs,
//! and a live call (read, write, label, enumeration) on an entity from an
//! older generation fails with an I/O error instead of touching freed
//! memory. Resolve entities again after reloading.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

use hf_error::{ErrorKind, Result, SensorsError};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::backend::native::NativeBackend;
use crate::backend::SensorsBackend;
use crate::config::ConfigFile;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);
static EXIT_HOOK: Once = Once::new();

lazy_static! {
    static ref RESOURCE: Mutex<Resource> = Mutex::new(Resource::default());
}

/// Identifies one successful load of the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Generation(u64);

impl Generation {
    #[cfg(test)]
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    fn next() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::SeqCst))
    }
}

struct Handle {
    config: ConfigFile,
    generation: Generation,
}

#[derive(Default)]
struct Resource {
    backend: Option<Box<dyn SensorsBackend>>,
    handle: Option<Handle>,
}

impl Resource {
    fn backend_mut(&mut self) -> Result<&mut Box<dyn SensorsBackend>> {
        if self.backend.is_none() {
            debug!("No sensors backend installed, loading libsensors");
            self.backend = Some(Box::new(NativeBackend::load()?));
        }
        self.backend
            .as_mut()
            .ok_or_else(|| SensorsError::init("No sensors backend available"))
    }

    fn open(&mut self, path: &str) -> Result<()> {
        let config = ConfigFile::open(path)?;
        let backend = self.backend_mut()?;

        if let Err(code) = backend.init(&config) {
            let err = SensorsError::from_code(ErrorKind::Init, code, |c| backend.strerror(c));
            warn!(config = path, error = %err, "sensors_init failed");
            return Err(err);
        }

        let generation = Generation::next();
        let shown = if path.is_empty() { "<default>" } else { path };
        info!(config = shown, generation = generation.0, "Loaded sensor configuration");
        self.handle = Some(Handle { config, generation });
        register_exit_hook();
        Ok(())
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.handle.is_none() {
            self.open("")?;
        }
        Ok(())
    }

    fn load_config(&mut self, path: &str) -> Result<()> {
        match &self.handle {
            Some(handle) if handle.config.path() == path => {
                debug!(config = path, "Configuration already active");
                Ok(())
            }
            Some(_) => {
                self.teardown();
                self.open(path)
            }
            None => self.open(path),
        }
    }

    fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(backend) = self.backend.as_mut() {
                backend.cleanup();
            }
            info!(generation = handle.generation.0, "Released sensor configuration");
            // The config file closes only after sensors_cleanup
            drop(handle);
        }
    }

    fn live(&self, generation: Generation) -> Result<&dyn SensorsBackend> {
        match &self.handle {
            Some(handle) if handle.generation == generation => self
                .backend
                .as_deref()
                .ok_or_else(|| SensorsError::io("No sensors backend available")),
            Some(_) => Err(SensorsError::io(
                "Stale sensor handle: the sensor configuration was reloaded",
            )),
            None => Err(SensorsError::io(
                "Stale sensor handle: the sensor configuration is not loaded",
            )),
        }
    }
}

extern "C" fn teardown_at_exit() {
    // Never block process exit on a lock held elsewhere
    if let Some(mut resource) = RESOURCE.try_lock() {
        resource.teardown();
    }
}

fn register_exit_hook() {
    EXIT_HOOK.call_once(|| {
        // SAFETY: teardown_at_exit takes no arguments and does not unwind.
        if unsafe { libc::atexit(teardown_at_exit) } != 0 {
            warn!("Could not register exit hook; libsensors will not be cleaned up at exit");
        }
    });
}

/// Load libsensors with its default configuration unless already loaded
pub fn ensure_loaded() -> Result<()> {
    RESOURCE.lock().ensure_loaded()
}

/// (Re)load libsensors with the configuration file at `path`.
///
/// An empty path selects the library default. Nothing happens if `path` is
/// already the active configuration; otherwise the library is cleaned up and
/// initialised again, which invalidates every chip, feature and subfeature
/// obtained before the call.
///
/// Fails with an init error if the file cannot be opened or libsensors
/// rejects it. The previous configuration is gone at that point; the next
/// lookup loads the default one.
pub fn load_config(path: &str) -> Result<()> {
    RESOURCE.lock().load_config(path)
}

/// Release all libsensors state now. The next lookup loads it again.
pub fn cleanup() {
    RESOURCE.lock().teardown();
}

pub fn is_loaded() -> bool {
    RESOURCE.lock().handle.is_some()
}

/// Active configuration path: `None` when not loaded, empty for the default
pub fn config_path() -> Option<String> {
    RESOURCE
        .lock()
        .handle
        .as_ref()
        .map(|h| h.config.path().to_string())
}

/// Version string exported by the library, if any
pub fn library_version() -> Result<Option<String>> {
    let mut resource = RESOURCE.lock();
    Ok(resource.backend_mut()?.version())
}

/// Replace the library implementation.
///
/// The current handle is torn down first. Use this to run against
/// [`MemoryBackend`](crate::backend::memory::MemoryBackend) or a custom
/// [`SensorsBackend`].
pub fn set_backend(backend: Box<dyn SensorsBackend>) {
    let mut resource = RESOURCE.lock();
    resource.teardown();
    resource.backend = Some(backend);
    debug!("Installed sensors backend");
}

/// Run `f` against the loaded library, loading it first if needed
pub(crate) fn with_loaded<T>(f: impl FnOnce(&dyn SensorsBackend, Generation) -> Result<T>) -> Result<T> {
    let mut resource = RESOURCE.lock();
    resource.ensure_loaded()?;
    let generation = resource
        .handle
        .as_ref()
        .map(|h| h.generation)
        .ok_or_else(|| SensorsError::init("Sensor configuration failed to load"))?;
    let backend = resource.live(generation)?;
    f(backend, generation)
}

/// Run `f` against the library, provided `generation` is still the active load
pub(crate) fn with_live<T>(generation: Generation, f: impl FnOnce(&dyn SensorsBackend) -> Result<T>) -> Result<T> {
    let resource = RESOURCE.lock();
    let backend = resource.live(generation)?;
    f(backend)
}
