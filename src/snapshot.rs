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

//! Shared, immutable copies of library records
//!
//! A snapshot pairs a record copied out of libsensors with its owning
//! entity and the load generation it was taken under. Cloning is a refcount
//! bump; nothing inside is ever mutated.

use std::fmt;
use std::sync::Arc;

use crate::handle::Generation;

struct Inner<R, P> {
    record: R,
    owner: P,
    generation: Generation,
}

pub(crate) struct Snapshot<R, P = ()> {
    inner: Arc<Inner<R, P>>,
}

impl<R, P> Snapshot<R, P> {
    pub(crate) fn new(record: R, owner: P, generation: Generation) -> Self {
        Self {
            inner: Arc::new(Inner {
                record,
                owner,
                generation,
            }),
        }
    }

    pub(crate) fn record(&self) -> &R {
        &self.inner.record
    }

    pub(crate) fn owner(&self) -> &P {
        &self.inner.owner
    }

    pub(crate) fn generation(&self) -> Generation {
        self.inner.generation
    }
}

impl<R, P> Clone for Snapshot<R, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: PartialEq, P: PartialEq> PartialEq for Snapshot<R, P> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.generation == other.inner.generation
                && self.inner.record == other.inner.record
                && self.inner.owner == other.inner.owner)
    }
}

impl<R: fmt::Debug, P: fmt::Debug> fmt::Debug for Snapshot<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("record", &self.inner.record)
            .field("owner", &self.inner.owner)
            .field("generation", &self.inner.generation)
            .finish()
    }
}
