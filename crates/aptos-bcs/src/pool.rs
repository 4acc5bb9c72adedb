//! Reusable serializer instances
//!
//! `release` takes the serializer by value, so a released instance cannot be
//! touched again by the caller.

use parking_lot::Mutex;

use crate::Serializer;

/// Idle instances kept by [`global`]
pub const DEFAULT_MAX_IDLE: usize = 64;

/// Buffers larger than this are dropped on release instead of pooled
pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 64 * 1024;

static GLOBAL: SerializerPool = SerializerPool::new(DEFAULT_MAX_IDLE);

/// Bounded free list of [`Serializer`]s
#[derive(Debug)]
pub struct SerializerPool {
    free: Mutex<Vec<Serializer>>,
    max_idle: usize,
    max_retained_capacity: usize,
}

impl SerializerPool {
    /// Create a pool keeping at most `max_idle` instances
    pub const fn new(max_idle: usize) -> Self {
        Self {
            free: parking_lot::const_mutex(Vec::new()),
            max_idle,
            max_retained_capacity: DEFAULT_MAX_RETAINED_CAPACITY,
        }
    }

    /// Override the largest buffer capacity kept on release
    pub fn with_max_retained_capacity(mut self, capacity: usize) -> Self {
        self.max_retained_capacity = capacity;
        self
    }

    /// Take an empty serializer, reusing an idle one when available
    pub fn acquire(&self) -> Serializer {
        self.free.lock().pop().unwrap_or_default()
    }

    /// Return a serializer to the pool
    pub fn release(&self, mut ser: Serializer) {
        if ser.capacity() > self.max_retained_capacity {
            tracing::trace!(
                capacity = ser.capacity(),
                "dropping oversized serializer instead of pooling"
            );
            return;
        }
        ser.reset();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(ser);
        }
    }

    /// Run `f` with a pooled serializer and release it afterwards
    pub fn with<R>(&self, f: impl FnOnce(&mut Serializer) -> R) -> R {
        let mut ser = self.acquire();
        let out = f(&mut ser);
        self.release(ser);
        out
    }

    /// Number of idle instances
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for SerializerPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

/// Process-wide pool
pub fn global() -> &'static SerializerPool {
    &GLOBAL
}

/// Acquire a serializer from the process-wide pool
pub fn acquire_serializer() -> Serializer {
    GLOBAL.acquire()
}

/// Release a serializer to the process-wide pool
pub fn release_serializer(ser: Serializer) {
    GLOBAL.release(ser);
}
