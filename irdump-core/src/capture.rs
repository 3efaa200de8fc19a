use std::collections::TryReserveError;

use crate::protocol::CaptureData;

/// Number of tick entries a capture buffer holds. Large enough for air
/// conditioner remotes, which send by far the longest codes.
pub const CAPTURE_BUFFER_LEN: usize = 1024;

/// A frozen capture, safe to hand to the formatters.
///
/// `ticks[0]` is the leading entry and is not part of the replayable
/// payload; entries from index 1 alternate mark/space, starting with a
/// mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    ticks: Vec<u16>,
    overflow: bool,
    repeat: bool,
}

impl RawCapture {
    fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut ticks = Vec::new();
        ticks.try_reserve_exact(capacity)?;

        Ok(RawCapture {
            ticks,
            overflow: false,
            repeat: false,
        })
    }

    pub fn ticks(&self) -> &[u16] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }
}

/// The live buffer the acquisition side writes ticks into.
///
/// Only the acquisition context mutates this. Everything downstream
/// reads capture data through a [`BufferHandoff`] snapshot taken after
/// the end of the signal has been detected.
#[derive(Debug)]
pub struct CaptureBuffer {
    ticks: Vec<u16>,
    capacity: usize,
    overflow: bool,
    repeat: bool,
}

impl CaptureBuffer {
    /// Preallocate a live buffer for `capacity` ticks.
    ///
    /// Failing to obtain the full backing storage is fatal to the
    /// caller; a partially capable buffer would silently truncate
    /// future captures.
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut ticks = Vec::new();
        ticks.try_reserve_exact(capacity)?;

        Ok(CaptureBuffer {
            ticks,
            capacity,
            overflow: false,
            repeat: false,
        })
    }

    /// Append one tick. When the buffer is full the tick is dropped and
    /// the overflow flag is set instead.
    pub fn record(&mut self, tick: u16) {
        if self.ticks.len() == self.capacity {
            self.overflow = true;
        } else {
            self.ticks.push(tick);
        }
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    /// Ready the buffer for the next signal.
    pub fn clear(&mut self) {
        self.ticks.clear();
        self.overflow = false;
        self.repeat = false;
    }

    /// Fill the buffer from a capture frame received off the wire.
    pub fn load(&mut self, data: &CaptureData) {
        self.clear();
        for tick in data.ticks() {
            self.record(tick);
        }
        if data.overflow {
            self.overflow = true;
        }
        self.repeat = data.repeat;
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn ticks(&self) -> &[u16] {
        &self.ticks
    }
}

/// Owns a private copy of a capture so the live buffer can resume
/// acquisition while the previous signal is still being formatted.
#[derive(Debug)]
pub struct BufferHandoff {
    copy: RawCapture,
}

impl BufferHandoff {
    /// Preallocate the private copy. Must be at least as large as the
    /// live buffer it will snapshot. Allocation failure here is fatal:
    /// the caller logs and exits rather than run with a save buffer
    /// that cannot hold a full capture.
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(BufferHandoff {
            copy: RawCapture::with_capacity(capacity)?,
        })
    }

    /// Copy the live state into the private buffer and return it.
    ///
    /// Never allocates; the live buffer is free for the next signal as
    /// soon as this returns.
    pub fn snapshot(&mut self, live: &CaptureBuffer) -> &RawCapture {
        debug_assert!(self.copy.ticks.capacity() >= live.len());

        self.copy.ticks.clear();
        self.copy.ticks.extend_from_slice(live.ticks());
        self.copy.overflow = live.overflow();
        self.copy.repeat = live.repeat();

        &self.copy
    }
}
