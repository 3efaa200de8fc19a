//! Tick normalization and 16-bit chunking of durations.

use crate::capture::RawCapture;

/// Largest duration a single replay value can hold.
pub const MAX_RAW_VALUE: u32 = u16::MAX as u32;

/// Convert a raw tick count to microseconds.
///
/// The multiply is done in 32 bits: a tick count near 0xFFFF with a
/// multi-microsecond unit does not fit in 16.
pub fn ticks_to_us(tick: u16, unit: u16) -> u32 {
    u32::from(tick) * u32::from(unit)
}

/// Split one duration into replayable 16-bit values.
///
/// While the duration exceeds 65535 us, a 65535 followed by an explicit
/// 0 is emitted and 65535 subtracted; the remainder is emitted last,
/// even when it is 0. Summing the emitted values reconstructs the
/// duration exactly.
pub fn chunks(duration_us: u32) -> Chunks {
    Chunks {
        remaining: duration_us,
        pending_zero: false,
        done: false,
    }
}

#[derive(Debug, Clone)]
pub struct Chunks {
    remaining: u32,
    pending_zero: bool,
    done: bool,
}

impl Iterator for Chunks {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.pending_zero {
            self.pending_zero = false;
            return Some(0);
        }
        if self.done {
            return None;
        }
        if self.remaining > MAX_RAW_VALUE {
            self.remaining -= MAX_RAW_VALUE;
            self.pending_zero = true;
            Some(u16::MAX)
        } else {
            self.done = true;
            Some(self.remaining as u16)
        }
    }
}

/// Number of 16-bit values needed to represent the capture's payload
/// after chunking. The leading entry is not part of the payload.
///
/// Counted with the same iterator `literal` renders with, so the array
/// size and the rendered values cannot disagree.
pub fn cooked_length(raw: &RawCapture, unit: u16) -> usize {
    raw.ticks()
        .iter()
        .skip(1)
        .map(|&tick| chunks(ticks_to_us(tick, unit)).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{BufferHandoff, CaptureBuffer};

    fn freeze(ticks: &[u16]) -> RawCapture {
        let mut live = CaptureBuffer::with_capacity(ticks.len()).unwrap();
        for &t in ticks {
            live.record(t);
        }
        let mut handoff = BufferHandoff::with_capacity(ticks.len()).unwrap();
        handoff.snapshot(&live).clone()
    }

    #[test]
    fn normalization_is_done_in_32_bits() {
        assert_eq!(ticks_to_us(0xFFFF, 50), 3_276_750);
        assert_eq!(ticks_to_us(0xFFFF, 0xFFFF), 0xFFFE_0001);
        assert_eq!(ticks_to_us(1392, 1), 1392);
    }

    #[test]
    fn durations_up_to_the_max_emit_one_value() {
        for &d in &[0u32, 1, 618, 1392, 65534, 65535] {
            assert_eq!(chunks(d).collect::<Vec<_>>(), vec![d as u16]);
        }
    }

    #[test]
    fn durations_past_the_max_split_with_explicit_zero() {
        assert_eq!(chunks(65536).collect::<Vec<_>>(), vec![65535, 0, 1]);
        assert_eq!(chunks(100_000).collect::<Vec<_>>(), vec![65535, 0, 34465]);
        assert_eq!(chunks(131_070).collect::<Vec<_>>(), vec![65535, 0, 65535]);
        assert_eq!(
            chunks(131_072).collect::<Vec<_>>(),
            vec![65535, 0, 65535, 0, 2]
        );
    }

    #[test]
    fn chunk_sum_round_trips_exactly() {
        let samples = (0u32..=200_000)
            .step_by(977)
            .chain(vec![65535, 65536, 131_070, 131_071, 131_072, u32::MAX]);
        for d in samples {
            let sum: u64 = chunks(d).map(u64::from).sum();
            assert_eq!(sum, u64::from(d), "duration {}", d);
        }
    }

    #[test]
    fn cooked_length_counts_emitted_values() {
        // Leading 3846 excluded; 1392 and 618 are one value each.
        let raw = freeze(&[3846, 1392, 618]);
        assert_eq!(cooked_length(&raw, 1), 2);

        // A 131072 us duration contributes five values.
        let raw = freeze(&[100, 0xFFFF, 618]);
        let long = ticks_to_us(0xFFFF, 2); // 131070 -> 3 values
        assert_eq!(chunks(long).count(), 3);
        assert_eq!(cooked_length(&raw, 2), 3 + 1);

        let raw = freeze(&[100, 32768, 618]);
        assert_eq!(ticks_to_us(32768, 4), 131_072);
        assert_eq!(cooked_length(&raw, 4), 5 + 1);
    }
}
