//! Text renderers for frozen captures: the timing dump and the
//! replayable array literal.

use std::fmt::Write;
use std::thread;

use crate::capture::RawCapture;
use crate::protocol::{DecodedFields, ProtocolId};
use crate::ticks::{chunks, cooked_length, ticks_to_us};

/// Entries per dump line.
const ENTRIES_PER_LINE: usize = 8;
/// The dump traversal yields to the scheduler this often.
const YIELD_EVERY: usize = 100;

/// Lazy line-by-line rendering of the timing dump.
///
/// Header first, then up to eight entries per line. The traversal can be
/// long, so it yields cooperatively every 100th entry rather than hog
/// the thread.
pub fn dump_lines<'a>(raw: &'a RawCapture, unit: u16) -> DumpLines<'a> {
    DumpLines {
        ticks: raw.ticks(),
        unit,
        idx: 0,
    }
}

pub struct DumpLines<'a> {
    ticks: &'a [u16],
    unit: u16,
    idx: usize,
}

impl<'a> Iterator for DumpLines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.idx == 0 {
            self.idx = 1;
            return Some(format!("Timing[{}]: ", self.ticks.len().saturating_sub(1)));
        }
        if self.idx >= self.ticks.len() {
            return None;
        }

        let last = self.ticks.len() - 1;
        let mut line = String::new();

        loop {
            let i = self.idx;
            if i > last {
                break;
            }
            if i % YIELD_EVERY == 0 {
                thread::yield_now();
            }

            // Odd entries are marks, even are spaces.
            let marker = if i % 2 == 0 { "-" } else { "   +" };
            let us = ticks_to_us(self.ticks[i], self.unit);
            let _ = write!(line, "{}{:6}", marker, us);
            if i < last {
                line.push_str(", ");
            }

            self.idx += 1;
            if i % ENTRIES_PER_LINE == 0 {
                break;
            }
        }

        Some(line)
    }
}

/// Render the capture as a C array literal suitable for replay, with
/// the decode results as a trailing comment and declarations.
pub fn literal(raw: &RawCapture, decoded: Option<&DecodedFields>, unit: u16) -> String {
    let cooked: Vec<u16> = raw
        .ticks()
        .iter()
        .skip(1)
        .flat_map(|&tick| chunks(ticks_to_us(tick, unit)))
        .collect();
    debug_assert_eq!(cooked.len(), cooked_length(raw, unit));

    let mut out = String::new();
    let _ = write!(out, "uint16_t rawData[{}] = {{", cooked.len());

    for (n, v) in cooked.iter().enumerate() {
        let _ = write!(out, "{}", v);
        if n + 1 < cooked.len() {
            out.push_str(", ");
            // Extra space after even positions, purely for readability.
            if (n + 1) % 2 == 0 {
                out.push(' ');
            }
        }
    }

    let name = decoded
        .map(|d| d.protocol().display_name())
        .unwrap_or("UNKNOWN");
    let value = decoded.map(|d| d.value).unwrap_or(0);

    let _ = write!(out, "}};  // {}", name);
    if raw.repeat() {
        out.push_str(" (Repeat)");
    }
    let _ = write!(out, " 0x{:016X};", value);

    if let Some(d) = decoded {
        if d.protocol() != ProtocolId::Unknown {
            // NOTE: a decoded message whose address and command are both
            // 0 gets no address/command declarations. Known limitation.
            if d.address > 0 || d.command > 0 {
                let _ = write!(out, "\nuint32_t address = 0x{:X};", d.address);
                let _ = write!(out, "\nuint32_t command = 0x{:X};", d.command);
            }
            let _ = write!(out, "\nuint64_t data = 0x{:016X};", d.value);
        }
    }

    out
}

/// Render the decode summary the device prints ahead of the dump.
pub fn info(raw: &RawCapture, decoded: &DecodedFields) -> String {
    let repeat = if raw.repeat() { " (Repeat)" } else { "" };
    format!(
        "Encoding  : {}{}\nCode      : {:016X} ({} bits)",
        decoded.protocol(),
        repeat,
        decoded.value,
        decoded.bits
    )
}

/// Printed ahead of both renderings when acquisition filled the buffer
/// before the signal ended. The truncated data is still rendered.
pub fn overflow_warning(capacity: usize) -> String {
    format!(
        "WARNING: IR code too big for buffer (>= {}). \
         These results shouldn't be trusted until this is resolved. \
         Increase the capture buffer size.",
        capacity
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{BufferHandoff, CaptureBuffer};

    fn freeze(ticks: &[u16], repeat: bool) -> RawCapture {
        let mut live = CaptureBuffer::with_capacity(ticks.len()).unwrap();
        for &t in ticks {
            live.record(t);
        }
        live.set_repeat(repeat);
        let mut handoff = BufferHandoff::with_capacity(ticks.len()).unwrap();
        handoff.snapshot(&live).clone()
    }

    #[test]
    fn dump_header_and_entries() {
        let raw = freeze(&[3846, 1392, 618], false);
        let lines: Vec<String> = dump_lines(&raw, 1).collect();

        assert_eq!(lines, vec!["Timing[2]: ", "   +  1392, -   618"]);
    }

    #[test]
    fn dump_wraps_after_every_eighth_entry() {
        // 20 ticks -> 19 entries -> lines of 8, 8 and 3.
        let ticks: Vec<u16> = (0..20).map(|i| 100 + i).collect();
        let raw = freeze(&ticks, false);
        let lines: Vec<String> = dump_lines(&raw, 1).collect();

        assert_eq!(lines.len(), 1 + 3);
        assert_eq!(lines[1].matches(',').count(), 8);
        assert_eq!(lines[2].matches(',').count(), 8);
        assert_eq!(lines[3].matches(',').count(), 2);
        assert!(!lines[3].trim_end().ends_with(','));
    }

    #[test]
    fn dump_is_consumed_once() {
        let raw = freeze(&[100, 200, 300], false);
        let mut lines = dump_lines(&raw, 1);
        while lines.next().is_some() {}
        assert!(lines.next().is_none());
    }

    #[test]
    fn literal_without_decode() {
        let raw = freeze(&[3846, 1392, 618], false);
        assert_eq!(
            literal(&raw, None, 1),
            "uint16_t rawData[2] = {1392, 618};  // UNKNOWN 0x0000000000000000;"
        );
    }

    #[test]
    fn literal_splits_long_durations() {
        // 32768 ticks at 4 us = 131072 us -> 65535, 0, 65535, 0, 2.
        let raw = freeze(&[100, 32768], false);
        assert_eq!(
            literal(&raw, None, 4),
            "uint16_t rawData[5] = {65535, 0,  65535, 0,  2};  \
             // UNKNOWN 0x0000000000000000;"
        );
    }

    #[test]
    fn literal_suppresses_zero_address_and_command() {
        let raw = freeze(&[3846, 1392, 618], false);
        let decoded = DecodedFields {
            pid: ProtocolId::Yamato as u8,
            value: 0x1,
            bits: 8,
            address: 0,
            command: 0,
        };

        let out = literal(&raw, Some(&decoded), 1);
        assert!(!out.contains("address"));
        assert!(!out.contains("command"));
        assert!(out.contains("// YAMATO 0x0000000000000001;"));
        assert!(out.ends_with("uint64_t data = 0x0000000000000001;"));
    }

    #[test]
    fn literal_emits_address_and_command_when_either_is_set() {
        let raw = freeze(&[3846, 1392, 618], false);
        let decoded = DecodedFields {
            pid: ProtocolId::Nec as u8,
            value: 0x20DF10EF,
            bits: 32,
            address: 0x4,
            command: 0x8,
        };

        let out = literal(&raw, Some(&decoded), 1);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "uint16_t rawData[2] = {1392, 618};  // NEC 0x0000000020DF10EF;"
        );
        assert_eq!(lines[1], "uint32_t address = 0x4;");
        assert_eq!(lines[2], "uint32_t command = 0x8;");
        assert_eq!(lines[3], "uint64_t data = 0x0000000020DF10EF;");
    }

    #[test]
    fn literal_skips_trailer_for_unknown_decode() {
        let raw = freeze(&[3846, 1392, 618], false);
        let decoded = DecodedFields {
            pid: 0,
            value: 0xAB,
            bits: 16,
            address: 1,
            command: 1,
        };

        let out = literal(&raw, Some(&decoded), 1);
        assert_eq!(
            out,
            "uint16_t rawData[2] = {1392, 618};  // UNKNOWN 0x00000000000000AB;"
        );
    }

    #[test]
    fn repeat_flag_annotates_the_names() {
        let raw = freeze(&[3846, 1392, 618], true);
        let decoded = DecodedFields {
            pid: ProtocolId::Nec as u8,
            value: 0,
            bits: 0,
            address: 0,
            command: 0,
        };

        assert!(literal(&raw, Some(&decoded), 1).contains("// NEC (Repeat) 0x"));
        assert!(info(&raw, &decoded).starts_with("Encoding  : NEC (Repeat)\n"));
    }

    #[test]
    fn info_lines() {
        let raw = freeze(&[3846, 1392, 618], false);
        let decoded = DecodedFields {
            pid: ProtocolId::Samsung as u8,
            value: 0xE0E040BF,
            bits: 32,
            address: 7,
            command: 2,
        };

        assert_eq!(
            info(&raw, &decoded),
            "Encoding  : SAMSUNG\nCode      : 00000000E0E040BF (32 bits)"
        );
    }

    #[test]
    fn overflow_warning_names_the_capacity() {
        let msg = overflow_warning(1024);
        assert!(msg.starts_with("WARNING: IR code too big for buffer (>= 1024)."));
    }
}
