use std::io;
use std::path::Path;
use std::process;

use irdump_core::{render, BufferHandoff, CaptureBuffer, CAPTURE_BUFFER_LEN};

use crate::vcdutils::vcdfile_to_vec;

/// Run a previously recorded vcd file through the dump pipeline.
pub fn command_playback(path: &Path) -> io::Result<()> {
    let (unit, edges) = vcdfile_to_vec(path)?;
    log::info!("{}: {} edges, {} us per tick", path.display(), edges.len(), unit);

    let mut live = match CaptureBuffer::with_capacity(CAPTURE_BUFFER_LEN) {
        Ok(buf) => buf,
        Err(err) => {
            log::error!(
                "could not allocate a {} entry capture buffer: {}",
                CAPTURE_BUFFER_LEN,
                err
            );
            process::exit(1);
        }
    };
    let mut handoff = match BufferHandoff::with_capacity(CAPTURE_BUFFER_LEN) {
        Ok(handoff) => handoff,
        Err(err) => {
            log::error!(
                "could not allocate a {} entry save buffer: {}",
                CAPTURE_BUFFER_LEN,
                err
            );
            process::exit(1);
        }
    };

    let mut prev = 0;
    for (ts, _level) in edges {
        let dt = ts - prev;
        prev = ts;

        let tick = if dt > u64::from(u16::MAX) {
            log::warn!("clamping {} tick gap to {}", dt, u16::MAX);
            u16::MAX
        } else {
            dt as u16
        };
        live.record(tick);
    }

    let raw = handoff.snapshot(&live);

    if raw.overflow() {
        println!("{}", render::overflow_warning(CAPTURE_BUFFER_LEN));
    }
    for line in render::dump_lines(raw, unit) {
        println!("{}", line);
    }
    println!("{}", render::literal(raw, None, unit));

    Ok(())
}
