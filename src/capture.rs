use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;

use irdump_core::{
    render,
    ticks::ticks_to_us,
    BufferHandoff, CaptureBuffer, Reply, CAPTURE_BUFFER_LEN, Command, SerialLink,
};

use crate::vcdutils::VcdWriter;

pub fn command_capture(link: &mut SerialLink, path: Option<PathBuf>) -> io::Result<()> {
    log::info!("Capturing");

    // The live buffer and its save copy are allocated up front. Running
    // without the full backing storage would silently truncate captures,
    // so failure here ends the process.
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
                "could not allocate a {} entry save buffer: {}. \
                 Try a smaller capture buffer size.",
                CAPTURE_BUFFER_LEN,
                err
            );
            process::exit(1);
        }
    };

    let mut capture_file = match path {
        Some(path) => Some(File::create(&path)?),
        None => None,
    };
    let mut vcd = capture_file.as_mut().map(|file| VcdWriter::new(file));

    if let Some(vcd) = vcd.as_mut() {
        vcd.init()?;
    }

    // Set device in capture mode
    link.send_command(Command::Capture)?;
    link.reply_ok()?;

    loop {
        match link.read_reply() {
            Ok(Reply::Capture { data, decoded }) => {
                log::debug!("capture frame, len: {}, tick: {} us", data.len, data.tick_us);

                // The serial reader stands in for the acquisition
                // interrupt here; formatters only ever see the snapshot.
                live.load(&data);
                let raw = handoff.snapshot(&live);

                if raw.overflow() {
                    println!("{}", render::overflow_warning(CAPTURE_BUFFER_LEN));
                }
                if let Some(decoded) = decoded.as_ref() {
                    println!("{}", render::info(raw, decoded));
                }
                for line in render::dump_lines(raw, data.tick_us) {
                    println!("{}", line);
                }
                println!("{}", render::literal(raw, decoded.as_ref(), data.tick_us));
                println!();

                if let Some(vcd) = vcd.as_mut() {
                    let durations: Vec<u32> = raw
                        .ticks()
                        .iter()
                        .map(|&tick| ticks_to_us(tick, data.tick_us))
                        .collect();
                    vcd.write_slice(&durations)?;
                }
            }
            Ok(reply) => log::debug!("ignoring reply: {:?}", reply),
            Err(err) => log::debug!("read failed: {}", err),
        }
    }
}
