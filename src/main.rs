use std::io;
use std::path::PathBuf;

use structopt::StructOpt;

mod capture;
mod playback;
mod vcdutils;

use irdump_core::{Command, Reply, SerialLink};

#[derive(Debug, StructOpt)]
#[structopt(name = "irdump", about = "Infrared capture dump utility")]
struct Opt {
    /// Serial Device. Defaults to the first detected port
    #[structopt(long = "device", parse(from_os_str))]
    serial: Option<PathBuf>,
    #[structopt(short, long)]
    debug: bool,
    #[structopt(subcommand)]
    cmd: CliCommand,
}

#[derive(StructOpt, Debug)]
enum CliCommand {
    /// Capture from device. Optionally record the signals to a vcd file
    Capture { path: Option<PathBuf> },
    /// Render a previously recorded vcd file
    Playback { path: PathBuf },
    /// Query device info
    Info,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let loglevel = if opt.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::builder().filter_level(loglevel).init();

    match opt.cmd {
        CliCommand::Capture { path } => {
            let mut link = connect(opt.serial)?;
            capture::command_capture(&mut link, path)
        }
        CliCommand::Playback { path } => playback::command_playback(&path),
        CliCommand::Info => {
            let mut link = connect(opt.serial)?;
            link.send_command(Command::Info)?;
            match link.read_reply()? {
                Reply::Info { info } => {
                    println!("Version: {}", info.version);
                    println!("Tick: {} us", info.tick_us);
                    Ok(())
                }
                _ => Err(io::ErrorKind::InvalidData.into()),
            }
        }
    }
}

fn connect(serial: Option<PathBuf>) -> io::Result<SerialLink> {
    let path = if let Some(path) = serial {
        path
    } else if let Ok(ports) = serialport::available_ports() {
        ports
            .first()
            .map(|port| PathBuf::from(&port.port_name))
            .unwrap_or_else(|| PathBuf::from("/dev/ttyACM0"))
    } else {
        PathBuf::from("/dev/ttyACM0")
    };

    log::info!("Connecting to {}", path.display());

    let mut link = SerialLink::new();
    link.connect(&path)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    Ok(link)
}
