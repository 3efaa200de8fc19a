use std::io;
use std::path::Path;
use std::time::Duration;

use postcard::{from_bytes, to_vec};
use serialport::{SerialPort, SerialPortInfo};

use crate::protocol::{Command, Reply};

/// Serial connection to a capture device.
pub struct SerialLink {
    port: Option<Box<dyn SerialPort>>,
}

impl SerialLink {
    pub fn new() -> Self {
        SerialLink { port: None }
    }

    pub fn list_ports() -> Result<Vec<SerialPortInfo>, serialport::Error> {
        serialport::available_ports()
    }

    pub fn connect<P: AsRef<Path>>(&mut self, path: P) -> Result<(), serialport::Error> {
        let path = path.as_ref().to_string_lossy();
        let port = serialport::new(path, 115_200)
            .timeout(Duration::from_millis(500))
            .open()?;

        self.port.replace(port);

        Ok(())
    }

    pub fn send_command(&mut self, cmd: Command) -> io::Result<()> {
        let req: heapless::Vec<u8, 64> =
            to_vec(&cmd).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        self.port
            .as_mut()
            .ok_or(io::ErrorKind::NotConnected)?
            .write_all(&req)
    }

    pub fn read_reply(&mut self) -> io::Result<Reply> {
        let mut recvbuf = [0u8; 4096];
        let mut offset = 0;

        let port = self.port.as_mut().ok_or(io::ErrorKind::NotConnected)?;

        loop {
            match port.read(&mut recvbuf[offset..]) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(readlen) => offset += readlen,
                Err(ref e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e),
            }

            match from_bytes::<Reply>(&recvbuf[..offset]) {
                Ok(reply) => {
                    log::debug!("reply after {} bytes", offset);
                    return Ok(reply);
                }
                // Frame not complete yet.
                Err(_) if offset < recvbuf.len() => continue,
                Err(e) => {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, e.to_string()));
                }
            }
        }
    }

    pub fn reply_ok(&mut self) -> io::Result<()> {
        match self.read_reply()? {
            Reply::Ok => Ok(()),
            reply => {
                log::warn!("expected Ok, got {:?}", reply);
                Err(io::ErrorKind::InvalidData.into())
            }
        }
    }
}

impl Default for SerialLink {
    fn default() -> Self {
        SerialLink::new()
    }
}
