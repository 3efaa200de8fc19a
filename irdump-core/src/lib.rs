//! Infrared capture pipeline: tick buffers, snapshot hand-off,
//! microsecond normalization, 16-bit chunking and the text renderers,
//! plus the wire protocol spoken to the capture device.

pub mod capture;
#[cfg(feature = "host")]
pub mod link;
pub mod protocol;
pub mod render;
pub mod ticks;

pub use capture::{BufferHandoff, CaptureBuffer, RawCapture, CAPTURE_BUFFER_LEN};
#[cfg(feature = "host")]
pub use link::SerialLink;
pub use protocol::{CaptureData, Command, DecodedFields, Info, ProtocolId, Reply};
