use core::fmt;

use serde::{Deserialize, Serialize};

/// Remote control protocols the decode stage can report.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum ProtocolId {
    Unknown = 0,
    Nec = 1,
    NecLike = 2,
    Sony = 3,
    Rc5 = 4,
    Rc5x = 5,
    Rc6 = 6,
    Rcmm = 7,
    Dish = 8,
    Sharp = 9,
    Jvc = 10,
    Sanyo = 11,
    SanyoLc7461 = 12,
    Mitsubishi = 13,
    Samsung = 14,
    Lg = 15,
    Whynter = 16,
    AiwaRcT501 = 17,
    Panasonic = 18,
    Denon = 19,
    Coolix = 20,
    Yamato = 21,
}

impl ProtocolId {
    pub fn display_name(self) -> &'static str {
        use ProtocolId::*;
        match self {
            Unknown => "UNKNOWN",
            Nec => "NEC",
            NecLike => "NEC (non-strict)",
            Sony => "SONY",
            Rc5 => "RC5",
            Rc5x => "RC5X",
            Rc6 => "RC6",
            Rcmm => "RCMM",
            Dish => "DISH",
            Sharp => "SHARP",
            Jvc => "JVC",
            Sanyo => "SANYO",
            SanyoLc7461 => "SANYO_LC7461",
            Mitsubishi => "MITSUBISHI",
            Samsung => "SAMSUNG",
            Lg => "LG",
            Whynter => "WHYNTER",
            AiwaRcT501 => "AIWA_RC_T501",
            Panasonic => "PANASONIC",
            Denon => "DENON",
            Coolix => "COOLIX",
            Yamato => "YAMATO",
        }
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Identifiers outside the known set fall back to Unknown.
impl From<u8> for ProtocolId {
    fn from(id: u8) -> Self {
        use ProtocolId::*;
        match id {
            1 => Nec,
            2 => NecLike,
            3 => Sony,
            4 => Rc5,
            5 => Rc5x,
            6 => Rc6,
            7 => Rcmm,
            8 => Dish,
            9 => Sharp,
            10 => Jvc,
            11 => Sanyo,
            12 => SanyoLc7461,
            13 => Mitsubishi,
            14 => Samsung,
            15 => Lg,
            16 => Whynter,
            17 => AiwaRcT501,
            18 => Panasonic,
            19 => Denon,
            20 => Coolix,
            21 => Yamato,
            _ => Unknown,
        }
    }
}

/// Fields extracted by the decode stage. Read-only to this crate.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodedFields {
    pub pid: u8,
    pub value: u64,
    pub bits: u8,
    /// 0 when the protocol has no address.
    pub address: u32,
    /// 0 when the protocol has no command.
    pub command: u32,
}

impl DecodedFields {
    pub fn protocol(&self) -> ProtocolId {
        ProtocolId::from(self.pid)
    }
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
pub enum Command {
    Idle,
    Info,
    /// Start a capture
    Capture,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum Reply {
    Ok,
    Capture {
        data: CaptureData,
        decoded: Option<DecodedFields>,
    },
    Info {
        info: Info,
    },
}

/// One captured signal as framed by the device.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
pub struct CaptureData {
    /// Microseconds per tick.
    pub tick_us: u16,
    pub len: u32,
    pub overflow: bool,
    pub repeat: bool,
    pub bufs: [[u16; 32]; 32],
}

impl CaptureData {
    pub fn from_ticks(tick_us: u16, ticks: &[u16], overflow: bool, repeat: bool) -> Self {
        let mut bufs = [[0u16; 32]; 32];
        for (i, &t) in ticks.iter().take(32 * 32).enumerate() {
            bufs[i / 32][i % 32] = t;
        }

        CaptureData {
            tick_us,
            len: ticks.len().min(32 * 32) as u32,
            overflow,
            repeat,
            bufs,
        }
    }

    pub fn ticks(&self) -> impl Iterator<Item = u16> + '_ {
        self.bufs
            .iter()
            .flatten()
            .copied()
            .take(self.len as usize)
    }
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
pub struct Info {
    pub version: u32,
    /// Microseconds per tick
    pub tick_us: u16,
}
