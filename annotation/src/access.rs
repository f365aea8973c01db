use crate::common::*;

/// The capabilities a handle is opened with.
///
/// `Both` is the union of `Read` and `Write`, and can also be obtained with
/// `Access::Read | Access::Write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    Read,
    Write,
    Both,
}

impl Access {
    const READ: u8 = 0b01;
    const WRITE: u8 = 0b10;

    fn bits(self) -> u8 {
        match self {
            Self::Read => Self::READ,
            Self::Write => Self::WRITE,
            Self::Both => Self::READ | Self::WRITE,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match (bits & Self::READ != 0, bits & Self::WRITE != 0) {
            (_, false) => Self::Read,
            (false, true) => Self::Write,
            (true, true) => Self::Both,
        }
    }

    pub fn can_read(self) -> bool {
        self.bits() & Self::READ != 0
    }

    pub fn can_write(self) -> bool {
        self.bits() & Self::WRITE != 0
    }
}

impl BitOr for Access {
    type Output = Access;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits() | rhs.bits())
    }
}

/// What to do with a missing or an existing file at open time.
///
/// | disposition    | file exists | file is missing |
/// |----------------|-------------|-----------------|
/// | `OpenAlways`   | opens       | creates         |
/// | `CreateAlways` | truncates   | creates         |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    OpenAlways,
    CreateAlways,
}
