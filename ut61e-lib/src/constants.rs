// Protocol constants for the UT61 serial frame

use std::time::Duration;

/// Length of one complete frame including the terminator (14 bytes)
pub const FRAME_LEN: usize = 14;

/// Every frame ends with CR LF
pub const TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// Number of read attempts per cycle before giving up
pub const READ_RETRIES: usize = 3;

/// The optical cable runs at a fixed 2400 baud, 8N1
pub const BAUD_RATE: u32 = 2400;

/// Timeout of a single read attempt
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

// --- Byte offsets ---

/// Sign bit and 3-bit range selector
pub const SIGN_RANGE_BYTE: usize = 0;

/// Positions of the four display digits, most significant first
pub const DIGIT_BYTES: [usize; 4] = [1, 2, 3, 4];

/// Separator byte between digits and the decimal point byte
pub const SEPARATOR_BYTE: usize = 5;

/// Decimal point position (upper nibble) and mode code (lower nibble)
pub const POINT_MODE_BYTE: usize = 6;

// --- Masks and sentinels ---

/// A digit is the low nibble of its byte, so ASCII '0'..'9' decode directly
pub const DIGIT_MASK: u8 = 0x0F;

/// Byte 1 carries '?' instead of a digit when the reading is out of range
pub const OVERFLOW_SENTINEL: u8 = 0x3F;

/// Byte 5 is always an ASCII space
pub const SEPARATOR: u8 = 0x20;

/// Upper nibble patterns of byte 6 for decimal point positions 1..=4.
/// One bit per position, not the ASCII digits '1'..'4'.
pub const POINT_POS_1: u8 = 0b0001;
pub const POINT_POS_2: u8 = 0b0010;
pub const POINT_POS_3: u8 = 0b0100;
pub const POINT_POS_4: u8 = 0b1000;
