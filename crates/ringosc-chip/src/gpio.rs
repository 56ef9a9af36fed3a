//! GPIO pad-mode encodings.
//!
//! Each user-project pad has a 13-bit configuration word:
//!
//! ```text
//! | DM     | VTRIP | SLOW | AN_POL | AN_SEL | AN_EN | MOD_SEL | INP_DIS | HOLDH | OEB_N | MGMT_EN |
//! | 3 bits | 1     | 1    | 1      | 1      | 1     | 1       | 1       | 1     | 1     | 1       |
//! ```
//!
//! Only the four encodings the two firmware variants use are defined.

/// Pad driven as an output by the management core (`0x1809`).
pub const MGMT_STD_OUTPUT: u32 = 0x1809;

/// Pad driven as an output by the user project (`0x1808`).
pub const USER_STD_OUTPUT: u32 = 0x1808;

/// Pad read as an input by the management core, no pull (`0x0403`).
pub const MGMT_STD_INPUT_NOPULL: u32 = 0x0403;

/// Pad read as an input by the user project, no pull (`0x0402`).
pub const USER_STD_INPUT_NOPULL: u32 = 0x0402;
