//! Process exit codes. Every failure, whatever its stage, maps to `FAILURE`.

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
