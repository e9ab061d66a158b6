//! Driver for the Abracon AB-RTCMC real-time clock module
//!
//! The clock keeps seconds, minutes, and hours in BCD registers (12-hour or
//! 24-hour, selectable at runtime) and reports its die temperature. It is
//! reached over any [embedded_hal::i2c::I2c] bus: hand one to [AbraRTC::new],
//! read [TimeReading] snapshots back, and nudge individual fields with the
//! increment/decrement operations. Register decoding, format conversion, and
//! the wraparound arithmetic live in [time] as pure transforms; [rtc] owns
//! the bus transactions
#![no_std]

pub mod rtc;
pub mod time;

pub use crate::rtc::{AbraRTC, Error};
pub use crate::time::{
    HourFormat, Hours, Minutes, Seconds, Temperature, TimeOfDay, TimeReading, TimeSetting,
};
