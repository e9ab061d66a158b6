//! Time and temperature value types mirroring the clock's register encoding
//!
//! Everything here is a pure transform; all bus I/O lives in [crate::rtc]

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

const ONES_MASK: u8 = 0b0000_1111;
const HOUR_FORMAT_FLAG: u8 = 0b0100_0000;
const MERIDIEM_FLAG: u8 = 0b0010_0000;

/// Hour-counting convention the clock is running in
#[expect(missing_docs, reason = "self-explanatory variants")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourFormat {
    TwentyFourHour,
    TwelveHour,
}

impl HourFormat {
    /// The other convention
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::TwentyFourHour => Self::TwelveHour,
            Self::TwelveHour => Self::TwentyFourHour,
        }
    }
}

/// Half of the day; only meaningful in 12-hour format
#[expect(missing_docs, reason = "self-explanatory variants")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Am,
    Pm,
}

impl TimeOfDay {
    /// The other half of the day
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Am => Self::Pm,
            Self::Pm => Self::Am,
        }
    }
}

impl uDisplay for TimeOfDay {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        })
    }
}

/// Hour of day as a pair of decimal digits in either counting convention
///
/// The variant doubles as the register's format flag, so an hour can never
/// carry a meridiem in 24-hour format or a tens digit above 1 in 12-hour
/// format. 12 stands in for both midnight (AM) and noon (PM)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hours {
    /// 0 through 23 counted straight through
    TwentyFourHour {
        /// Tens digit, 0-2
        tens: u8,
        /// Ones digit, 0-9
        ones: u8,
    },

    /// 1 through 12 with an AM/PM marker
    TwelveHour {
        /// Which half of the day
        time_of_day: TimeOfDay,
        /// Tens digit, 0-1
        tens: u8,
        /// Ones digit, 0-9
        ones: u8,
    },
}

impl Hours {
    /// Decode the hours register; out-of-range digits are masked, never
    /// rejected
    #[must_use]
    pub const fn from_register(byte: u8) -> Self {
        if byte & HOUR_FORMAT_FLAG == 0 {
            Self::TwentyFourHour {
                tens: (byte >> 4) & 0b11,
                ones: byte & ONES_MASK,
            }
        } else {
            Self::TwelveHour {
                time_of_day: if byte & MERIDIEM_FLAG == 0 {
                    TimeOfDay::Am
                } else {
                    TimeOfDay::Pm
                },
                tens: (byte >> 4) & 0b1,
                ones: byte & ONES_MASK,
            }
        }
    }

    /// Construct from a 24-hour binary value
    ///
    /// # Panics
    /// Panics if `value` exceeds 23
    #[must_use]
    pub const fn from_binary(value: u8) -> Self {
        assert!(value <= 23, "value out of range");

        let mut ones = value;
        let mut tens = 0;
        while ones > 9 {
            ones -= 10;
            tens += 1;
        }

        Self::TwentyFourHour { tens, ones }
    }

    /// Construct a 12-hour value; hour 0 is accepted as shorthand for 12
    ///
    /// # Panics
    /// Panics if `hour` exceeds 12
    #[must_use]
    pub const fn twelve_hour(time_of_day: TimeOfDay, hour: u8) -> Self {
        assert!(hour <= 12, "hour out of range");

        let mut ones = if hour == 0 { 12 } else { hour };
        let mut tens = 0;
        while ones > 9 {
            ones -= 10;
            tens += 1;
        }

        Self::TwelveHour {
            time_of_day,
            tens,
            ones,
        }
    }

    /// Encode into the hours register's wire format
    ///
    /// Digits are masked to their field width, as a hardware register write
    /// would truncate them
    #[must_use]
    pub const fn register(self) -> u8 {
        match self {
            Self::TwentyFourHour { tens, ones } => ((tens & 0b11) << 4) | (ones & ONES_MASK),
            Self::TwelveHour {
                time_of_day,
                tens,
                ones,
            } => {
                let meridiem = match time_of_day {
                    TimeOfDay::Am => 0,
                    TimeOfDay::Pm => MERIDIEM_FLAG,
                };
                HOUR_FORMAT_FLAG | meridiem | ((tens & 0b1) << 4) | (ones & ONES_MASK)
            }
        }
    }

    /// The convention this hour is counted in
    #[must_use]
    pub const fn format(self) -> HourFormat {
        match self {
            Self::TwentyFourHour { .. } => HourFormat::TwentyFourHour,
            Self::TwelveHour { .. } => HourFormat::TwelveHour,
        }
    }

    /// Tens digit
    #[must_use]
    pub const fn tens(self) -> u8 {
        match self {
            Self::TwentyFourHour { tens, .. } | Self::TwelveHour { tens, .. } => tens,
        }
    }

    /// Ones digit
    #[must_use]
    pub const fn ones(self) -> u8 {
        match self {
            Self::TwentyFourHour { ones, .. } | Self::TwelveHour { ones, .. } => ones,
        }
    }

    /// Which half of the day, when counted in 12-hour format
    #[must_use]
    pub const fn time_of_day(self) -> Option<TimeOfDay> {
        match self {
            Self::TwentyFourHour { .. } => None,
            Self::TwelveHour { time_of_day, .. } => Some(time_of_day),
        }
    }

    /// The hour in 24-hour binary
    #[must_use]
    pub const fn binary(self) -> u8 {
        match self.into_twenty_four_hour() {
            Self::TwentyFourHour { tens, ones } => tens * 10 + ones,
            Self::TwelveHour { .. } => unreachable!(),
        }
    }

    /// Recount in 12-hour format; a no-op if already counted that way
    ///
    /// Midnight (00) becomes 12 AM and noon (12) keeps its digits as 12 PM
    #[must_use]
    pub const fn into_twelve_hour(self) -> Self {
        match self {
            Self::TwelveHour { .. } => self,
            Self::TwentyFourHour { mut tens, mut ones } => {
                let mut time_of_day = TimeOfDay::Am;

                if tens == 1 {
                    if ones > 2 {
                        time_of_day = TimeOfDay::Pm;
                        tens = 0;
                        ones -= 2;
                    } else if ones == 2 {
                        // noon keeps its digits
                        time_of_day = TimeOfDay::Pm;
                    }
                } else if tens == 2 {
                    time_of_day = TimeOfDay::Pm;
                    if ones > 2 {
                        tens = 1;
                        ones -= 2;
                    } else {
                        tens = 0;
                        ones += 8;
                    }
                } else if ones == 0 {
                    // midnight becomes 12 AM
                    tens = 1;
                    ones = 2;
                }

                Self::TwelveHour {
                    time_of_day,
                    tens,
                    ones,
                }
            }
        }
    }

    /// Recount in 24-hour format; a no-op if already counted that way
    ///
    /// 12 AM becomes midnight (00)
    #[must_use]
    pub const fn into_twenty_four_hour(self) -> Self {
        match self {
            Self::TwentyFourHour { .. } => self,
            Self::TwelveHour {
                time_of_day,
                mut tens,
                mut ones,
            } => {
                match time_of_day {
                    TimeOfDay::Pm => {
                        if tens == 0 {
                            if ones < 8 {
                                ones += 2;
                                tens = 1;
                            } else {
                                ones -= 8;
                                tens = 2;
                            }
                        } else if ones < 2 {
                            ones += 2;
                            tens = 2;
                        }
                    }
                    TimeOfDay::Am => {
                        if tens == 1 && ones == 2 {
                            // 12 AM becomes midnight
                            tens = 0;
                            ones = 0;
                        }
                    }
                }

                Self::TwentyFourHour { tens, ones }
            }
        }
    }

    /// Recount in the given convention; a no-op if already counted that way
    #[must_use]
    pub const fn into_format(self, format: HourFormat) -> Self {
        match format {
            HourFormat::TwentyFourHour => self.into_twenty_four_hour(),
            HourFormat::TwelveHour => self.into_twelve_hour(),
        }
    }

    /// The next hour, wrapping per the counting convention
    ///
    /// In 12-hour format the meridiem flips on the 11 → 12 step; the 12 → 1
    /// step leaves it alone
    #[must_use]
    pub const fn incremented(self) -> Self {
        match self {
            Self::TwelveHour {
                mut time_of_day,
                mut tens,
                mut ones,
            } => {
                if tens == 1 {
                    if ones == 2 {
                        // 12 wraps to 1 o'clock
                        tens = 0;
                        ones = 1;
                    } else {
                        ones += 1;
                        if ones == 2 {
                            time_of_day = time_of_day.toggled();
                        }
                    }
                } else if ones == 9 {
                    tens = 1;
                    ones = 0;
                } else {
                    ones += 1;
                }

                Self::TwelveHour {
                    time_of_day,
                    tens,
                    ones,
                }
            }
            Self::TwentyFourHour { mut tens, mut ones } => {
                if tens == 2 {
                    if ones == 3 {
                        // 23 wraps to 0 o'clock
                        tens = 0;
                        ones = 0;
                    } else {
                        ones += 1;
                    }
                } else if ones == 9 {
                    tens += 1;
                    ones = 0;
                } else {
                    ones += 1;
                }

                Self::TwentyFourHour { tens, ones }
            }
        }
    }

    /// The previous hour; exact inverse of [Hours::incremented]
    #[must_use]
    pub const fn decremented(self) -> Self {
        match self {
            Self::TwelveHour {
                mut time_of_day,
                mut tens,
                mut ones,
            } => {
                if tens == 1 {
                    if ones == 0 {
                        // 10 falls back to 9 o'clock
                        tens = 0;
                        ones = 9;
                    } else {
                        ones -= 1;
                        if ones == 1 {
                            time_of_day = time_of_day.toggled();
                        }
                    }
                } else if ones == 1 {
                    // 1 wraps back to 12 o'clock
                    tens = 1;
                    ones = 2;
                } else {
                    ones -= 1;
                }

                Self::TwelveHour {
                    time_of_day,
                    tens,
                    ones,
                }
            }
            Self::TwentyFourHour { mut tens, mut ones } => {
                if tens > 0 {
                    if ones == 0 {
                        tens -= 1;
                        ones = 9;
                    } else {
                        ones -= 1;
                    }
                } else if ones == 0 {
                    // 0 wraps back to 23 o'clock
                    tens = 2;
                    ones = 3;
                } else {
                    ones -= 1;
                }

                Self::TwentyFourHour { tens, ones }
            }
        }
    }
}

/// Minutes encoded as 2 digit BCD
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minutes {
    tens: u8,
    ones: u8,
}

impl Minutes {
    /// Decode the minutes register; out-of-range digits are masked, never
    /// rejected
    #[must_use]
    pub const fn from_register(byte: u8) -> Self {
        Self {
            tens: (byte >> 4) & 0b111,
            ones: byte & ONES_MASK,
        }
    }

    /// Construct from binary representation
    ///
    /// # Panics
    /// Panics if `value` exceeds 59
    #[must_use]
    pub const fn from_binary(value: u8) -> Self {
        assert!(value <= 59, "value out of range");

        let mut ones = value;
        let mut tens = 0;
        while ones > 9 {
            ones -= 10;
            tens += 1;
        }

        Self { tens, ones }
    }

    /// Encode into the minutes register's wire format
    #[must_use]
    pub const fn register(self) -> u8 {
        ((self.tens & 0b111) << 4) | (self.ones & ONES_MASK)
    }

    /// Tens digit
    #[must_use]
    pub const fn tens(self) -> u8 {
        self.tens
    }

    /// Ones digit
    #[must_use]
    pub const fn ones(self) -> u8 {
        self.ones
    }

    /// Returns value as binary
    #[must_use]
    pub const fn binary(self) -> u8 {
        self.tens * 10 + self.ones
    }

    /// The next minute, wrapping 59 → 0
    #[must_use]
    pub const fn incremented(self) -> Self {
        let Self { mut tens, mut ones } = self;

        if tens == 5 {
            if ones == 9 {
                tens = 0;
                ones = 0;
            } else {
                ones += 1;
            }
        } else if ones == 9 {
            tens += 1;
            ones = 0;
        } else {
            ones += 1;
        }

        Self { tens, ones }
    }

    /// The previous minute, wrapping 0 → 59; exact inverse of
    /// [Minutes::incremented]
    #[must_use]
    pub const fn decremented(self) -> Self {
        let Self { mut tens, mut ones } = self;

        if ones == 0 {
            ones = 9;
            if tens == 0 {
                tens = 5;
            } else {
                tens -= 1;
            }
        } else {
            ones -= 1;
        }

        Self { tens, ones }
    }
}

/// Seconds encoded as 2 digit BCD
///
/// Note: bit 7 of the register is allowed to be set, but does not reflect in
/// the value of seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seconds {
    tens: u8,
    ones: u8,
}

impl Seconds {
    /// Decode the seconds register; out-of-range digits are masked, never
    /// rejected
    #[must_use]
    pub const fn from_register(byte: u8) -> Self {
        Self {
            tens: (byte >> 4) & 0b111,
            ones: byte & ONES_MASK,
        }
    }

    /// Construct from binary representation
    ///
    /// # Panics
    /// Panics if `value` exceeds 59
    #[must_use]
    pub const fn from_binary(value: u8) -> Self {
        assert!(value <= 59, "value out of range");

        let mut ones = value;
        let mut tens = 0;
        while ones > 9 {
            ones -= 10;
            tens += 1;
        }

        Self { tens, ones }
    }

    /// Encode into the seconds register's wire format
    #[must_use]
    pub const fn register(self) -> u8 {
        ((self.tens & 0b111) << 4) | (self.ones & ONES_MASK)
    }

    /// Tens digit
    #[must_use]
    pub const fn tens(self) -> u8 {
        self.tens
    }

    /// Ones digit
    #[must_use]
    pub const fn ones(self) -> u8 {
        self.ones
    }

    /// Returns value as binary
    #[must_use]
    pub const fn binary(self) -> u8 {
        self.tens * 10 + self.ones
    }
}

/// Die temperature as stored in the temperature register
///
/// The register holds degrees celsius offset by 60
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temperature(u8);

impl Temperature {
    /// Wrap a raw temperature register byte
    #[must_use]
    pub const fn from_register(byte: u8) -> Self {
        Self(byte)
    }

    /// The raw register byte
    #[must_use]
    pub const fn register(self) -> u8 {
        self.0
    }

    /// Temperature in whole degrees celsius
    #[must_use]
    pub const fn celsius(self) -> i16 {
        self.0 as i16 - 60
    }

    /// Temperature in whole degrees fahrenheit, truncated toward zero
    #[must_use]
    pub fn fahrenheit(self) -> i16 {
        (self.celsius() as f32 * 1.8 + 32.0) as i16
    }
}

/// Complete time and temperature reading
///
/// A reading is a snapshot constructed fresh by every read transaction and
/// never updated in place; the hardware registers remain the single source
/// of truth
#[expect(missing_docs, reason = "self-explanatory fields")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct TimeReading {
    pub hours: Hours,
    pub minutes: Minutes,
    pub seconds: Seconds,
    pub temperature: Temperature,
}

impl uDisplay for TimeReading {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(
            f,
            "{}{}:{}{}:{}{}",
            self.hours.tens(),
            self.hours.ones(),
            self.minutes.tens(),
            self.minutes.ones(),
            self.seconds.tens(),
            self.seconds.ones()
        )?;

        if let Some(time_of_day) = self.hours.time_of_day() {
            uwrite!(f, " {}", time_of_day)?;
        }

        Ok(())
    }
}

/// Time of day to load into the clock
///
/// The hour is interpreted against the clock's active format: 0-23 in
/// 24-hour format, 1-12 in 12-hour format where 0 is accepted as shorthand
/// for 12. `pm` only matters in 12-hour format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeSetting {
    /// Hour, defaulting to 0 (midnight)
    pub hour: u8,

    /// Minute 0-59, defaulting to 0
    pub minute: u8,

    /// Second 0-59, defaulting to 0
    pub second: u8,

    /// Post-meridiem flag, defaulting to false
    pub pm: bool,
}

impl TimeSetting {
    /// The `pm` flag as a half of the day
    #[must_use]
    pub const fn time_of_day(self) -> TimeOfDay {
        if self.pm {
            TimeOfDay::Pm
        } else {
            TimeOfDay::Am
        }
    }
}
