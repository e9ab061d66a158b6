//! Abracon AB-RTCMC real-time clock abstractions and API

use embedded_hal::i2c::I2c;

use crate::time::{
    HourFormat, Hours, Minutes, Seconds, Temperature, TimeReading, TimeSetting,
};

type RTCResult<E, T = ()> = Result<T, Error<E>>;

/// Fixed 7-bit bus address of the clock
const RTC_ADDR: u8 = 0x56;

// Register addresses
const CTL1_REG: u8 = 0x00;
const CTL_STATUS_REG: u8 = 0x03;
const SECONDS_REG: u8 = 0x08;
const MINUTES_REG: u8 = 0x09;
const HOURS_REG: u8 = 0x0A;
const TEMP_REG: u8 = 0x20;
const EEPROM_CTL_REG: u8 = 0x30;

// Control bit positions
const EEPROM_REFRESH_BIT: u8 = 3; // CTL1_REG: automatic EEPROM refresh
const POWER_ON_BIT: u8 = 5; // CTL_STATUS_REG: supply voltage was lost
const EEPROM_BUSY_BIT: u8 = 7; // CTL_STATUS_REG: nonvolatile write in progress
const TRICKLE_CHARGE_BIT: u8 = 4; // EEPROM_CTL_REG: backup cell trickle charger

/// Bus transactions spent waiting for the EEPROM busy flag to clear before
/// giving up; each poll is a full register read, so the bus clock paces the
/// loop
const EEPROM_BUSY_POLL_LIMIT: u8 = 100;

/// Errors produced by clock operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Something went wrong on the I2C bus (missing acknowledge or a short
    /// transfer, depending on the bus implementation)
    I2c(E),

    /// The EEPROM busy flag never cleared within the poll budget
    EepromBusyTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::I2c(error)
    }
}

/// Abracon AB-RTCMC real-time clock module; interfaced via I2C
///
/// No internal state; the hardware registers are the single source of truth,
/// and every operation is one blocking read or read-modify-write transaction
/// against them
#[must_use]
pub struct AbraRTC<I2C> {
    i2c: I2C,
}

impl<I2C> AbraRTC<I2C> {
    /// Connect to the clock by taking ownership of the I2C bus
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Disconnect to release the I2C bus
    #[must_use]
    pub fn release(self) -> I2C {
        self.i2c
    }
}

// Register-level access
impl<I2C, E> AbraRTC<I2C>
where
    I2C: I2c<Error = E>,
{
    fn read_register(&mut self, reg: u8) -> RTCResult<E, u8> {
        let mut buf = [0u8];
        self.i2c.write_read(RTC_ADDR, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> RTCResult<E> {
        self.i2c.write(RTC_ADDR, &[reg, value])?;
        Ok(())
    }

    fn write_bit(&mut self, reg: u8, bit: u8, value: bool) -> RTCResult<E> {
        let current = self.read_register(reg)?;
        let updated = if value {
            current | (1 << bit)
        } else {
            current & !(1 << bit)
        };
        self.write_register(reg, updated)
    }
}

// Time getters
impl<I2C, E> AbraRTC<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Get a complete time and temperature reading
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_time(&mut self) -> RTCResult<E, TimeReading> {
        let mut buf = [0u8; 3];
        self.i2c.write_read(RTC_ADDR, &[SECONDS_REG], &mut buf)?;

        Ok(TimeReading {
            seconds: Seconds::from_register(buf[0]),
            minutes: Minutes::from_register(buf[1]),
            hours: Hours::from_register(buf[2]),
            temperature: self.get_temperature()?,
        })
    }

    /// Get seconds
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_seconds(&mut self) -> RTCResult<E, Seconds> {
        self.read_register(SECONDS_REG).map(Seconds::from_register)
    }

    /// Get minutes
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_minutes(&mut self) -> RTCResult<E, Minutes> {
        self.read_register(MINUTES_REG).map(Minutes::from_register)
    }

    /// Get hours
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_hours(&mut self) -> RTCResult<E, Hours> {
        self.read_register(HOURS_REG).map(Hours::from_register)
    }

    /// Get the hour-counting convention the clock is running in
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_hour_format(&mut self) -> RTCResult<E, HourFormat> {
        self.get_hours().map(Hours::format)
    }

    /// Get the die temperature
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_temperature(&mut self) -> RTCResult<E, Temperature> {
        self.read_register(TEMP_REG).map(Temperature::from_register)
    }
}

// Time setters
impl<I2C, E> AbraRTC<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Set the time of day in a single write, keeping the clock's hour
    /// format
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    ///
    /// # Panics
    /// Panics if a field of `setting` is outside its documented range
    pub fn set_time(&mut self, setting: TimeSetting) -> RTCResult<E> {
        let hours = match self.get_hour_format()? {
            HourFormat::TwentyFourHour => Hours::from_binary(setting.hour),
            HourFormat::TwelveHour => Hours::twelve_hour(setting.time_of_day(), setting.hour),
        };

        let buf = [
            SECONDS_REG,
            Seconds::from_binary(setting.second).register(),
            Minutes::from_binary(setting.minute).register(),
            hours.register(),
        ];
        self.i2c.write(RTC_ADDR, &buf)?;
        Ok(())
    }

    /// Switch the clock to the given hour format, recounting the stored
    /// hour; a no-op if the clock already uses it
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn set_hour_format(&mut self, format: HourFormat) -> RTCResult<E> {
        let hours = self.get_hours()?;
        if hours.format() == format {
            return Ok(());
        }
        self.write_register(HOURS_REG, hours.into_format(format).register())
    }

    /// Switch the clock to the opposite hour format, recounting the stored
    /// hour
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn toggle_hour_format(&mut self) -> RTCResult<E> {
        let hours = self.get_hours()?;
        let toggled = hours.into_format(hours.format().toggled());
        self.write_register(HOURS_REG, toggled.register())
    }

    /// Advance the hour by one, wrapping per the clock's hour format
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus; the register
    /// is left unchanged
    pub fn inc_hour(&mut self) -> RTCResult<E> {
        let hours = self.get_hours()?;
        self.write_register(HOURS_REG, hours.incremented().register())
    }

    /// Turn the hour back by one, wrapping per the clock's hour format
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus; the register
    /// is left unchanged
    pub fn dec_hour(&mut self) -> RTCResult<E> {
        let hours = self.get_hours()?;
        self.write_register(HOURS_REG, hours.decremented().register())
    }

    /// Advance the minute by one, wrapping 59 → 0
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus; the register
    /// is left unchanged
    pub fn inc_minute(&mut self) -> RTCResult<E> {
        let minutes = self.get_minutes()?;
        self.write_register(MINUTES_REG, minutes.incremented().register())
    }

    /// Turn the minute back by one, wrapping 0 → 59
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus; the register
    /// is left unchanged
    pub fn dec_minute(&mut self) -> RTCResult<E> {
        let minutes = self.get_minutes()?;
        self.write_register(MINUTES_REG, minutes.decremented().register())
    }
}

// Power and EEPROM control
impl<I2C, E> AbraRTC<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Whether the power-on flag is set, meaning the supply was lost and the
    /// stored time can no longer be trusted
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn power_on_flag(&mut self) -> RTCResult<E, bool> {
        let status = self.read_register(CTL_STATUS_REG)?;
        Ok(status & (1 << POWER_ON_BIT) != 0)
    }

    /// Clear the power-on flag, typically after the time has been set again
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn clear_power_on_flag(&mut self) -> RTCResult<E> {
        self.write_bit(CTL_STATUS_REG, POWER_ON_BIT, false)
    }

    /// Whether the EEPROM is mid-write and not safe to access
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn eeprom_busy(&mut self) -> RTCResult<E, bool> {
        let status = self.read_register(CTL_STATUS_REG)?;
        Ok(status & (1 << EEPROM_BUSY_BIT) != 0)
    }

    /// Enable or disable the trickle charger for the backup cell
    ///
    /// Automatic EEPROM refresh is suspended around the configuration write
    /// and restored before returning, even when the write fails
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus, or
    /// [Error::EepromBusyTimeout] if the EEPROM stays busy through the whole
    /// poll budget
    pub fn set_trickle_charge(&mut self, enable: bool) -> RTCResult<E> {
        self.write_bit(CTL1_REG, EEPROM_REFRESH_BIT, false)?;

        let written = self
            .wait_eeprom_idle()
            .and_then(|()| self.write_bit(EEPROM_CTL_REG, TRICKLE_CHARGE_BIT, enable));
        let restored = self.write_bit(CTL1_REG, EEPROM_REFRESH_BIT, true);

        written.and(restored)
    }

    fn wait_eeprom_idle(&mut self) -> RTCResult<E> {
        for _ in 0..EEPROM_BUSY_POLL_LIMIT {
            if !self.eeprom_busy()? {
                return Ok(());
            }
        }
        Err(Error::EepromBusyTimeout)
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use alloc::vec;

    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    use super::*;

    #[test]
    fn get_time_reads_clock_then_temperature() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![SECONDS_REG], vec![0x30, 0x59, 0x12]),
            I2cTrans::write_read(RTC_ADDR, vec![TEMP_REG], vec![0x5A]),
        ]));

        let reading = rtc.get_time().unwrap();
        assert_eq!(reading.seconds.binary(), 30);
        assert_eq!(reading.minutes.binary(), 59);
        assert_eq!(reading.hours, Hours::TwentyFourHour { tens: 1, ones: 2 });
        assert_eq!(reading.temperature.celsius(), 30);
        assert_eq!(reading.temperature.fahrenheit(), 86);

        rtc.release().done();
    }

    #[test]
    fn inc_minute_is_one_read_modify_write() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![MINUTES_REG], vec![0x59]),
            I2cTrans::write(RTC_ADDR, vec![MINUTES_REG, 0x00]),
        ]));

        rtc.inc_minute().unwrap();
        rtc.release().done();
    }

    #[test]
    fn inc_hour_advances_the_register() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![HOURS_REG], vec![0x12]),
            I2cTrans::write(RTC_ADDR, vec![HOURS_REG, 0x13]),
        ]));

        rtc.inc_hour().unwrap();
        rtc.release().done();
    }

    #[test]
    fn dec_hour_wraps_midnight_back_to_twenty_three() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![HOURS_REG], vec![0x00]),
            I2cTrans::write(RTC_ADDR, vec![HOURS_REG, 0x23]),
        ]));

        rtc.dec_hour().unwrap();
        rtc.release().done();
    }

    #[test]
    fn toggle_hour_format_recounts_two_pm() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![HOURS_REG], vec![0x62]),
            I2cTrans::write(RTC_ADDR, vec![HOURS_REG, 0x14]),
        ]));

        rtc.toggle_hour_format().unwrap();
        rtc.release().done();
    }

    #[test]
    fn toggle_hour_format_recounts_fourteen_hundred() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![HOURS_REG], vec![0x14]),
            I2cTrans::write(RTC_ADDR, vec![HOURS_REG, 0x62]),
        ]));

        rtc.toggle_hour_format().unwrap();
        rtc.release().done();
    }

    #[test]
    fn set_hour_format_skips_the_write_when_already_set() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[I2cTrans::write_read(
            RTC_ADDR,
            vec![HOURS_REG],
            vec![0x14],
        )]));

        rtc.set_hour_format(HourFormat::TwentyFourHour).unwrap();
        rtc.release().done();
    }

    #[test]
    fn set_time_defaults_to_midnight() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![HOURS_REG], vec![0x00]),
            I2cTrans::write(RTC_ADDR, vec![SECONDS_REG, 0x00, 0x00, 0x00]),
        ]));

        rtc.set_time(TimeSetting::default()).unwrap();
        rtc.release().done();
    }

    #[test]
    fn set_time_honors_a_twelve_hour_clock() {
        // hour 0 is stored as 12 AM on a 12-hour clock
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![HOURS_REG], vec![0x62]),
            I2cTrans::write(RTC_ADDR, vec![SECONDS_REG, 0x00, 0x00, 0x52]),
        ]));

        rtc.set_time(TimeSetting::default()).unwrap();
        rtc.release().done();

        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![HOURS_REG], vec![0x52]),
            I2cTrans::write(RTC_ADDR, vec![SECONDS_REG, 0x09, 0x05, 0x62]),
        ]));

        rtc.set_time(TimeSetting {
            hour: 2,
            minute: 5,
            second: 9,
            pm: true,
        })
        .unwrap();
        rtc.release().done();
    }

    #[test]
    fn set_trickle_charge_suspends_eeprom_refresh() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![CTL1_REG], vec![0x08]),
            I2cTrans::write(RTC_ADDR, vec![CTL1_REG, 0x00]),
            I2cTrans::write_read(RTC_ADDR, vec![CTL_STATUS_REG], vec![0x80]),
            I2cTrans::write_read(RTC_ADDR, vec![CTL_STATUS_REG], vec![0x00]),
            I2cTrans::write_read(RTC_ADDR, vec![EEPROM_CTL_REG], vec![0x00]),
            I2cTrans::write(RTC_ADDR, vec![EEPROM_CTL_REG, 0x10]),
            I2cTrans::write_read(RTC_ADDR, vec![CTL1_REG], vec![0x00]),
            I2cTrans::write(RTC_ADDR, vec![CTL1_REG, 0x08]),
        ]));

        rtc.set_trickle_charge(true).unwrap();
        rtc.release().done();
    }

    #[test]
    fn set_trickle_charge_times_out_but_restores_refresh() {
        let mut expectations = vec![
            I2cTrans::write_read(RTC_ADDR, vec![CTL1_REG], vec![0x08]),
            I2cTrans::write(RTC_ADDR, vec![CTL1_REG, 0x00]),
        ];
        for _ in 0..EEPROM_BUSY_POLL_LIMIT {
            expectations.push(I2cTrans::write_read(
                RTC_ADDR,
                vec![CTL_STATUS_REG],
                vec![0x80],
            ));
        }
        expectations.push(I2cTrans::write_read(RTC_ADDR, vec![CTL1_REG], vec![0x00]));
        expectations.push(I2cTrans::write(RTC_ADDR, vec![CTL1_REG, 0x08]));

        let mut rtc = AbraRTC::new(I2cMock::new(&expectations));
        assert_eq!(rtc.set_trickle_charge(false), Err(Error::EepromBusyTimeout));
        rtc.release().done();
    }

    #[test]
    fn power_on_flag_reads_and_clears() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[
            I2cTrans::write_read(RTC_ADDR, vec![CTL_STATUS_REG], vec![0x20]),
            I2cTrans::write_read(RTC_ADDR, vec![CTL_STATUS_REG], vec![0x20]),
            I2cTrans::write(RTC_ADDR, vec![CTL_STATUS_REG, 0x00]),
            I2cTrans::write_read(RTC_ADDR, vec![CTL_STATUS_REG], vec![0x00]),
        ]));

        assert!(rtc.power_on_flag().unwrap());
        rtc.clear_power_on_flag().unwrap();
        assert!(!rtc.power_on_flag().unwrap());

        rtc.release().done();
    }

    #[test]
    fn bus_errors_abort_the_whole_operation() {
        let mut rtc = AbraRTC::new(I2cMock::new(&[I2cTrans::write_read(
            RTC_ADDR,
            vec![HOURS_REG],
            vec![0x00],
        )
        .with_error(ErrorKind::Other)]));

        assert_eq!(rtc.inc_hour(), Err(Error::I2c(ErrorKind::Other)));
        rtc.release().done();
    }
}
