//! Proprietary Profline clock group (MEC 0x0D19)
//!
//! Two encoder families have been seen in the field and disagree on layout:
//!
//! ```text
//! YearFirst: 0D 19 00 YY MM DD hh mm ss 00 00   (generic group header)
//! DayFirst:  0D 19 06 DD hh mm ss 00 00         (group type 0x06, no date)
//! ```

use time::OffsetDateTime;

use crate::group::{build_group, ElementCode};

/// Group type used by the day-first layout
pub const DAY_FIRST_GROUP_TYPE: u8 = 0x06;

/// Byte layout of the clock group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClockVariant {
    /// Two-digit year, month, day, time through the generic group builder
    #[default]
    YearFirst,
    /// Day and time only, group type 0x06
    DayFirst,
}

/// Data bytes of the year-first layout
pub fn year_first_data(timestamp: OffsetDateTime) -> [u8; 8] {
    let year = timestamp.year().rem_euclid(100) as u8;
    [
        year,
        timestamp.month() as u8,
        timestamp.day(),
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second(),
        0x00,
        0x00,
    ]
}

/// Build the un-framed clock message for `timestamp`
pub fn clock_message(timestamp: OffsetDateTime, variant: ClockVariant) -> Vec<u8> {
    match variant {
        ClockVariant::YearFirst => build_group(
            ElementCode::ProflineClock.code(),
            &year_first_data(timestamp),
        ),
        ClockVariant::DayFirst => {
            let [mec_hi, mec_lo] = ElementCode::ProflineClock.code().to_be_bytes();
            vec![
                mec_hi,
                mec_lo,
                DAY_FIRST_GROUP_TYPE,
                timestamp.day(),
                timestamp.hour(),
                timestamp.minute(),
                timestamp.second(),
                0x00,
                0x00,
            ]
        }
    }
}
