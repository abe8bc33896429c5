use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::charge::ChargeError;

/// 日時エントリーの長さ ("MMdd HHmm")。
const ENTRY_LENGTH: usize = 9;
/// 日付部分の終了位置。
const DATE_END: usize = 4;
/// 時刻部分の開始位置。
const TIME_START: usize = 5;
/// 日付と時刻の区切り文字。
const SEPARATOR: char = ' ';

const MINUTES_PER_HOUR: i64 = 60;
const MONTHS_PER_YEAR: i32 = 12;

/// エントリーが"MMdd HHmm"の形をしているかどうかを判定する。
///
/// 桁の形だけを確認し、月や日の範囲は確認しない。
/// 4文字目の区切り文字も確認しない。
pub fn is_proper_format(entry: &str) -> bool {
    let chars: Vec<char> = entry.chars().collect();

    chars.len() == ENTRY_LENGTH
        && chars[..DATE_END].iter().all(char::is_ascii_digit)
        && chars[TIME_START..].iter().all(char::is_ascii_digit)
}

/// 1日の中の時刻 (HHmm)。
///
/// 範囲外の値 (例: 2500) もそのまま保持し、分への換算時に繰り上がる。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    /// 00:00
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0 };
    /// 23:59
    pub const LAST_MINUTE: ClockTime = ClockTime {
        hour: 23,
        minute: 59,
    };

    /// 0時からの経過分を返す。
    pub fn minutes_of_day(&self) -> i64 {
        i64::from(self.hour) * MINUTES_PER_HOUR + i64::from(self.minute)
    }
}

/// 同じ日の2つの時刻の間の分数を返す。
///
/// 日付をまたぐ計算は行わないため、`to`が`from`より前の場合は負の値になる。
pub fn minutes_between(from: ClockTime, to: ClockTime) -> i64 {
    to.minutes_of_day() - from.minutes_of_day()
}

/// "MMdd HHmm"形式の日時。年は持たず、計算時に基準年を与える。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestamp {
    month: u32,
    day: u32,
    time: ClockTime,
}

impl Timestamp {
    /// エントリーをパースする。
    ///
    /// 形が正しくない場合は`ChargeError::Format`を、
    /// 区切り文字が空白でない場合は`ChargeError::Calculation`を返す。
    pub fn parse(entry: &str) -> Result<Self, ChargeError> {
        if !is_proper_format(entry) {
            return Err(ChargeError::Format);
        }

        let chars: Vec<char> = entry.chars().collect();
        if chars[DATE_END] != SEPARATOR {
            return Err(ChargeError::Calculation);
        }

        Ok(Self {
            month: two_digits(chars[0], chars[1]),
            day: two_digits(chars[2], chars[3]),
            time: ClockTime {
                hour: two_digits(chars[5], chars[6]),
                minute: two_digits(chars[7], chars[8]),
            },
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn time(&self) -> ClockTime {
        self.time
    }

    /// 基準年に置いた日時を返す。
    ///
    /// 月、日、時刻の範囲外の値は繰り上げて解釈する (例: 13月は翌年1月、0601の0日は5月31日)。
    pub fn lenient_datetime(&self, year: i32) -> Result<NaiveDateTime, ChargeError> {
        let months = self.month as i32 - 1;
        NaiveDate::from_ymd_opt(
            year + months.div_euclid(MONTHS_PER_YEAR),
            months.rem_euclid(MONTHS_PER_YEAR) as u32 + 1,
            1,
        )
        .and_then(|first_day| first_day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| {
            midnight.checked_add_signed(Duration::days(i64::from(self.day) - 1))
        })
        .and_then(|date| date.checked_add_signed(Duration::minutes(self.time.minutes_of_day())))
        .ok_or(ChargeError::Calculation)
    }

    /// 指定された年の暦日を返す。
    ///
    /// 存在しない日付 (例: 0230) の場合は`ChargeError::Calculation`を返す。
    pub fn calendar_date(&self, year: i32) -> Result<NaiveDate, ChargeError> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or(ChargeError::Calculation)
    }
}

fn two_digits(tens: char, ones: char) -> u32 {
    // is_proper_formatで数字であることは確認済み
    let tens = tens.to_digit(10).unwrap_or_default();
    let ones = ones.to_digit(10).unwrap_or_default();
    tens * 10 + ones
}
