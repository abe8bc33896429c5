use chrono::{Local, NaiveDate};
#[cfg(test)]
use mockall::automock;

/// 現在の日付を取得するためのtrait。
///
/// 壁時計への依存はこのtraitに閉じ込め、テストではモックに差し替える。
#[cfg_attr(test, automock)]
pub trait Clock {
    /// Localタイムゾーンでの今日の日付を返す。
    fn today(&self) -> NaiveDate;
}

/// システム時刻を利用する`Clock`。
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// うるう年かどうかを判定する。
pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

/// 指定された年の日数を返す。
pub fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}
