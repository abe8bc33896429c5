use chrono::Duration;
use log::debug;

use crate::datetime::days_in_year;
use crate::elapsed::Elapsed;
use crate::report::ChargeReport;
use crate::timestamp::{is_proper_format, minutes_between, ClockTime, Timestamp};

const DECEMBER: u32 = 12;
const JANUARY: u32 = 1;
const COMMON_YEAR_DAYS: i64 = 365;

/// 課金時間の計算で発生するエラー。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChargeError {
    /// 日時エントリーが"MMdd HHmm"の形をしていない。
    #[error("Invalid entry! Entries must be in the form of MMdd or HHmm")]
    Format,
    /// 形は正しいが計算できない。
    #[error("Invalid calculation in date/times")]
    Calculation,
}

/// 1回分の課金時間の計算要求。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChargeRequest {
    start: Timestamp,
    stop: Timestamp,
    multi_day: bool,
}

impl ChargeRequest {
    /// 新しい`ChargeRequest`を返す。
    ///
    /// 開始と終了の両方の形を確認してからパースする。
    ///
    /// # Arguments
    ///
    /// * `start` - "MMdd HHmm"形式の開始日時
    /// * `stop` - "MMdd HHmm"形式の終了日時
    /// * `multi_day` - 複数日にまたがる課金かどうか
    pub fn new(start: &str, stop: &str, multi_day: bool) -> Result<Self, ChargeError> {
        if !(is_proper_format(start) && is_proper_format(stop)) {
            return Err(ChargeError::Format);
        }

        Ok(Self {
            start: Timestamp::parse(start)?,
            stop: Timestamp::parse(stop)?,
            multi_day,
        })
    }

    pub fn is_multi_day(&self) -> bool {
        self.multi_day
    }

    /// 12月から1月への年越しの課金かどうか。
    fn crosses_new_year(&self) -> bool {
        self.start.month() == DECEMBER && self.stop.month() == JANUARY
    }
}

/// 課金時間を計算する。
///
/// 日時には年が含まれないため、すべての日付は基準年に置いて計算する。
///
/// # Examples
///
/// ```
/// use perfusion_charge::charge::ChargeCalculator;
///
/// let calculator = ChargeCalculator::new(2026);
/// let report = calculator.compute("0615 0800", "0615 1230", false).unwrap();
/// assert_eq!(report.to_string(), "Total minutes: 270 minutes\n");
/// ```
pub struct ChargeCalculator {
    reference_year: i32,
}

impl ChargeCalculator {
    /// 新しい`ChargeCalculator`を返す。
    ///
    /// # Arguments
    ///
    /// * `reference_year` - 日時を置く基準年
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// 開始日時と終了日時から課金時間を計算する。
    pub fn compute(
        &self,
        start: &str,
        stop: &str,
        multi_day: bool,
    ) -> Result<ChargeReport, ChargeError> {
        let request = ChargeRequest::new(start, stop, multi_day)?;
        self.calculate(&request)
    }

    /// `ChargeRequest`から課金時間を計算する。
    pub fn calculate(&self, request: &ChargeRequest) -> Result<ChargeReport, ChargeError> {
        let elapsed = self.elapsed(request)?;

        if !request.multi_day {
            return Ok(ChargeReport::SingleDay {
                total_minutes: elapsed.total_minutes(),
            });
        }

        let number_of_days = self.number_of_days(request)?;
        debug!("Number of days to calculate: {}", number_of_days);
        let day_minutes = (1..=number_of_days)
            .map(|day| {
                if day == 1 {
                    minutes_between(request.start.time(), ClockTime::LAST_MINUTE) + 1
                } else if day == number_of_days {
                    minutes_between(ClockTime::MIDNIGHT, request.stop.time())
                } else {
                    minutes_between(ClockTime::MIDNIGHT, ClockTime::LAST_MINUTE) + 1
                }
            })
            .collect();

        Ok(ChargeReport::MultiDay {
            day_minutes,
            elapsed,
        })
    }

    /// 開始から終了までの経過時間を返す。
    ///
    /// 複数日で年越しの場合は終了を翌年に置き、基準年の前年がうるう年なら1日分を加える。
    fn elapsed(&self, request: &ChargeRequest) -> Result<Elapsed, ChargeError> {
        let crosses_new_year = request.multi_day && request.crosses_new_year();
        let stop_year = if crosses_new_year {
            self.reference_year + 1
        } else {
            self.reference_year
        };
        let start_at = request.start.lenient_datetime(self.reference_year)?;
        let stop_at = request.stop.lenient_datetime(stop_year)?;
        let mut diff = stop_at.signed_duration_since(start_at);

        if crosses_new_year {
            let leap_days = days_in_year(self.reference_year - 1) - COMMON_YEAR_DAYS;
            diff = diff
                .checked_add(&Duration::days(leap_days))
                .ok_or(ChargeError::Calculation)?;
        }

        Ok(Elapsed::from_duration(diff))
    }

    /// 開始日から終了日まで、両端を含む日数を返す。
    fn number_of_days(&self, request: &ChargeRequest) -> Result<i64, ChargeError> {
        let stop_year = if request.crosses_new_year() {
            self.reference_year + 1
        } else {
            self.reference_year
        };
        let start_date = request.start.calendar_date(self.reference_year)?;
        let stop_date = request.stop.calendar_date(stop_year)?;

        let days = start_date
            .iter_days()
            .take_while(|date| *date <= stop_date)
            .count();

        i64::try_from(days).map_err(|_| ChargeError::Calculation)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ChargeCalculator, ChargeError, ChargeRequest};

    const YEAR: i32 = 2026;

    /// 計算結果の各行を結合する。
    fn lines(lines: &[&str]) -> String {
        lines.iter().map(|line| format!("{}\n", line)).collect()
    }

    #[test]
    fn test_single_day() {
        let report = ChargeCalculator::new(YEAR)
            .compute("0615 0800", "0615 1230", false)
            .unwrap();

        assert_eq!(report.to_string(), "Total minutes: 270 minutes\n");
    }

    #[test]
    fn test_single_day_over_limit() {
        let report = ChargeCalculator::new(YEAR)
            .compute("0615 0000", "0615 2359", false)
            .unwrap();

        assert_eq!(report.to_string(), "Total minutes: 999 + 440 (1439) minutes\n");
    }

    /// 1日の課金では年越しの補正をしない。
    #[test]
    fn test_single_day_ignores_new_year() {
        let report = ChargeCalculator::new(YEAR)
            .compute("1231 2300", "0101 0100", false)
            .unwrap();

        assert_eq!(report.to_string(), "Total minutes: -525480 minutes\n");
    }

    #[test]
    fn test_multi_day_two_days() {
        let report = ChargeCalculator::new(YEAR)
            .compute("0615 2200", "0616 0600", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 120",
                "Day 2 minutes: 360",
                "0 days, 8 hours, 0 minutes",
                "Total hours: 8.00 hours",
                "Total minutes: 480 minutes",
            ])
        );
    }

    #[test]
    fn test_multi_day_three_days() {
        let report = ChargeCalculator::new(YEAR)
            .compute("0615 2200", "0617 0130", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 120",
                "Day 2 minutes: 999 + 441 (1440)",
                "Day 3 minutes: 90",
                "1 days, 3 hours, 30 minutes",
                "Total hours: 27.50 hours",
                "Total minutes: 999 + 651 (1650) minutes",
            ])
        );
    }

    #[test]
    fn test_multi_day_across_month_end() {
        let report = ChargeCalculator::new(YEAR)
            .compute("0228 1200", "0301 1200", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 720",
                "Day 2 minutes: 720",
                "1 days, 0 hours, 0 minutes",
                "Total hours: 24.00 hours",
                "Total minutes: 999 + 441 (1440) minutes",
            ])
        );
    }

    /// 同じ日を指定した場合は1日分だけ計算する。
    #[test]
    fn test_multi_day_same_date() {
        let report = ChargeCalculator::new(YEAR)
            .compute("0615 0800", "0615 1230", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 960",
                "0 days, 4 hours, 30 minutes",
                "Total hours: 4.50 hours",
                "Total minutes: 270 minutes",
            ])
        );
    }

    /// 終了が開始より前の場合は日毎の行を出力しない。
    #[test]
    fn test_multi_day_stop_before_start() {
        let report = ChargeCalculator::new(YEAR)
            .compute("0616 0800", "0615 0800", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "-1 days, 0 hours, 0 minutes",
                "Total hours: -24.00 hours",
                "Total minutes: -1440 minutes",
            ])
        );
    }

    /// 前年がうるう年でない場合は実際の経過時間になる。基準年がうるう年でも同じ。
    #[rstest]
    #[case::after_common_year(2026)]
    #[case::after_1900(1901)]
    #[case::leap_2024(2024)]
    #[case::leap_2028(2028)]
    #[case::leap_2000(2000)]
    fn test_new_year_after_common_year(#[case] year: i32) {
        let report = ChargeCalculator::new(year)
            .compute("1231 2300", "0101 0100", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 60",
                "Day 2 minutes: 60",
                "0 days, 2 hours, 0 minutes",
                "Total hours: 2.00 hours",
                "Total minutes: 120 minutes",
            ])
        );
    }

    /// 前年がうるう年の場合は1日分多くなる。
    #[rstest]
    #[case::after_2024(2025)]
    #[case::after_2000(2001)]
    fn test_new_year_after_leap_year(#[case] year: i32) {
        let report = ChargeCalculator::new(year)
            .compute("1231 2300", "0101 0100", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 60",
                "Day 2 minutes: 60",
                "1 days, 2 hours, 0 minutes",
                "Total hours: 26.00 hours",
                "Total minutes: 999 + 561 (1560) minutes",
            ])
        );
    }

    #[test]
    fn test_new_year_counts_days_into_next_year() {
        let report = ChargeCalculator::new(YEAR)
            .compute("1230 1200", "0102 1200", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 720",
                "Day 2 minutes: 999 + 441 (1440)",
                "Day 3 minutes: 999 + 441 (1440)",
                "Day 4 minutes: 720",
                "3 days, 0 hours, 0 minutes",
                "Total hours: 72.00 hours",
                "Total minutes: 999 + 3321 (4320) minutes",
            ])
        );
    }

    /// 基準年がうるう年の場合、年越しの経過時間が負にならない。
    #[test]
    fn test_new_year_in_leap_year_over_several_days() {
        let report = ChargeCalculator::new(2028)
            .compute("1230 1200", "0102 1200", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 720",
                "Day 2 minutes: 999 + 441 (1440)",
                "Day 3 minutes: 999 + 441 (1440)",
                "Day 4 minutes: 720",
                "3 days, 0 hours, 0 minutes",
                "Total hours: 72.00 hours",
                "Total minutes: 999 + 3321 (4320) minutes",
            ])
        );
    }

    #[test]
    fn test_new_year_after_leap_year_over_several_days() {
        let report = ChargeCalculator::new(2025)
            .compute("1230 1200", "0102 1200", true)
            .unwrap();

        assert_eq!(
            report.to_string(),
            lines(&[
                "Day 1 minutes: 720",
                "Day 2 minutes: 999 + 441 (1440)",
                "Day 3 minutes: 999 + 441 (1440)",
                "Day 4 minutes: 720",
                "4 days, 0 hours, 0 minutes",
                "Total hours: 96.00 hours",
                "Total minutes: 999 + 4761 (5760) minutes",
            ])
        );
    }

    #[test]
    fn test_idempotent() {
        let calculator = ChargeCalculator::new(YEAR);
        let first = calculator.compute("1230 1200", "0102 1200", true).unwrap();
        let second = calculator.compute("1230 1200", "0102 1200", true).unwrap();

        assert_eq!(first.to_string(), second.to_string());
    }

    /// 範囲外の月日でも1日の課金なら繰り上げて計算する。
    #[test]
    fn test_single_day_out_of_range_date() {
        let report = ChargeCalculator::new(YEAR)
            .compute("0230 0800", "0230 0900", false)
            .unwrap();

        assert_eq!(report.to_string(), "Total minutes: 60 minutes\n");
    }

    #[rstest]
    #[case::empty_start("", "0615 0800", false, ChargeError::Format)]
    #[case::short_stop("0615 0800", "615 0900", true, ChargeError::Format)]
    #[case::letter("0615 0800", "0615 09a0", false, ChargeError::Format)]
    #[case::format_before_separator("0615-0800", "0615 09a0", false, ChargeError::Format)]
    #[case::separator("0615-0800", "0615 0900", false, ChargeError::Calculation)]
    #[case::nonexistent_start_date("0230 0800", "0301 0800", true, ChargeError::Calculation)]
    #[case::nonexistent_month("1301 0000", "1302 0000", true, ChargeError::Calculation)]
    #[case::nonexistent_stop_date("0615 0800", "0631 0800", true, ChargeError::Calculation)]
    fn test_compute_error(
        #[case] start: &str,
        #[case] stop: &str,
        #[case] multi_day: bool,
        #[case] expected: ChargeError,
    ) {
        let result = ChargeCalculator::new(YEAR).compute(start, stop, multi_day);

        assert_eq!(result.unwrap_err(), expected);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ChargeError::Format.to_string(),
            "Invalid entry! Entries must be in the form of MMdd or HHmm"
        );
        assert_eq!(
            ChargeError::Calculation.to_string(),
            "Invalid calculation in date/times"
        );
    }

    #[test]
    fn test_request_multi_day_flag() {
        let request = ChargeRequest::new("0615 0800", "0616 0800", true).unwrap();

        assert!(request.is_multi_day());
    }
}
