use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};

const MILLIS_PER_MINUTE: i64 = 60 * 1000;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
const MINUTES_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;
/// 合計時間の小数点以下の桁数。
const HOURS_SCALE: u32 = 2;

/// 開始から終了までの経過時間を日、時間、分に分解したもの。
///
/// 経過時間が負の場合は各要素も負になる (0方向への切り捨て)。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elapsed {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl Elapsed {
    /// 経過時間を分解する。
    pub fn from_duration(diff: Duration) -> Self {
        let millis = diff.num_milliseconds();

        Self {
            days: millis / MILLIS_PER_DAY,
            hours: millis / MILLIS_PER_HOUR % HOURS_PER_DAY,
            minutes: millis / MILLIS_PER_MINUTE % MINUTES_PER_HOUR,
        }
    }

    /// 合計の分数を返す。
    pub fn total_minutes(&self) -> i64 {
        (self.days * HOURS_PER_DAY + self.hours) * MINUTES_PER_HOUR + self.minutes
    }

    /// 合計の時間数を小数点以下2桁に四捨五入して返す。
    pub fn total_hours(&self) -> Decimal {
        let hours = Decimal::from(self.days * HOURS_PER_DAY + self.hours)
            + Decimal::from(self.minutes) / Decimal::from(MINUTES_PER_HOUR);
        let mut rounded =
            hours.round_dp_with_strategy(HOURS_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(HOURS_SCALE);
        rounded
    }
}
