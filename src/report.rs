use std::fmt;

use crate::elapsed::Elapsed;

/// 課金システムに1回で入力できる分数の上限。
const MAX_ENTRY_MINUTES: i64 = 999;

/// 上限を超える分数を"999 + 残り (合計)"の形に分割する。
pub fn split_minutes(minutes: i64) -> String {
    if minutes > MAX_ENTRY_MINUTES {
        format!(
            "{} + {} ({})",
            MAX_ENTRY_MINUTES,
            minutes - MAX_ENTRY_MINUTES,
            minutes
        )
    } else {
        minutes.to_string()
    }
}

/// 課金時間の計算結果。
///
/// `Display`で各行が改行で終わるテキストとして出力される。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChargeReport {
    /// 1日の課金。合計分数のみを表示する。
    SingleDay { total_minutes: i64 },
    /// 複数日の課金。日毎の分数と合計を表示する。
    MultiDay {
        day_minutes: Vec<i64>,
        elapsed: Elapsed,
    },
}

impl fmt::Display for ChargeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeReport::SingleDay { total_minutes } => {
                writeln!(f, "Total minutes: {} minutes", split_minutes(*total_minutes))
            }
            ChargeReport::MultiDay {
                day_minutes,
                elapsed,
            } => {
                for (index, minutes) in day_minutes.iter().enumerate() {
                    writeln!(f, "Day {} minutes: {}", index + 1, split_minutes(*minutes))?;
                }
                writeln!(
                    f,
                    "{} days, {} hours, {} minutes",
                    elapsed.days, elapsed.hours, elapsed.minutes
                )?;
                writeln!(f, "Total hours: {} hours", elapsed.total_hours())?;
                writeln!(
                    f,
                    "Total minutes: {} minutes",
                    split_minutes(elapsed.total_minutes())
                )
            }
        }
    }
}
