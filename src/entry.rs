use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::charge::ChargeRequest;

/// 日付や時刻の入力欄の桁数。
const FIELD_LENGTH: usize = 4;

/// 入力欄が4桁の数字かどうかを判定する。
pub fn is_proper_field(field: &str) -> bool {
    field.len() == FIELD_LENGTH && field.chars().all(|c| c.is_ascii_digit())
}

/// 日付の入力欄 (MMdd) をパースする。
pub fn parse_date_field(s: &str) -> Result<String> {
    let field = s.trim();
    if !is_proper_field(field) {
        bail!("Invalid Date Format! Must be MMdd");
    }

    Ok(field.to_string())
}

/// 時刻の入力欄 (HHmm) をパースする。
pub fn parse_time_field(s: &str) -> Result<String> {
    let field = s.trim();
    if !is_proper_field(field) {
        bail!("Invalid Time Format! Must be HHmm");
    }

    Ok(field.to_string())
}

/// 入力された課金の開始と終了。
///
/// 1日の課金では日付は利用せず、今日の日付を利用する。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChargeEntry {
    pub start_date: Option<String>,
    pub start_time: String,
    pub stop_date: Option<String>,
    pub stop_time: String,
    pub multi_day: bool,
}

/// 入力から作成した計算要求。
#[derive(Debug)]
pub struct ResolvedEntry {
    pub request: ChargeRequest,
    /// 複数日で同じ日付が入力されたため、1日の課金として扱ったかどうか。
    pub same_day: bool,
}

impl ChargeEntry {
    /// 入力から計算要求を作成する。
    ///
    /// # Arguments
    ///
    /// * `today` - 1日の課金で利用する今日の日付
    pub fn resolve(&self, today: NaiveDate) -> Result<ResolvedEntry> {
        if self.start_time.is_empty() || self.stop_time.is_empty() {
            bail!("Please provide ALL dates and times!");
        }

        let (start_date, stop_date, multi_day, same_day) = if self.multi_day {
            match (&self.start_date, &self.stop_date) {
                (Some(start_date), Some(stop_date))
                    if !start_date.is_empty() && !stop_date.is_empty() =>
                {
                    let same_day = start_date == stop_date;
                    (start_date.clone(), stop_date.clone(), !same_day, same_day)
                }
                _ => bail!("Please provide ALL dates and times!"),
            }
        } else {
            let today = today.format("%m%d").to_string();
            (today.clone(), today, false, false)
        };

        let request = ChargeRequest::new(
            &format!("{} {}", start_date, self.start_time),
            &format!("{} {}", stop_date, self.stop_time),
            multi_day,
        )?;

        Ok(ResolvedEntry { request, same_day })
    }
}
