use anyhow::Result;
use log::{info, warn};

use crate::charge::ChargeCalculator;
use crate::config::ReferenceYear;
use crate::datetime::Clock;
use crate::entry::{parse_date_field, parse_time_field, ChargeEntry};
use crate::report::ChargeReport;

/// 1回分の課金時間を計算するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct CalcArgs {
    #[clap(
        long = "start-date",
        help = "Sets the start date in the format MMdd (multi-day only)",
        parse(try_from_str = parse_date_field),
    )]
    start_date: Option<String>,

    #[clap(
        long = "start-time",
        help = "Sets the start time in the format HHmm",
        parse(try_from_str = parse_time_field),
    )]
    start_time: String,

    #[clap(
        long = "stop-date",
        help = "Sets the stop date in the format MMdd (multi-day only)",
        parse(try_from_str = parse_date_field),
    )]
    stop_date: Option<String>,

    #[clap(
        long = "stop-time",
        help = "Sets the stop time in the format HHmm",
        parse(try_from_str = parse_time_field),
    )]
    stop_time: String,

    #[clap(short = 'm', long = "multi-day", help = "Splits the charge by day")]
    multi_day: bool,
}

impl From<CalcArgs> for ChargeEntry {
    fn from(args: CalcArgs) -> Self {
        Self {
            start_date: args.start_date,
            start_time: args.start_time,
            stop_date: args.stop_date,
            stop_time: args.stop_time,
            multi_day: args.multi_day,
        }
    }
}

pub struct CalcCommand<'a, C: Clock> {
    clock: &'a C,
    reference_year: ReferenceYear,
}

impl<'a, C: Clock> CalcCommand<'a, C> {
    /// 新しい`CalcCommand`を返す。
    ///
    /// # Arguments
    /// * `clock` - 今日の日付と基準年を決めるための時計
    /// * `reference_year` - 基準年の決め方
    pub fn new(clock: &'a C, reference_year: ReferenceYear) -> Self {
        Self {
            clock,
            reference_year,
        }
    }

    /// `calc`サブコマンドの処理を行う。
    ///
    /// 1日の課金では今日の日付を利用する。
    /// 複数日で同じ日付が指定された場合は警告を出し、1日の課金として計算する。
    pub fn run(&self, args: CalcArgs) -> Result<ChargeReport> {
        let entry = ChargeEntry::from(args);
        let resolved = entry.resolve(self.clock.today())?;
        if resolved.same_day {
            warn!("Days entered are the SAME");
        }

        let year = self.reference_year.resolve(self.clock);
        info!("Reference year: {}, Request: {:?}", year, resolved.request);

        let report = ChargeCalculator::new(year).calculate(&resolved.request)?;
        info!("Charge calculated successfully.");

        Ok(report)
    }
}
