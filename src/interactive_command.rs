use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::charge::ChargeCalculator;
use crate::config::ReferenceYear;
use crate::console::{ConsoleText, ReportPresenter};
use crate::datetime::Clock;
use crate::entry::{parse_date_field, parse_time_field, ChargeEntry};

/// 入力欄の種類。
#[derive(Clone, Copy, Debug)]
enum Field {
    StartDate,
    StartTime,
    StopDate,
    StopTime,
}

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::StartDate => "Start date (MMdd)",
            Field::StartTime => "Start time (HHmm)",
            Field::StopDate => "Stop date (MMdd)",
            Field::StopTime => "Stop time (HHmm)",
        }
    }

    fn missing_message(&self) -> &'static str {
        match self {
            Field::StartDate => "Please enter the start date",
            Field::StartTime => "Please enter the start time",
            Field::StopDate => "Please enter the stop date",
            Field::StopTime => "Please enter the stop time",
        }
    }

    fn parse(&self, s: &str) -> Result<String> {
        match self {
            Field::StartDate | Field::StopDate => parse_date_field(s),
            Field::StartTime | Field::StopTime => parse_time_field(s),
        }
    }
}

/// 標準入力から課金の開始と終了を繰り返し受け付けるサブコマンド。
///
/// 入力が終わるか、続けないと答えるまで計算を繰り返す。
pub struct InteractiveCommand<'a, C: Clock, R: BufRead, W: Write> {
    clock: &'a C,
    reference_year: ReferenceYear,
    reader: R,
    writer: &'a mut W,
}

impl<'a, C: Clock, R: BufRead, W: Write> InteractiveCommand<'a, C, R, W> {
    /// 新しい`InteractiveCommand`を返す。
    pub fn new(clock: &'a C, reference_year: ReferenceYear, reader: R, writer: &'a mut W) -> Self {
        Self {
            clock,
            reference_year,
            reader,
            writer,
        }
    }

    /// `interactive`サブコマンドの処理を行う。
    ///
    /// 計算できなかった場合はエラーを表示し、入力をすべてやり直す。
    pub fn run(&mut self) -> Result<()> {
        loop {
            let entry = match self.read_entry()? {
                Some(entry) => entry,
                None => break,
            };

            self.calculate(&entry)?;

            match self.ask_yes_no("Calculate another? [y/N]: ")? {
                Some(true) => continue,
                _ => break,
            }
        }
        info!("Interactive session finished.");

        Ok(())
    }

    /// 1回分の入力を受け付ける。入力が終わった場合は`None`を返す。
    fn read_entry(&mut self) -> Result<Option<ChargeEntry>> {
        let multi_day = match self.ask_yes_no("Multi-day charge? [y/N]: ")? {
            Some(multi_day) => multi_day,
            None => return Ok(None),
        };

        let mut entry = ChargeEntry {
            multi_day,
            ..ChargeEntry::default()
        };
        let fields = if multi_day {
            vec![
                Field::StartDate,
                Field::StartTime,
                Field::StopDate,
                Field::StopTime,
            ]
        } else {
            vec![Field::StartTime, Field::StopTime]
        };

        for field in fields {
            let value = match self.read_field(field)? {
                Some(value) => value,
                None => return Ok(None),
            };
            match field {
                Field::StartDate => entry.start_date = Some(value),
                Field::StartTime => entry.start_time = value,
                Field::StopDate => entry.stop_date = Some(value),
                Field::StopTime => entry.stop_time = value,
            }
        }

        Ok(Some(entry))
    }

    /// 入力を計算し、結果かエラーを表示する。
    fn calculate(&mut self, entry: &ChargeEntry) -> Result<()> {
        let result = entry.resolve(self.clock.today()).and_then(|resolved| {
            if resolved.same_day {
                warn!("Days entered are the SAME");
                writeln!(self.writer, "Warning! Days entered are the SAME")
                    .context("Failed to write warning")?;
            }
            let year = self.reference_year.resolve(self.clock);
            let report = ChargeCalculator::new(year).calculate(&resolved.request)?;
            Ok(report)
        });

        let mut presenter = ConsoleText::new(self.writer);
        match result {
            Ok(report) => presenter.show_report(&report),
            Err(e) => {
                warn!("Failed to calculate charge: {}", e);
                presenter.show_error(&e)
            }
        }
    }

    /// 正しい形式の値が入力されるまで入力欄を繰り返し尋ねる。
    fn read_field(&mut self, field: Field) -> Result<Option<String>> {
        loop {
            let line = match self.prompt(&format!("{}: ", field.label()))? {
                Some(line) => line,
                None => return Ok(None),
            };

            if line.is_empty() {
                writeln!(self.writer, "INPUT ERROR: {}", field.missing_message())
                    .context("Failed to write input error")?;
                continue;
            }
            match field.parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.writer, "INPUT ERROR: {}", e)
                    .context("Failed to write input error")?,
            }
        }
    }

    /// y/nで答える質問を尋ねる。空の入力はnとして扱う。
    fn ask_yes_no(&mut self, question: &str) -> Result<Option<bool>> {
        let answer = self.prompt(question)?;

        Ok(answer.map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes")))
    }

    /// プロンプトを表示して1行読み込む。入力が終わった場合は`None`を返す。
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.writer, "{}", message).context("Failed to write prompt")?;
        self.writer.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }
}
