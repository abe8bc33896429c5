use std::io::Write;

use anyhow::{Context, Error, Result};

use crate::charge::ChargeError;
use crate::report::ChargeReport;

/// Consoleに計算結果を表示するためのtrait。
pub trait ReportPresenter {
    /// 計算結果を表示する。
    ///
    /// # Arguments
    ///
    /// * `report` - 表示する計算結果
    fn show_report(&mut self, report: &ChargeReport) -> Result<()>;

    /// 計算できなかったことを表示する。
    ///
    /// 計算のエラーは`COMPUTATIONAL ERROR`、入力のエラーは`INPUT ERROR`として表示する。
    fn show_error(&mut self, error: &Error) -> Result<()>;
}

/// 計算結果をそのままのテキストで表示する。
pub struct ConsoleText<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleText<'a, W> {
    /// 新しい`ConsoleText`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ReportPresenter for ConsoleText<'a, W> {
    fn show_report(&mut self, report: &ChargeReport) -> Result<()> {
        write!(self.writer, "{}", report)
            .with_context(|| format!("Failed to write report: {:?}", report))?;
        self.writer.flush().context("Failed to flush report")?;

        Ok(())
    }

    fn show_error(&mut self, error: &Error) -> Result<()> {
        let title = if error.downcast_ref::<ChargeError>().is_some() {
            "COMPUTATIONAL ERROR"
        } else {
            "INPUT ERROR"
        };
        writeln!(self.writer, "{}: {}", title, error).context("Failed to write error")?;

        Ok(())
    }
}
