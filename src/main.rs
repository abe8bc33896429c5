use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

use perfusion_charge::calc_command::{CalcArgs, CalcCommand};
use perfusion_charge::config::{Config, ReferenceYear};
use perfusion_charge::console::{ConsoleText, ReportPresenter};
use perfusion_charge::datetime::SystemClock;
use perfusion_charge::interactive_command::InteractiveCommand;

/// 人工心肺の課金時間を計算するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- calc --start-time 0800 --stop-time 1230
/// $ cargo run -- calc -m --start-date 0615 --start-time 2200 --stop-date 0616 --stop-time 0600
/// $ cargo run -- --year 2025 interactive
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(long = "config", help = "Sets a custom config file")]
    config: Option<PathBuf>,

    #[clap(
        short = 'y',
        long = "year",
        env = "PERFUSION_CHARGE_YEAR",
        help = "Sets the reference year instead of the current year"
    )]
    year: Option<i32>,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Calculates a single charge
    Calc(CalcArgs),
    /// Calculates charges entered line by line
    Interactive,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(year) = args.year {
        config.reference_year = ReferenceYear::Fixed(year);
    }
    setup_logger(config.log_level()?)?;

    let clock = SystemClock;
    match args.subcommand {
        SubCommands::Calc(calc) => {
            let command = CalcCommand::new(&clock, config.reference_year);
            match command.run(calc) {
                Ok(report) => ConsoleText::new(&mut io::stdout().lock()).show_report(&report)?,
                Err(e) => {
                    ConsoleText::new(&mut io::stderr().lock()).show_error(&e)?;
                    process::exit(1);
                }
            }
        }
        SubCommands::Interactive => {
            let stdin = io::stdin().lock();
            let mut stdout = io::stdout().lock();
            let mut command =
                InteractiveCommand::new(&clock, config.reference_year, stdin, &mut stdout);
            command.run()?;
        }
    }

    Ok(())
}

/// ログの出力先を標準エラー出力に設定する。
fn setup_logger(level: LevelFilter) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("Failed to set up logger")?;

    Ok(())
}
