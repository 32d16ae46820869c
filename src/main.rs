mod checks;
mod commands;
mod core;
mod inspect;
mod release;
mod store;
mod ui;

use clap::Parser;
use crate::core::context::Options;
use crate::core::error::{ExitCode, PublishError, print_error};
use env_logger::Env;

/// Verify, tag and publish a release of the debugger module
#[derive(Parser)]
#[command(name = "dmod-release")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Also point the remote `latest` object at this release
  #[arg(short = 'l', long)]
  latest: bool,
}

impl Cli {
  fn options(&self) -> Options {
    Options {
      update_latest: self.latest,
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) if e.use_stderr() => {
      let _ = e.print();
      std::process::exit(ExitCode::Usage.as_i32());
    }
    // --help / --version
    Err(e) => e.exit(),
  };

  if let Err(err) = commands::run_publish(cli.options()) {
    handle_error(err);
  }
}

fn handle_error(err: PublishError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
