use std::{io::BufRead, path::PathBuf, process::ExitCode};

use eyre::{bail, WrapErr};
use structopt::StructOpt;
use tracing::{debug, metadata::LevelFilter};
use tracing_subscriber::EnvFilter;

use common::{Config, HashRange};
use validator::BreachChecker;

mod shell;

#[derive(Debug, StructOpt)]
#[structopt(name = "pwned", about = "check passwords against a breach corpus, sending only a hash prefix")]
struct Opt {
    /// TOML config file, `pwned.toml` is used when present
    #[structopt(short, long, parse(from_os_str), env = "PWNED_VALIDATOR_CONFIG")]
    config: Option<PathBuf>,

    /// request timeout in seconds
    #[structopt(long, env = "PWNED_VALIDATOR_TIMEOUT")]
    timeout: Option<f64>,

    /// pass passwords that could not be checked (true) or reject them (false)
    #[structopt(long, env = "PWNED_VALIDATOR_FAIL_SAFE")]
    fail_safe: Option<bool>,

    /// range url template, must contain {password}
    #[structopt(long, env = "PWNED_VALIDATOR_URL")]
    url: Option<String>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// validate a password, exits with 1 when it is rejected
    Check { password: Option<String> },
    /// print how many times a password was seen in breaches
    Count { password: Option<String> },
    /// print the range url a password would be checked against, without querying it
    Url { password: Option<String> },
    /// print the help text shown next to password fields
    HelpText,
    /// check passwords interactively, one per line
    Shell,
}

fn setup_logger() -> eyre::Result<()> {
    let filter = EnvFilter::from_default_env()
        // Set the base level when not matched by other directives to WARN.
        .add_directive(LevelFilter::WARN.into())
        .add_directive("common=debug".parse()?)
        .add_directive("validator=debug".parse()?)
        .add_directive("pwned=trace".parse()?);

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("setting default subscriber failed")?;

    Ok(())
}

impl Opt {
    fn load_config(&self) -> eyre::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None if std::path::Path::new(common::consts::CONFIG_PATH).exists() => Config::load(common::consts::CONFIG_PATH)?,
            None => Config::default(),
        };

        if let Some(secs) = self.timeout {
            config = config.with_timeout_secs(secs)?;
        }
        if let Some(fail_safe) = self.fail_safe {
            config.fail_safe = fail_safe;
        }
        if let Some(url) = &self.url {
            config.url = url.clone();
        }

        debug!("config: {:?}", config);
        Ok(config)
    }
}

// passwords on the command line end up in the shell history, so stdin is accepted too
fn password_or_stdin(password: Option<String>) -> eyre::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).wrap_err("failed to read password from stdin")? == 0 {
        bail!("no password given");
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_owned())
}

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    setup_logger()?;

    let opt = Opt::from_args();
    let checker = BreachChecker::new(opt.load_config()?)?;

    match opt.command {
        Command::Check { password } => {
            let password = password_or_stdin(password)?;
            match checker.validate(&password, None) {
                Ok(()) => println!("ok"),
                Err(e) => {
                    println!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Count { password } => {
            let password = password_or_stdin(password)?;
            let count = checker.breach_count(&password)?;
            println!("{}", count.unwrap_or(0));
        }
        Command::Url { password } => {
            let password = password_or_stdin(password)?;
            println!("{}", checker.get_url(HashRange::of(&password).prefix()));
        }
        Command::HelpText => println!("{}", checker.help_text()),
        Command::Shell => shell::run(&checker)?,
    }

    Ok(ExitCode::SUCCESS)
}
