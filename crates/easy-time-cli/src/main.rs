//! easy-time - convert and tolerantly compare timestamps from the shell.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use easy_time::{ordering_sign, ConvertibleValue, EasyTime, Instant, Tolerance};
use serde::Serialize;

/// easy-time - tolerant timestamp comparison
#[derive(Parser, Debug)]
#[command(name = "easy-time")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Render results as JSON objects
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a value to a canonical timestamp
    Convert {
        /// Time text, `now`, or `@<seconds since epoch>`
        value: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Rfc3339)]
        format: OutputFormat,
    },

    /// Compare two values, printing -1, 0 or 1
    Compare {
        a: String,
        b: String,

        #[command(flatten)]
        tolerance: ToleranceArg,
    },

    /// Check whether a value lies between two bounds (inclusive)
    Between {
        value: String,
        lo: String,
        hi: String,

        #[command(flatten)]
        tolerance: ToleranceArg,
    },
}

#[derive(clap::Args, Debug)]
struct ToleranceArg {
    /// Tolerance in seconds; the library's default tolerance when unset
    #[arg(short, long, env = "EASY_TIME_TOLERANCE")]
    tolerance: Option<u64>,
}

impl ToleranceArg {
    fn get(&self) -> Tolerance {
        self.tolerance
            .map(Tolerance::seconds)
            .unwrap_or_else(easy_time::default_tolerance)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Rfc2822,
    Httpdate,
    Xmlschema,
    Iso8601,
    Rfc3339,
}

impl OutputFormat {
    fn render(self, instant: &Instant) -> String {
        match self {
            OutputFormat::Rfc2822 => instant.to_rfc2822(),
            OutputFormat::Httpdate => instant.to_httpdate(),
            OutputFormat::Xmlschema => instant.to_xmlschema(),
            OutputFormat::Iso8601 => instant.to_iso8601(3),
            OutputFormat::Rfc3339 => instant.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct ConvertOutput<'a> {
    input: &'a str,
    time: String,
    timestamp: i64,
    offset_seconds: i32,
}

#[derive(Serialize)]
struct CompareOutput<'a> {
    a: &'a str,
    b: &'a str,
    tolerance_seconds: u64,
    ordering: i8,
}

#[derive(Serialize)]
struct BetweenOutput<'a> {
    value: &'a str,
    lo: &'a str,
    hi: &'a str,
    tolerance_seconds: u64,
    between: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { value, format } => {
            let instant = easy_time::convert(input_value(&value)?)
                .with_context(|| format!("Failed to convert '{value}'"))?;
            let time = format.render(&instant);
            if cli.json {
                print_json(&ConvertOutput {
                    input: &value,
                    time,
                    timestamp: instant.timestamp(),
                    offset_seconds: instant.offset().local_minus_utc(),
                })?;
            } else {
                println!("{time}");
            }
        }
        Commands::Compare { a, b, tolerance } => {
            let tolerance = tolerance.get();
            let ordering = EasyTime::new(input_value(&a)?, None)
                .with_context(|| format!("Failed to convert '{a}'"))?
                .compare(input_value(&b)?, Some(tolerance))
                .with_context(|| format!("Failed to convert '{b}'"))?;
            let sign = ordering_sign(ordering);
            if cli.json {
                print_json(&CompareOutput {
                    a: &a,
                    b: &b,
                    tolerance_seconds: tolerance.as_secs(),
                    ordering: sign,
                })?;
            } else {
                println!("{sign}");
            }
        }
        Commands::Between {
            value,
            lo,
            hi,
            tolerance,
        } => {
            let tolerance = tolerance.get();
            let between = easy_time::between(
                input_value(&value)?,
                input_value(&lo)?,
                input_value(&hi)?,
                Some(tolerance),
            )
            .context("Failed to convert arguments")?;
            if cli.json {
                print_json(&BetweenOutput {
                    value: &value,
                    lo: &lo,
                    hi: &hi,
                    tolerance_seconds: tolerance.as_secs(),
                    between,
                })?;
            } else {
                println!("{between}");
            }
        }
    }

    Ok(())
}

/// Map a command-line argument to a convertible value.
///
/// `now` is the current time and `@<secs>` is seconds since the epoch;
/// anything else is time text.
fn input_value(arg: &str) -> Result<ConvertibleValue> {
    if arg.eq_ignore_ascii_case("now") {
        return Ok(ConvertibleValue::Absent);
    }
    if let Some(secs) = arg.strip_prefix('@') {
        let secs: f64 = secs
            .trim()
            .parse()
            .with_context(|| format!("Invalid epoch seconds '{arg}'"))?;
        return Ok(ConvertibleValue::Numeric(secs));
    }
    Ok(ConvertibleValue::Text(arg.to_string()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}
