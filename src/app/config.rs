use std::{fmt, str::FromStr, time::Duration};

use crate::carver::{CarveConfig, DEFAULT_MAX_STEPS};

pub const USAGE: &str = "\
Usage: fieldroad [OPTIONS]

Options:
  --width N            Field width in tiles (default 25)
  --height N           Field height in tiles (default 20)
  --seed N             Seed of the first level; later levels count up from it (default: random)
  --max-steps N        Direction draws before the road is forced straight down (default 10000000)
  --paint-delay-ms N   Pause after each painted tile (default 10)
  --level-delay-ms N   Pause between levels when running forever (default 500)
  --forever            Keep carving new levels until Esc is pressed
  --no-visualize       Hide the search, only paint the finished road
  --headless           Print finished fields to stdout instead of animating
  --log-level LEVEL    trace, debug, info, warn or error (default info)
  -h, --help           Show this message";

/// Settings for the `fieldroad` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: u16,
    pub height: u16,
    pub seed: Option<u64>,
    pub max_steps: u64,
    /// Pause after each tile change while animating
    pub paint_delay: Duration,
    /// Pause between levels in forever mode
    pub level_delay: Duration,
    pub forever: bool,
    /// Animate the search itself, including backtracking
    pub visualize: bool,
    pub headless: bool,
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 25,
            height: 20,
            seed: None,
            max_steps: DEFAULT_MAX_STEPS,
            paint_delay: Duration::from_millis(10),
            level_delay: Duration::from_millis(500),
            forever: false,
            visualize: true,
            headless: false,
            log_level: tracing::Level::INFO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    HelpRequested,
    UnknownFlag(String),
    MissingValue(String),
    InvalidValue { flag: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HelpRequested => write!(f, "help requested"),
            ConfigError::UnknownFlag(flag) => write!(f, "unknown option '{}'", flag),
            ConfigError::MissingValue(flag) => write!(f, "option '{}' needs a value", flag),
            ConfigError::InvalidValue { flag, value } => {
                write!(f, "invalid value '{}' for option '{}'", value, flag)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parses command line options, without the executable name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                "--forever" => config.forever = true,
                "--no-visualize" => config.visualize = false,
                "--headless" => config.headless = true,
                "--width" => config.width = parse_value(&flag, args.next())?,
                "--height" => config.height = parse_value(&flag, args.next())?,
                "--seed" => config.seed = Some(parse_value(&flag, args.next())?),
                "--max-steps" => config.max_steps = parse_value(&flag, args.next())?,
                "--paint-delay-ms" => {
                    config.paint_delay = Duration::from_millis(parse_value(&flag, args.next())?)
                }
                "--level-delay-ms" => {
                    config.level_delay = Duration::from_millis(parse_value(&flag, args.next())?)
                }
                "--log-level" => config.log_level = parse_value(&flag, args.next())?,
                _ => return Err(ConfigError::UnknownFlag(flag)),
            }
        }
        Ok(config)
    }

    /// Carver settings for a single level.
    pub fn carve_config(&self, seed: u64) -> CarveConfig {
        CarveConfig::new(seed, self.width, self.height).with_max_steps(self.max_steps)
    }
}

fn parse_value<T: FromStr>(flag: &str, value: Option<String>) -> Result<T, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        Config::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!((config.width, config.height), (25, 20));
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
        assert!(config.visualize);
        assert!(!config.forever);
    }

    #[test]
    fn test_parse_all_options() {
        let config = parse(&[
            "--width",
            "40",
            "--height",
            "30",
            "--seed",
            "42",
            "--max-steps",
            "1000",
            "--paint-delay-ms",
            "0",
            "--level-delay-ms",
            "250",
            "--forever",
            "--no-visualize",
            "--headless",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!((config.width, config.height), (40, 30));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_steps, 1000);
        assert_eq!(config.paint_delay, Duration::ZERO);
        assert_eq!(config.level_delay, Duration::from_millis(250));
        assert!(config.forever && config.headless && !config.visualize);
        assert_eq!(config.log_level, tracing::Level::DEBUG);

        let carve = config.carve_config(7);
        assert_eq!(carve.seed, 7);
        assert_eq!(carve.max_steps, 1000);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(&["--help"]), Err(ConfigError::HelpRequested));
        assert_eq!(
            parse(&["--bogus"]),
            Err(ConfigError::UnknownFlag("--bogus".to_string()))
        );
        assert_eq!(
            parse(&["--width"]),
            Err(ConfigError::MissingValue("--width".to_string()))
        );
        assert_eq!(
            parse(&["--height", "-3"]),
            Err(ConfigError::InvalidValue {
                flag: "--height".to_string(),
                value: "-3".to_string()
            })
        );
        assert!(matches!(
            parse(&["--log-level", "loud"]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
