//! Command-line and environment options.

use crate::CliError;

/// Environment variable holding the default worker count.
pub const THREADS_ENV: &str = "C6_THREADS";

/// Options shared by every command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverConfig {
    /// Worker threads for `check`; `0` means one per CPU.
    pub threads: usize,
}

impl DriverConfig {
    /// Split `args` into options and positional arguments.
    ///
    /// `threads_env` is the value of [`THREADS_ENV`], if set. An explicit
    /// `--threads` wins over it.
    pub fn from_args(
        args: &[String],
        threads_env: Option<&str>,
    ) -> Result<(DriverConfig, Vec<String>), CliError> {
        let mut config = DriverConfig::default();
        if let Some(value) = threads_env.filter(|v| !v.trim().is_empty()) {
            config.threads = parse_count(THREADS_ENV, value)?;
        }

        let mut positional = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = arg.strip_prefix("--threads=") {
                config.threads = parse_count("--threads", value)?;
            } else if arg == "--threads" || arg == "-j" {
                let value = iter.next().ok_or(CliError::MissingValue("--threads"))?;
                config.threads = parse_count("--threads", value)?;
            } else if arg.starts_with('-') && arg.len() > 1 {
                return Err(CliError::UnknownOption(arg.clone()));
            } else {
                positional.push(arg.clone());
            }
        }
        Ok((config, positional))
    }
}

fn parse_count(option: &'static str, value: &str) -> Result<usize, CliError> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidValue {
            option,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_threads_flag_forms() {
        let (config, files) =
            DriverConfig::from_args(&args(&["a.c6", "--threads", "3", "b.c6"]), None).unwrap();
        assert_eq!(config.threads, 3);
        assert_eq!(files, args(&["a.c6", "b.c6"]));

        let (config, _) = DriverConfig::from_args(&args(&["--threads=5"]), None).unwrap();
        assert_eq!(config.threads, 5);
    }

    #[test]
    fn test_flag_overrides_environment() {
        let (config, _) = DriverConfig::from_args(&args(&[]), Some("4")).unwrap();
        assert_eq!(config.threads, 4);
        let (config, _) = DriverConfig::from_args(&args(&["-j", "2"]), Some("4")).unwrap();
        assert_eq!(config.threads, 2);
        let (config, _) = DriverConfig::from_args(&args(&[]), Some("  ")).unwrap();
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn test_bad_options() {
        let err = DriverConfig::from_args(&args(&["--threads"]), None).unwrap_err();
        assert_eq!(err.to_string(), "missing value for `--threads`");
        let err = DriverConfig::from_args(&args(&["--threads=many"]), None).unwrap_err();
        assert_eq!(err.to_string(), "invalid value `many` for `--threads`");
        let err = DriverConfig::from_args(&args(&[]), Some("x")).unwrap_err();
        assert_eq!(err.to_string(), "invalid value `x` for `C6_THREADS`");
        let err = DriverConfig::from_args(&args(&["--fast"]), None).unwrap_err();
        assert_eq!(err.to_string(), "unknown option `--fast`");
    }
}
