use checkcode_core::DEFAULT_ALPHABET;
use checkcode_generator::DEFAULT_MAX_ATTEMPTS;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};

pub const SCHEME_ENV: &str = "CHECKCODE_SCHEME";
pub const ALPHABET_ENV: &str = "CHECKCODE_ALPHABET";
pub const LENGTH_ENV: &str = "CHECKCODE_LENGTH";
pub const PREFIX_ENV: &str = "CHECKCODE_PREFIX";
pub const MAX_ATTEMPTS_ENV: &str = "CHECKCODE_MAX_ATTEMPTS";
pub const GUARD_ENV: &str = "CHECKCODE_GUARD";
pub const REDIS_URL_ENV: &str = "CHECKCODE_REDIS_URL";

pub const DEFAULT_MODULAR_LENGTH: usize = 6;
pub const DEFAULT_LUHN_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    #[value(name = "modular")]
    Modular,
    #[value(name = "luhn")]
    Luhn,
}

impl Display for SchemeArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemeArg::Modular => write!(f, "modular"),
            SchemeArg::Luhn => write!(f, "luhn"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GuardBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for GuardBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardBackendArg::InMemory => write!(f, "in-memory"),
            GuardBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "checkcode", about = "Generate and validate check-character codes")]
pub struct CLI {
    #[arg(long, env = SCHEME_ENV, value_enum, default_value_t = SchemeArg::Modular)]
    pub scheme: SchemeArg,

    #[arg(long, env = ALPHABET_ENV, default_value = DEFAULT_ALPHABET)]
    pub alphabet: String,

    /// Total code length, check character included. Defaults to 6 for the
    /// modular scheme and 8 for the Luhn variant.
    #[arg(long, env = LENGTH_ENV)]
    pub length: Option<usize>,

    /// Mandatory first character of Luhn-variant codes.
    #[arg(long, env = PREFIX_ENV, required_if_eq("scheme", "luhn"))]
    pub prefix: Option<char>,

    /// Draws allowed per issued code before giving up. Must be at least 1.
    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    #[arg(long, env = GUARD_ENV, value_enum, default_value_t = GuardBackendArg::InMemory)]
    pub guard: GuardBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("guard", "redis"))]
    pub redis_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl CLI {
    pub fn code_length(&self) -> usize {
        self.length.unwrap_or(match self.scheme {
            SchemeArg::Modular => DEFAULT_MODULAR_LENGTH,
            SchemeArg::Luhn => DEFAULT_LUHN_LENGTH,
        })
    }

    /// Redis key prefix for this code space, so differently configured
    /// schemes sharing one server never block each other's codes.
    pub fn guard_namespace(&self) -> String {
        match (self.scheme, self.prefix) {
            (SchemeArg::Luhn, Some(prefix)) => format!(
                "cc:{}:{}:{}:{}:",
                self.scheme,
                self.code_length(),
                prefix,
                self.alphabet
            ),
            _ => format!("cc:{}:{}:{}:", self.scheme, self.code_length(), self.alphabet),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print how many distinct codes the configuration allows.
    Space,
    /// Issue new codes, never repeating one the guard has seen.
    Generate {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Print a JSON document instead of one code per line.
        #[arg(long)]
        json: bool,
    },
    /// Check codes and print the reason for each rejection.
    Validate {
        #[arg(required = true)]
        codes: Vec<String>,

        /// Trim surrounding whitespace and upper-case input before checking.
        #[arg(long)]
        normalize: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_modular_in_memory() {
        let cli = CLI::try_parse_from(["checkcode", "space"]).unwrap();
        assert_eq!(cli.scheme, SchemeArg::Modular);
        assert_eq!(cli.guard, GuardBackendArg::InMemory);
        assert_eq!(cli.alphabet, DEFAULT_ALPHABET);
        assert_eq!(cli.code_length(), 6);
        assert_eq!(cli.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert!(matches!(cli.command, Command::Space));
    }

    #[test]
    fn luhn_requires_prefix() {
        let err = CLI::try_parse_from(["checkcode", "--scheme", "luhn", "space"]);
        assert!(err.is_err());

        let cli =
            CLI::try_parse_from(["checkcode", "--scheme", "luhn", "--prefix", "V", "space"])
                .unwrap();
        assert_eq!(cli.prefix, Some('V'));
        assert_eq!(cli.code_length(), 8);
    }

    #[test]
    fn redis_guard_requires_url() {
        let err = CLI::try_parse_from(["checkcode", "--guard", "redis", "generate"]);
        assert!(err.is_err());

        let cli = CLI::try_parse_from([
            "checkcode",
            "--guard",
            "redis",
            "--redis-url",
            "redis://127.0.0.1:6379",
            "generate",
            "-n",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.guard, GuardBackendArg::Redis);
        assert!(matches!(
            cli.command,
            Command::Generate {
                count: 5,
                json: false
            }
        ));
    }

    #[test]
    fn validate_needs_at_least_one_code() {
        assert!(CLI::try_parse_from(["checkcode", "validate"]).is_err());

        let cli = CLI::try_parse_from(["checkcode", "validate", "23468F", "23468G"]).unwrap();
        match cli.command {
            Command::Validate { codes, normalize } => {
                assert_eq!(codes, vec!["23468F", "23468G"]);
                assert!(!normalize);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        assert!(CLI::try_parse_from(["checkcode", "--max-attempts", "0", "generate"]).is_err());

        let cli = CLI::try_parse_from(["checkcode", "--max-attempts", "1", "generate"]).unwrap();
        assert_eq!(cli.max_attempts, 1);
    }

    #[test]
    fn guard_namespace_separates_code_spaces() {
        let modular = CLI::try_parse_from(["checkcode", "space"]).unwrap();
        assert_eq!(
            modular.guard_namespace(),
            format!("cc:modular:6:{DEFAULT_ALPHABET}:")
        );

        let luhn =
            CLI::try_parse_from(["checkcode", "--scheme", "luhn", "--prefix", "V", "space"])
                .unwrap();
        assert_eq!(
            luhn.guard_namespace(),
            format!("cc:luhn:8:V:{DEFAULT_ALPHABET}:")
        );

        let other_prefix =
            CLI::try_parse_from(["checkcode", "--scheme", "luhn", "--prefix", "W", "space"])
                .unwrap();
        let longer = CLI::try_parse_from(["checkcode", "--length", "7", "space"]).unwrap();
        assert_ne!(luhn.guard_namespace(), other_prefix.guard_namespace());
        assert_ne!(modular.guard_namespace(), longer.guard_namespace());
    }

    #[test]
    fn explicit_length_wins() {
        let cli = CLI::try_parse_from(["checkcode", "--length", "10", "space"]).unwrap();
        assert_eq!(cli.code_length(), 10);
    }
}
