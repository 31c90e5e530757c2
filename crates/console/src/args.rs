//! Command-line parsing.
//!
//! ```text
//! marches-console whoami
//! marches-console dashboard
//! marches-console contracts [status] [sort]
//! marches-console watch
//! ```

use marches_core::filtering::{SortKey, ALL};
use marches_core::status::ContractStatus;

pub const USAGE: &str = "usage: marches-console <whoami | dashboard | contracts [status] [sort] | watch>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    WhoAmI,
    Dashboard,
    Contracts {
        /// `None` lists every status.
        status: Option<ContractStatus>,
        sort: SortKey,
    },
    Watch,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("missing command\n{USAGE}")]
    MissingCommand,

    #[error("unknown command '{0}'\n{USAGE}")]
    UnknownCommand(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("unexpected argument '{0}'\n{USAGE}")]
    Unexpected(String),
}

impl Command {
    /// Parse arguments, program name excluded.
    pub fn parse<I, S>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let (name, rest) = args.split_first().ok_or(ArgsError::MissingCommand)?;

        let command = match name.as_str() {
            "whoami" => Command::WhoAmI,
            "dashboard" => Command::Dashboard,
            "watch" => Command::Watch,
            "contracts" => {
                let status = match rest.first().map(String::as_str) {
                    None | Some(ALL) => None,
                    Some(label) => Some(
                        label
                            .parse()
                            .map_err(|e: marches_core::error::CoreError| {
                                ArgsError::InvalidValue(e.to_string())
                            })?,
                    ),
                };
                let sort = match rest.get(1) {
                    None => SortKey::default(),
                    Some(raw) => raw
                        .parse()
                        .map_err(|e: marches_core::error::CoreError| {
                            ArgsError::InvalidValue(e.to_string())
                        })?,
                };
                if let Some(extra) = rest.get(2) {
                    return Err(ArgsError::Unexpected(extra.clone()));
                }
                return Ok(Command::Contracts { status, sort });
            }
            other => return Err(ArgsError::UnknownCommand(other.to_string())),
        };

        match rest.first() {
            Some(extra) => Err(ArgsError::Unexpected(extra.clone())),
            None => Ok(command),
        }
    }
}
