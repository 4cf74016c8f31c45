// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line and environment configuration for the `mindmap` shell.
//!
//! Flags win over environment variables; environment variables win over defaults.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::model::{IdError, NodeId, RecordId};
use crate::store::{WriteDurability, DEFAULT_COLLECTION};

pub const ENV_STORE_DIR: &str = "MINDMAP_STORE_DIR";
pub const ENV_COLLECTION: &str = "MINDMAP_COLLECTION";
pub const ENV_TIMEOUT_MS: &str = "MINDMAP_TIMEOUT_MS";

pub const DEFAULT_STORE_DIR: &str = ".mindmap";
pub const DEFAULT_DIAGRAM_NAME: &str = "My Mind Map";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    New { name: String },
    Show { id: RecordId },
    Demo { name: String },
    Rename { id: RecordId, node_id: NodeId, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_dir: PathBuf,
    pub collection: String,
    /// `None` waits for the store indefinitely.
    pub request_timeout: Option<Duration>,
    pub durability: WriteDurability,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingCommand,
    UnknownCommand { command: String },
    UnknownFlag { flag: String },
    DuplicateFlag { flag: &'static str },
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, argument: &'static str },
    UnexpectedArgument { argument: String },
    InvalidTimeout { source: &'static str, value: String },
    InvalidCollection { value: String },
    InvalidId { argument: &'static str, value: String, reason: IdError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCommand => f.write_str("missing command"),
            Self::UnknownCommand { command } => write!(f, "unknown command: {command}"),
            Self::UnknownFlag { flag } => write!(f, "unknown flag: {flag}"),
            Self::DuplicateFlag { flag } => write!(f, "flag given more than once: {flag}"),
            Self::MissingValue { flag } => write!(f, "missing value for {flag}"),
            Self::MissingArgument { command, argument } => {
                write!(f, "`{command}` requires <{argument}>")
            }
            Self::UnexpectedArgument { argument } => write!(f, "unexpected argument: {argument}"),
            Self::InvalidTimeout { source, value } => {
                write!(f, "invalid timeout in {source}: {value:?} (expected milliseconds)")
            }
            Self::InvalidCollection { value } => write!(f, "invalid collection name: {value:?}"),
            Self::InvalidId {
                argument,
                value,
                reason,
            } => write!(f, "invalid <{argument}> {value:?}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} [options] list\n  {program} [options] new [<name>]\n  {program} [options] show <id>\n  {program} [options] demo <name>\n  {program} [options] rename <id> <node-id> <label>\n\nOptions:\n  --store <dir>         record folder (env {ENV_STORE_DIR}, default {DEFAULT_STORE_DIR})\n  --collection <name>   collection folder (env {ENV_COLLECTION}, default {DEFAULT_COLLECTION})\n  --timeout-ms <ms>     per-request timeout, 0 disables (env {ENV_TIMEOUT_MS})\n  --durable-writes      fsync record files and their folder\n\nLog verbosity follows RUST_LOG (default info)."
    )
}

/// Reads the process arguments (without the program name) and environment.
pub fn from_env(args: impl Iterator<Item = String>) -> Result<Config, ConfigError> {
    parse_config(args, |key| std::env::var(key).ok())
}

pub fn parse_config(
    mut args: impl Iterator<Item = String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut store_dir = None;
    let mut collection = None;
    let mut timeout = None;
    let mut durable_writes = false;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--store" => {
                set_once(&mut store_dir, "--store", flag_value(&mut args, "--store")?)?;
            }
            "--collection" => {
                let value = flag_value(&mut args, "--collection")?;
                set_once(&mut collection, "--collection", value)?;
            }
            "--timeout-ms" => {
                let raw = flag_value(&mut args, "--timeout-ms")?;
                set_once(&mut timeout, "--timeout-ms", parse_timeout("--timeout-ms", &raw)?)?;
            }
            "--durable-writes" => {
                if durable_writes {
                    return Err(ConfigError::DuplicateFlag {
                        flag: "--durable-writes",
                    });
                }
                durable_writes = true;
            }
            _ if arg.starts_with("--") => return Err(ConfigError::UnknownFlag { flag: arg }),
            _ => positional.push(arg),
        }
    }

    let store_dir = store_dir
        .or_else(|| env(ENV_STORE_DIR).filter(|value| !value.is_empty()))
        .unwrap_or_else(|| DEFAULT_STORE_DIR.to_owned());

    let collection = collection
        .or_else(|| env(ENV_COLLECTION).filter(|value| !value.is_empty()))
        .unwrap_or_else(|| DEFAULT_COLLECTION.to_owned());
    if collection.contains(['/', '\\']) || collection.starts_with('.') {
        return Err(ConfigError::InvalidCollection { value: collection });
    }

    let request_timeout = match timeout {
        Some(timeout) => timeout,
        None => match env(ENV_TIMEOUT_MS).filter(|value| !value.is_empty()) {
            Some(raw) => parse_timeout(ENV_TIMEOUT_MS, &raw)?,
            None => None,
        },
    };

    Ok(Config {
        store_dir: PathBuf::from(store_dir),
        collection,
        request_timeout,
        durability: if durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        },
        command: parse_command(positional)?,
    })
}

fn flag_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ConfigError> {
    args.next().ok_or(ConfigError::MissingValue { flag })
}

fn set_once<T>(slot: &mut Option<T>, flag: &'static str, value: T) -> Result<(), ConfigError> {
    if slot.is_some() {
        return Err(ConfigError::DuplicateFlag { flag });
    }
    *slot = Some(value);
    Ok(())
}

fn parse_timeout(source: &'static str, raw: &str) -> Result<Option<Duration>, ConfigError> {
    let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
        source,
        value: raw.to_owned(),
    })?;
    Ok((millis > 0).then(|| Duration::from_millis(millis)))
}

fn parse_command(positional: Vec<String>) -> Result<Command, ConfigError> {
    let mut words = positional.into_iter();
    let Some(command) = words.next() else {
        return Err(ConfigError::MissingCommand);
    };

    let parsed = match command.as_str() {
        "list" => Command::List,
        "new" => Command::New {
            name: words.next().unwrap_or_else(|| DEFAULT_DIAGRAM_NAME.to_owned()),
        },
        "show" => Command::Show {
            id: parse_record_id(required(&mut words, "show", "id")?)?,
        },
        "demo" => Command::Demo {
            name: required(&mut words, "demo", "name")?,
        },
        "rename" => {
            let id = parse_record_id(required(&mut words, "rename", "id")?)?;
            let raw_node = required(&mut words, "rename", "node-id")?;
            let node_id = NodeId::new(raw_node.clone()).map_err(|reason| ConfigError::InvalidId {
                argument: "node-id",
                value: raw_node,
                reason,
            })?;
            let label = required(&mut words, "rename", "label")?;
            Command::Rename { id, node_id, label }
        }
        _ => return Err(ConfigError::UnknownCommand { command }),
    };

    if let Some(argument) = words.next() {
        return Err(ConfigError::UnexpectedArgument { argument });
    }
    Ok(parsed)
}

fn required(
    words: &mut impl Iterator<Item = String>,
    command: &'static str,
    argument: &'static str,
) -> Result<String, ConfigError> {
    words
        .next()
        .ok_or(ConfigError::MissingArgument { command, argument })
}

fn parse_record_id(raw: String) -> Result<RecordId, ConfigError> {
    RecordId::new(raw.clone()).map_err(|reason| ConfigError::InvalidId {
        argument: "id",
        value: raw,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use rstest::rstest;

    use super::{parse_config, Command, Config, ConfigError, ENV_COLLECTION, ENV_STORE_DIR};
    use crate::store::WriteDurability;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env = env
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<BTreeMap<_, _>>();
        parse_config(args.iter().map(|arg| (*arg).to_owned()), |key| {
            env.get(key).cloned()
        })
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let config = parse(&["list"], &[]).expect("parse config");
        assert_eq!(config.store_dir, PathBuf::from(".mindmap"));
        assert_eq!(config.collection, "mindmaps");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.durability, WriteDurability::BestEffort);
        assert_eq!(config.command, Command::List);
    }

    #[test]
    fn env_fills_in_and_flags_override() {
        let env = [
            (ENV_STORE_DIR, "/srv/maps"),
            (ENV_COLLECTION, "team"),
            ("MINDMAP_TIMEOUT_MS", "2500"),
        ];

        let from_env = parse(&["list"], &env).expect("parse config");
        assert_eq!(from_env.store_dir, PathBuf::from("/srv/maps"));
        assert_eq!(from_env.collection, "team");
        assert_eq!(from_env.request_timeout, Some(Duration::from_millis(2500)));

        let overridden = parse(
            &["--store", "local", "--timeout-ms", "0", "--durable-writes", "list"],
            &env,
        )
        .expect("parse config");
        assert_eq!(overridden.store_dir, PathBuf::from("local"));
        assert_eq!(overridden.collection, "team");
        assert_eq!(overridden.request_timeout, None);
        assert_eq!(overridden.durability, WriteDurability::Durable);
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse(&["new"], &[]).unwrap().command,
            Command::New {
                name: "My Mind Map".to_owned()
            }
        );
        assert_eq!(
            parse(&["new", "Roadmap"], &[]).unwrap().command,
            Command::New {
                name: "Roadmap".to_owned()
            }
        );
        assert!(matches!(
            parse(&["show", "abc"], &[]).unwrap().command,
            Command::Show { id } if id.as_str() == "abc"
        ));
        assert!(matches!(
            parse(&["demo", "Sample"], &[]).unwrap().command,
            Command::Demo { name } if name == "Sample"
        ));
        assert!(matches!(
            parse(&["rename", "abc", "root", "Central idea"], &[]).unwrap().command,
            Command::Rename { id, node_id, label }
                if id.as_str() == "abc" && node_id.as_str() == "root" && label == "Central idea"
        ));
    }

    #[rstest]
    #[case::no_command(&[], ConfigError::MissingCommand)]
    #[case::unknown_command(&["export"], ConfigError::UnknownCommand { command: "export".to_owned() })]
    #[case::unknown_flag(&["--nope", "list"], ConfigError::UnknownFlag { flag: "--nope".to_owned() })]
    #[case::duplicate_flag(&["--durable-writes", "--durable-writes", "list"], ConfigError::DuplicateFlag { flag: "--durable-writes" })]
    #[case::duplicate_value_flag(&["--store", "a", "--store", "b", "list"], ConfigError::DuplicateFlag { flag: "--store" })]
    #[case::missing_value(&["list", "--store"], ConfigError::MissingValue { flag: "--store" })]
    #[case::missing_argument(&["show"], ConfigError::MissingArgument { command: "show", argument: "id" })]
    #[case::extra_argument(&["list", "more"], ConfigError::UnexpectedArgument { argument: "more".to_owned() })]
    #[case::bad_timeout(&["--timeout-ms", "soon", "list"], ConfigError::InvalidTimeout { source: "--timeout-ms", value: "soon".to_owned() })]
    #[case::bad_collection(&["--collection", "../up", "list"], ConfigError::InvalidCollection { value: "../up".to_owned() })]
    fn rejects_bad_input(#[case] args: &[&str], #[case] expected: ConfigError) {
        assert_eq!(parse(args, &[]).unwrap_err(), expected);
    }

    #[test]
    fn rejects_invalid_ids() {
        let err = parse(&["show", "a/b"], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidId { argument: "id", .. }), "got: {err:?}");

        let err = parse(&["rename", "abc", "", "x"], &[]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidId { argument: "node-id", .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn invalid_env_timeout_names_the_variable() {
        let err = parse(&["list"], &[("MINDMAP_TIMEOUT_MS", "-1")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid timeout in MINDMAP_TIMEOUT_MS: \"-1\" (expected milliseconds)");
    }
}
