//! Command-line front end for the helper functions.
//!
//! Value arguments are JSON text typed by inference. With `--typed-input`
//! every value argument is a `{"value": ..., "type": ...}` envelope that
//! declares its type. Results are printed to stdout as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value as Json;
use tracing::info;

use helpers::core::error::FunctionError;
use helpers::core::key_set::{KeyMatch, KeySet};
use helpers::core::value::Typed;
use helpers::exit_codes;
use helpers::functions;
use helpers::io::config::{DEFAULT_CONFIG_FILE, HelpersConfig, load_config, write_config};
use helpers::io::document::{encode, encode_typed, parse_document, parse_typed_document};
use helpers::io::env::ProcessEnv;
use helpers::logging;

#[derive(Parser)]
#[command(
    name = "helpers",
    version,
    about = "Query and reshape semi-structured dynamic values"
)]
struct Cli {
    /// Config file (defaults to `helpers.toml` when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as `{"value": ..., "type": ...}` envelopes.
    #[arg(long, global = true)]
    typed: bool,

    /// Read value arguments as `{"value": ..., "type": ...}` envelopes.
    #[arg(long, global = true)]
    typed_input: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// List the registered functions and their parameters.
    List,
    /// Keep the collection elements whose value at KEY equals VALUE.
    #[command(alias = "collection_filter")]
    CollectionFilter {
        /// Collection to filter (JSON).
        collection: String,
        /// Dot-joined key; empty compares whole elements.
        #[arg(long, default_value = "")]
        key: String,
        /// Value to compare against (JSON). Omitted means null.
        #[arg(long)]
        value: Option<String>,
    },
    /// Check whether an object or map has the given keys.
    #[command(alias = "object_contains_keys")]
    ObjectContainsKeys {
        /// Object or map (JSON).
        object: String,
        /// Required key; repeat for more.
        #[arg(long = "key")]
        keys: Vec<String>,
        /// Require every key (true) or any key (false).
        #[arg(long)]
        strict: Option<bool>,
    },
    /// Keep only the given keys of an object or map.
    #[command(alias = "object_filter_keys")]
    ObjectFilterKeys {
        /// Object or map (JSON).
        object: String,
        /// Allowed key; repeat for more.
        #[arg(long = "key")]
        keys: Vec<String>,
    },
    /// Set a key in an object under a write policy.
    #[command(alias = "object_set_value")]
    ObjectSetValue {
        /// Object (JSON).
        object: String,
        key: String,
        /// New value (JSON).
        value: String,
        /// write_all, write_value, or write_safe.
        operation: String,
    },
    /// Check whether an environment variable is set.
    #[command(alias = "os_check_env")]
    OsCheckEnv {
        name: String,
        /// Treat an empty value as unset.
        #[arg(long)]
        strict: Option<bool>,
    },
    /// Read an environment variable, with an optional fallback.
    #[command(alias = "os_get_env")]
    OsGetEnv {
        name: String,
        fallback: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

/// Function failures come back from `functions::*` as a bare
/// `FunctionError`; everything else, including undecodable input, is
/// invalid usage.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<FunctionError>().is_some() {
        exit_codes::FUNCTION_ERROR
    } else {
        exit_codes::INVALID
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if let Command::Init { force } = cli.command {
        return cmd_init(&config_path, force);
    }

    if cli.config.is_some() && !config_path.exists() {
        bail!("config file {} not found", config_path.display());
    }
    let config = load_config(&config_path).context("load config")?;
    logging::init(&config.log_filter);

    let output = Output {
        pretty: config.output.pretty,
        typed: cli.typed || config.output.typed,
    };
    let input = Input {
        typed: cli.typed_input,
    };

    match cli.command {
        Command::Init { .. } => Ok(()),
        Command::List => cmd_list(),
        Command::CollectionFilter {
            collection,
            key,
            value,
        } => {
            let collection = input.parse("collection", &collection)?;
            let target = value
                .as_deref()
                .map(|text| input.parse("value", text))
                .transpose()?;
            let result = functions::collection_filter(
                &collection.value,
                &key,
                target.as_ref().map(|typed| &typed.value),
            )?;
            output.print_value(Typed::inferred(result))
        }
        Command::ObjectContainsKeys {
            object,
            keys,
            strict,
        } => {
            let object = input.parse("object", &object)?;
            let mode = KeyMatch::from_strict(strict.unwrap_or(config.defaults.strict_keys));
            let found = functions::object_contains_keys(&object.value, &key_set(keys), mode)?;
            output.print_json(&Json::Bool(found))
        }
        Command::ObjectFilterKeys { object, keys } => {
            let object = input.parse("object", &object)?;
            let result = functions::object_filter_keys(&object.value, &key_set(keys))?;
            output.print_value(Typed::inferred(result))
        }
        Command::ObjectSetValue {
            object,
            key,
            value,
            operation,
        } => {
            let object = input.parse("object", &object)?;
            let value = input.parse("value", &value)?;
            let result = functions::object_set_value(&object.value, &key, value, &operation)?;
            output.print_value(Typed::inferred(result))
        }
        Command::OsCheckEnv { name, strict } => {
            let strict = strict.unwrap_or(config.defaults.strict_env);
            let set = functions::os_check_env(&ProcessEnv, &name, strict);
            output.print_json(&Json::Bool(set))
        }
        Command::OsGetEnv { name, fallback } => {
            let value = functions::os_get_env(&ProcessEnv, &name, fallback.as_deref());
            output.print_json(&Json::String(value))
        }
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        println!("{} already exists", path.display());
        return Ok(());
    }
    write_config(path, &HelpersConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn cmd_list() -> Result<()> {
    for spec in functions::catalog() {
        println!("{}: {}", spec.name, spec.summary);
        for param in spec.params {
            let mut flags = Vec::new();
            if param.nullable {
                flags.push("nullable");
            }
            if param.variadic {
                flags.push("optional");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" ({})", flags.join(", "))
            };
            println!("  {}{}: {}", param.name, flags, param.description);
        }
    }
    Ok(())
}

/// How value arguments are read.
struct Input {
    typed: bool,
}

impl Input {
    fn parse(&self, name: &str, text: &str) -> Result<Typed> {
        let parsed = if self.typed {
            parse_typed_document(text)
        } else {
            parse_document(text)
        };
        parsed.with_context(|| format!("argument {name}"))
    }
}

fn key_set(keys: Vec<String>) -> KeySet {
    keys.into_iter().collect()
}

/// How results are written to stdout.
struct Output {
    pretty: bool,
    typed: bool,
}

impl Output {
    fn print_value(&self, result: Typed) -> Result<()> {
        let json = if self.typed {
            encode_typed(&result)
        } else {
            encode(&result.value)
        };
        info!(kind = %result.value.kind(), "printing result");
        self.print_json(&json)
    }

    fn print_json(&self, json: &Json) -> Result<()> {
        let text = if self.pretty {
            serde_json::to_string_pretty(json)
        } else {
            serde_json::to_string(json)
        }
        .context("serialize result")?;
        println!("{text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["helpers", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["helpers", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn parse_repeated_keys() {
        let cli = Cli::parse_from([
            "helpers",
            "object-contains-keys",
            r#"{"a": 1}"#,
            "--key",
            "a",
            "--key",
            "b",
            "--strict",
            "false",
        ]);
        let Command::ObjectContainsKeys { keys, strict, .. } = cli.command else {
            panic!("expected object-contains-keys");
        };
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(strict, Some(false));
    }

    #[test]
    fn parse_underscore_alias() {
        let cli = Cli::parse_from(["helpers", "collection_filter", "[1, 2]", "--value", "1"]);
        let Command::CollectionFilter { key, value, .. } = cli.command else {
            panic!("expected collection-filter");
        };
        assert_eq!(key, "");
        assert_eq!(value.as_deref(), Some("1"));
    }

    #[test]
    fn function_errors_map_to_function_exit_code() {
        let err = anyhow::Error::new(FunctionError::InvalidPolicy("x".to_string()));
        assert_eq!(exit_code_for(&err), exit_codes::FUNCTION_ERROR);
        let err = anyhow::anyhow!("config file missing");
        assert_eq!(exit_code_for(&err), exit_codes::INVALID);
    }

    #[test]
    fn parse_errors_name_the_argument() {
        let err = Input { typed: false }
            .parse("object", "{oops")
            .expect_err("invalid json");
        assert!(format!("{err:#}").contains("argument object"));
        assert_eq!(exit_code_for(&err), exit_codes::INVALID);
    }

    #[test]
    fn undecodable_typed_input_is_invalid_not_a_function_error() {
        let input = Input { typed: true };
        let mismatch = input
            .parse("object", r#"{"value": "x", "type": "number"}"#)
            .expect_err("mismatch");
        assert_eq!(exit_code_for(&mismatch), exit_codes::INVALID);
        assert!(format!("{mismatch:#}").contains("cannot convert string to number"));

        let bad_type = input
            .parse("object", r#"{"value": 1, "type": "list"}"#)
            .expect_err("unknown type");
        assert_eq!(exit_code_for(&bad_type), exit_codes::INVALID);
    }

    #[test]
    fn typed_input_flag_is_global() {
        let cli = Cli::parse_from(["helpers", "object-filter-keys", "{}", "--typed-input"]);
        assert!(cli.typed_input);
    }
}
