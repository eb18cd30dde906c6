//! Configuration file loading and validation.
//!
//! The file is YAML. Output selection is resolved into an explicit
//! [`OutputMode`] while loading, so a bad export setup is rejected before any
//! network call is made.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::errors::{ConfigLoadSource, SqsSlurpError};
use crate::receiver::config::AwsSqsReceiverConfig;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Structured formats supported by export mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
}

impl FromStr for ExportFormat {
    type Err = SqsSlurpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            other => Err(SqsSlurpError::ConfigValidation(format!(
                "unsupported export format '{other}' (supported: json)"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// How the received message is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Serialize the whole message to a file.
    Export { format: ExportFormat, path: PathBuf },
    /// Print the named fields to stdout, in the given order.
    SelectFields { names: Vec<String> },
    /// Pretty-print the whole message to stdout.
    Dump,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub queue_url: String,
    pub region: String,
    /// Message attribute names requested on the receive call.
    pub message_attribute_names: Vec<String>,
    /// System attribute names requested on the receive call.
    pub system_attribute_names: Vec<String>,
    pub endpoint_url: Option<String>,
    pub receive: AwsSqsReceiverConfig,
    pub output: OutputMode,
}

/// The file as written by the user, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    queue_url: String,
    region: String,
    #[serde(default)]
    message_attributes: Vec<String>,
    #[serde(default)]
    system_attributes: Vec<String>,
    endpoint_url: Option<String>,
    visibility_timeout: Option<i32>,
    wait_time_seconds: Option<i32>,
    export_as: Option<String>,
    export_path: Option<PathBuf>,
    output_fields: Option<Vec<String>>,
}

impl Config {
    /// Reads, parses and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SqsSlurpError::ConfigLoad`] when the file cannot be read or is
    /// not valid YAML for the expected keys, and
    /// [`SqsSlurpError::ConfigValidation`] when the contents are inconsistent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SqsSlurpError> {
        let path = path.as_ref();
        let load_error = |source: ConfigLoadSource| SqsSlurpError::ConfigLoad {
            path: path.display().to_string(),
            source,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| load_error(e.into()))?;
        let config = Self::from_yaml(&contents).map_err(|e| match e {
            SqsSlurpError::ConfigLoad { source, .. } => load_error(source),
            other => other,
        })?;

        debug!(path = %path.display(), output = ?config.output, "configuration loaded");
        Ok(config)
    }

    /// Parses and validates configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, SqsSlurpError> {
        let file: ConfigFile =
            serde_yaml::from_str(contents).map_err(|e| SqsSlurpError::ConfigLoad {
                path: "<inline>".to_string(),
                source: e.into(),
            })?;
        validate(file)
    }
}

fn validate(file: ConfigFile) -> Result<Config, SqsSlurpError> {
    require_non_blank("queue_url", &file.queue_url)?;
    require_non_blank("region", &file.region)?;

    let output = resolve_output_mode(file.export_as, file.export_path, file.output_fields)?;

    let defaults = AwsSqsReceiverConfig::default();
    let receive = AwsSqsReceiverConfig {
        visibility_timeout: file.visibility_timeout.unwrap_or(defaults.visibility_timeout),
        wait_time_seconds: file.wait_time_seconds.unwrap_or(defaults.wait_time_seconds),
        ..defaults
    };
    receive.validate()?;

    Ok(Config {
        queue_url: file.queue_url,
        region: file.region,
        message_attribute_names: file.message_attributes,
        system_attribute_names: file.system_attributes,
        endpoint_url: file.endpoint_url.filter(|url| !url.trim().is_empty()),
        receive,
        output,
    })
}

fn require_non_blank(key: &str, value: &str) -> Result<(), SqsSlurpError> {
    if value.trim().is_empty() {
        return Err(SqsSlurpError::ConfigValidation(format!(
            "'{key}' must not be empty"
        )));
    }
    Ok(())
}

fn resolve_output_mode(
    export_as: Option<String>,
    export_path: Option<PathBuf>,
    output_fields: Option<Vec<String>>,
) -> Result<OutputMode, SqsSlurpError> {
    let wants_export = export_as.is_some() || export_path.is_some();

    if wants_export && output_fields.is_some() {
        return Err(SqsSlurpError::ConfigValidation(
            "'output_fields' cannot be combined with 'export_as'/'export_path'".to_string(),
        ));
    }

    if wants_export {
        let (Some(format), Some(path)) = (export_as, export_path) else {
            return Err(SqsSlurpError::ConfigValidation(
                "export mode requires both 'export_as' and 'export_path'".to_string(),
            ));
        };
        if path.as_os_str().is_empty() {
            return Err(SqsSlurpError::ConfigValidation(
                "'export_path' must not be empty".to_string(),
            ));
        }
        let format = format.parse::<ExportFormat>()?;
        return Ok(OutputMode::Export { format, path });
    }

    match output_fields {
        Some(names) => Ok(OutputMode::SelectFields { names }),
        None => Ok(OutputMode::Dump),
    }
}
