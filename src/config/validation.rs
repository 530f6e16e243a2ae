//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and required values
//! - Detect conflicting compiler registrations
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use crate::config::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("`{}` is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be > 0"));
    }
    if config.resources.root.trim().is_empty() {
        errors.push(ValidationError::new("resources.root", "must not be empty"));
    }

    let mut extensions = HashSet::new();
    for (i, compiler) in config.compilers.iter().enumerate() {
        let field = format!("compilers[{}]", i);
        if compiler.extension.trim().is_empty() {
            errors.push(ValidationError::new(&field, "extension must not be empty"));
        } else if !extensions.insert(compiler.extension.as_str()) {
            errors.push(ValidationError::new(
                &field,
                format!("duplicate compiler for `{}`", compiler.extension),
            ));
        }
        if compiler.command.first().map_or(true, |program| program.trim().is_empty()) {
            errors.push(ValidationError::new(&field, "command must name a program"));
        }
    }

    for (i, content_type) in config.content_types.iter().enumerate() {
        let field = format!("content_types[{}]", i);
        if content_type.extension.trim().is_empty() {
            errors.push(ValidationError::new(&field, "extension must not be empty"));
        }
        if content_type.mime.trim().is_empty() {
            errors.push(ValidationError::new(&field, "mime must not be empty"));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level `{}`", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CompilerConfig, ContentTypeConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = AppConfig::default();
        config.server.bind_address = "nowhere".into();
        config.resources.root = " ".into();
        config.compilers = vec![
            CompilerConfig { extension: "less".into(), command: vec!["lessc".into()] },
            CompilerConfig { extension: "less".into(), command: vec![] },
        ];
        config.content_types = vec![ContentTypeConfig {
            extension: "md".into(),
            mime: "".into(),
            binary: false,
            templating: false,
        }];
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "server.bind_address",
                "resources.root",
                "compilers[1]",
                "compilers[1]",
                "content_types[0]",
                "observability.log_level",
            ]
        );
        assert!(errors[2].message.contains("duplicate"));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
