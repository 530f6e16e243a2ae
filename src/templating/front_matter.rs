//! `---` delimited header blocks at the top of templates.

use serde_json::Value;

use crate::templating::Model;

/// Header bindings and the remaining template body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub variables: Model,
    pub body: String,
}

impl FrontMatter {
    /// Layout requested by the header, if any.
    pub fn layout(&self) -> Option<&str> {
        self.variables.get("layout").and_then(Value::as_str)
    }
}

/// Split `source` into header variables and body.
///
/// Only `key: value` lines are understood. A source without a complete
/// header block is returned untouched.
pub fn parse(source: &str) -> FrontMatter {
    let untouched = || FrontMatter {
        variables: Model::new(),
        body: source.to_string(),
    };

    let mut lines = source.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return untouched(),
    }

    let mut variables = Model::new();
    let mut consumed = source.split_inclusive('\n').next().map_or(0, str::len);

    for line in lines {
        consumed += line.len();
        let trimmed = line.trim();
        if trimmed == "---" {
            return FrontMatter {
                variables,
                body: source[consumed..].to_string(),
            };
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            variables = variables.with(key.trim(), unquote(value.trim()));
        }
    }

    untouched()
}

fn unquote(value: &str) -> String {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}
