//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::annotate::counter::WordCounts;
use crate::cli::args::{OutputFormat, ReadmarkArgs};
use crate::error::Result;
use crate::store::ExpressionRecord;

/// Result structure for annotation.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnnotationResult {
    pub html: String,
    pub phrases_merged: usize,
    pub phrases_dropped: usize,
    pub duration_ms: u64,
}

/// Result structure for word counting.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResult {
    #[serde(flatten)]
    pub counts: WordCounts,
    pub total: usize,
}

/// Result structure for known expression listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct KnownResult {
    pub expressions: Vec<ExpressionRecord>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &ReadmarkArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Print annotated markup. Human output is the bare HTML.
pub fn output_annotation(result: &AnnotationResult, args: &ReadmarkArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            println!("{}", result.html);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &ReadmarkArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value.get("expressions").and_then(|v| v.as_array()) {
        Some(expressions) => output_expressions_human(expressions),
        None => output_generic_human(&value),
    }
    Ok(())
}

fn output_expressions_human(expressions: &[serde_json::Value]) {
    if expressions.is_empty() {
        println!("No known expressions.");
        return;
    }

    for expression in expressions {
        let text = expression
            .get("expression")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let status = expression
            .get("status")
            .and_then(|v| v.as_u64())
            .and_then(|s| u8::try_from(s).ok())
            .and_then(crate::status::StatusLevel::from_ordinal)
            .map(|s| s.class_name())
            .unwrap_or("unknown");
        let meaning = expression
            .get("meaning")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if meaning.is_empty() {
            println!("{text} [{status}]");
        } else {
            println!("{text} [{status}]: {meaning}");
        }
    }
}

fn output_generic_human(value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &ReadmarkArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_result_serializes_flat() {
        let result = CountResult {
            counts: WordCounts {
                unknown: 3,
                learning: 2,
                ignored: 1,
            },
            total: 6,
        };
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["unknown"], 3);
        assert_eq!(value["learning"], 2);
        assert_eq!(value["ignored"], 1);
        assert_eq!(value["total"], 6);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&serde_json::json!("text")), "text");
        assert_eq!(format_value(&serde_json::json!(null)), "-");
        assert_eq!(format_value(&serde_json::json!(42)), "42");
    }
}
