//! Terminal formatting for catalog and dispatch events.
//!
//! Supports three verbosity levels:
//! - Minimal: One-liner nginx-style
//! - Compact: Two-line httpie-style
//! - Verbose: Full block with separators

use crate::catalog::ModelCatalog;
use crate::compare::ModelOutcome;
use crate::config::LogVerbosity;
use std::io::Write;
use std::time::Duration;

const SEPARATOR: &str = "────────────────────────────────────────";

/// Longest response preview shown in verbose output.
const PREVIEW_CHARS: usize = 80;

/// Format duration in human-readable form.
fn format_duration(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    } else {
        flat
    }
}

/// Format one model's dispatch outcome.
pub fn format_outcome(
    name: &str,
    identifier: &str,
    elapsed: Duration,
    outcome: &ModelOutcome,
    verbosity: LogVerbosity,
) -> String {
    let duration = format_duration(elapsed);

    match verbosity {
        LogVerbosity::Minimal => {
            let status = match outcome {
                Ok(text) => format!("OK {} chars", text.chars().count()),
                Err(_) => "ERROR".to_string(),
            };
            format!("{} {} {}", name, status, duration)
        }
        LogVerbosity::Compact => {
            let response_line = match outcome {
                Ok(text) => format!("← OK ({}, {} chars)", duration, text.chars().count()),
                Err(e) => format!("← ERROR ({}): {}", duration, e),
            };
            format!("→ {} [{}]\n{}", name, identifier, response_line)
        }
        LogVerbosity::Verbose => {
            let (status, detail) = match outcome {
                Ok(text) => ("OK", format!("Preview: {}", preview(text))),
                Err(e) => ("ERROR", format!("Error: {}", e)),
            };
            format!(
                "{SEPARATOR}\n\
                 Model: {name}\n\
                 Upstream: {identifier}\n\
                 Status: {status}\n\
                 Timing: {duration}\n\
                 {detail}\n\
                 {SEPARATOR}"
            )
        }
    }
}

/// Format a catalog listing.
pub fn format_catalog(catalog: &ModelCatalog, verbosity: LogVerbosity) -> String {
    match verbosity {
        LogVerbosity::Minimal => catalog.names().collect::<Vec<_>>().join("\n"),
        LogVerbosity::Compact => {
            let mut out = format!("{} free models:", catalog.len());
            for name in catalog.names() {
                out.push_str(&format!("\n  - {}", name));
            }
            out
        }
        LogVerbosity::Verbose => {
            let width = catalog.names().map(|n| n.chars().count()).max().unwrap_or(0);
            let mut out = format!("{SEPARATOR}\n{} free models\n{SEPARATOR}", catalog.len());
            for entry in catalog.entries() {
                out.push_str(&format!(
                    "\n{:<width$}  {}",
                    entry.display_name,
                    entry.identifier,
                    width = width
                ));
            }
            out.push('\n');
            out.push_str(SEPARATOR);
            out
        }
    }
}

/// Write a catalog listing to the given writer.
pub fn print_catalog<W: Write>(
    writer: &mut W,
    catalog: &ModelCatalog,
    verbosity: LogVerbosity,
) -> std::io::Result<()> {
    writeln!(writer, "{}", format_catalog(catalog, verbosity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmBoxError;

    fn ok_outcome() -> ModelOutcome {
        Ok("Hello there, how can I help?".to_string())
    }

    fn err_outcome() -> ModelOutcome {
        Err(LlmBoxError::UpstreamStatus {
            status: 429,
            message: "Rate limit exceeded".to_string(),
        })
    }

    #[test]
    fn minimal_outcome_is_single_line() {
        let output = format_outcome(
            "ModelA",
            "vendor/a:free",
            Duration::from_millis(1200),
            &ok_outcome(),
            LogVerbosity::Minimal,
        );

        assert!(!output.contains('\n'), "Minimal should be single line");
        assert!(output.contains("ModelA"));
        assert!(output.contains("OK"));
        assert!(output.contains("1.2s"));
    }

    #[test]
    fn compact_outcome_is_two_lines() {
        let output = format_outcome(
            "ModelA",
            "vendor/a:free",
            Duration::from_millis(350),
            &ok_outcome(),
            LogVerbosity::Compact,
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "Compact should be two lines");
        assert!(lines[0].starts_with('→'));
        assert!(lines[0].contains("vendor/a:free"));
        assert!(lines[1].starts_with('←'));
        assert!(lines[1].contains("350ms"));
    }

    #[test]
    fn compact_outcome_shows_error_detail() {
        let output = format_outcome(
            "ModelB",
            "vendor/b:free",
            Duration::from_millis(80),
            &err_outcome(),
            LogVerbosity::Compact,
        );

        assert!(output.contains("ERROR"));
        assert!(output.contains("429"));
        assert!(output.contains("Rate limit exceeded"));
    }

    #[test]
    fn verbose_outcome_has_separators_and_preview() {
        let output = format_outcome(
            "ModelA",
            "vendor/a:free",
            Duration::from_secs(2),
            &ok_outcome(),
            LogVerbosity::Verbose,
        );

        assert!(output.starts_with(SEPARATOR));
        assert!(output.ends_with(SEPARATOR));
        assert!(output.contains("Upstream: vendor/a:free"));
        assert!(output.contains("Preview: Hello there"));
        assert!(output.contains("2.0s"));
    }

    #[test]
    fn preview_flattens_and_truncates() {
        let long = format!("line one\nline two {}", "word ".repeat(40));
        let shown = preview(&long);

        assert!(!shown.contains('\n'));
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
    }

    #[test]
    fn catalog_formats_follow_verbosity() {
        let catalog = ModelCatalog::fallback();

        let minimal = format_catalog(&catalog, LogVerbosity::Minimal);
        assert_eq!(minimal, "llama-4-maverick\nmistral-small-3.1-24b-instruct");

        let compact = format_catalog(&catalog, LogVerbosity::Compact);
        assert!(compact.starts_with("2 free models:"));
        assert!(compact.contains("  - llama-4-maverick"));

        let verbose = format_catalog(&catalog, LogVerbosity::Verbose);
        assert!(verbose.contains("meta-llama/llama-4-maverick:free"));
        assert!(verbose.contains(SEPARATOR));
    }

    #[test]
    fn print_catalog_writes_trailing_newline() {
        let mut buf = Vec::new();
        print_catalog(&mut buf, &ModelCatalog::fallback(), LogVerbosity::Minimal).unwrap();

        let written = String::from_utf8(buf).unwrap();
        assert!(written.ends_with("mistral-small-3.1-24b-instruct\n"));
    }
}
