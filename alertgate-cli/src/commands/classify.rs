//! `alertgate classify` command handler

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use alertgate_classifier::{ClassifierConfig, ClassifyEngine, Verdict};
use alertgate_core::event::{RawEvent, RawFrame};
use alertgate_core::taxonomy::Category;
use alertgate_core::types::NormalizedAlert;

use crate::cli::ClassifyArgs;
use crate::error::CliError;
use crate::input;
use crate::output::{OutputWriter, Render};

/// Execute the `classify` command.
///
/// Replays a recorded frame file through the classify engine without
/// starting the bridge, and reports per-frame verdicts plus totals.
pub async fn execute(
    args: ClassifyArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = input::load_config(config_path).await?;
    let resolver = input::load_resolver(args.resolve.as_deref())?;

    let engine = ClassifyEngine::new(
        ClassifierConfig::from_core(&config.stream),
        Arc::new(resolver),
    )?;

    let lines = read_lines(&args.input).await?;
    info!(input = %args.input, lines = lines.len(), "replaying recorded frames");

    let report = replay(&engine, &lines, &args.input, args.verbose);
    writer.render(&report)?;
    Ok(())
}

async fn read_lines(input: &str) -> Result<Vec<String>, CliError> {
    let content = if input == "-" {
        use tokio::io::AsyncReadExt;
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(input).await?
    };
    Ok(content.lines().map(str::to_owned).collect())
}

/// Replay frame lines through the engine and collect a report.
///
/// Emitted alerts always appear as entries; other verdicts only with
/// `verbose`. Blank lines are skipped, malformed lines are counted and
/// logged but never abort the replay.
fn replay(engine: &ClassifyEngine, lines: &[String], input: &str, verbose: bool) -> ClassifyReport {
    let mut report = ClassifyReport::new(input);

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        report.frames += 1;

        let frame = match input::parse_frame_line(trimmed) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed frame line");
                report.invalid_lines += 1;
                continue;
            }
        };

        if !engine.pre_filter(frame.category_id, frame.element_id) {
            report.filtered += 1;
            report.push(verbose, FrameVerdict::filtered(line_no, &frame));
            continue;
        }

        let event = match RawEvent::decode(&frame) {
            Ok(event) => event,
            Err(e) => {
                report.decode_errors += 1;
                report.push(
                    verbose,
                    FrameVerdict::decode_error(line_no, &frame, e.to_string()),
                );
                continue;
            }
        };

        match engine.classify(&event) {
            Verdict::Emit(alert) => {
                report.accepted += 1;
                report.emitted += 1;
                report
                    .entries
                    .push(FrameVerdict::emit(line_no, &frame, alert));
            }
            Verdict::Accept => {
                report.accepted += 1;
                report.push(verbose, FrameVerdict::accept(line_no, &frame));
            }
            Verdict::Reject(reason) => {
                report.rejected += 1;
                report.push(
                    verbose,
                    FrameVerdict::reject(line_no, &frame, reason.to_string()),
                );
            }
        }
    }

    report
}

fn event_label(category_id: u16, element_id: u16) -> String {
    match Category::from_id(category_id) {
        Some(category) => format!("{}:{}", category.name(), element_id),
        None => format!("{}:{}", category_id, element_id),
    }
}

/// Replay report: verdict totals plus the retained per-frame entries.
#[derive(Serialize)]
pub struct ClassifyReport {
    pub input: String,
    pub frames: usize,
    pub invalid_lines: usize,
    pub filtered: usize,
    pub decode_errors: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub emitted: usize,
    pub entries: Vec<FrameVerdict>,
}

impl ClassifyReport {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
            frames: 0,
            invalid_lines: 0,
            filtered: 0,
            decode_errors: 0,
            accepted: 0,
            rejected: 0,
            emitted: 0,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, verbose: bool, entry: FrameVerdict) {
        if verbose {
            self.entries.push(entry);
        }
    }
}

/// Verdict for a single replayed frame.
#[derive(Serialize)]
pub struct FrameVerdict {
    pub line: usize,
    pub category: u16,
    pub element: u16,
    pub verdict: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<NormalizedAlert>,
}

impl FrameVerdict {
    fn emit(line: usize, frame: &RawFrame, alert: NormalizedAlert) -> Self {
        Self {
            line,
            category: frame.category_id,
            element: frame.element_id,
            verdict: "emit",
            reason: None,
            alert: Some(alert),
        }
    }

    fn accept(line: usize, frame: &RawFrame) -> Self {
        Self {
            line,
            category: frame.category_id,
            element: frame.element_id,
            verdict: "accept",
            reason: None,
            alert: None,
        }
    }

    fn reject(line: usize, frame: &RawFrame, reason: String) -> Self {
        Self {
            line,
            category: frame.category_id,
            element: frame.element_id,
            verdict: "reject",
            reason: Some(reason),
            alert: None,
        }
    }

    fn filtered(line: usize, frame: &RawFrame) -> Self {
        Self {
            line,
            category: frame.category_id,
            element: frame.element_id,
            verdict: "filtered",
            reason: None,
            alert: None,
        }
    }

    fn decode_error(line: usize, frame: &RawFrame, reason: String) -> Self {
        Self {
            line,
            category: frame.category_id,
            element: frame.element_id,
            verdict: "decode-error",
            reason: Some(reason),
            alert: None,
        }
    }

    fn detail(&self) -> String {
        if let Some(alert) = &self.alert {
            format!(
                "{}/{} severity={} {}",
                alert.node, alert.resource, alert.severity, alert.time_of_event
            )
        } else if let Some(reason) = &self.reason {
            reason.clone()
        } else {
            String::new()
        }
    }
}

impl Render for ClassifyReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Classify: {}", self.input.bold())?;
        writeln!(
            w,
            "Frames: {} (invalid lines: {})",
            self.frames, self.invalid_lines
        )?;
        writeln!(
            w,
            "Filtered: {}  Decode errors: {}  Rejected: {}  Accepted: {}  Emitted: {}",
            self.filtered, self.decode_errors, self.rejected, self.accepted, self.emitted
        )?;

        writeln!(w)?;

        if self.entries.is_empty() {
            writeln!(w, "{}", "No alerts emitted.".dimmed())?;
            return Ok(());
        }

        writeln!(w, "{:<6} {:<16} {:<13} Detail", "Line", "Event", "Verdict")?;
        writeln!(w, "{}", "-".repeat(80))?;

        for entry in &self.entries {
            let verdict_colored = match entry.verdict {
                "emit" => entry.verdict.green().bold(),
                "accept" => entry.verdict.green(),
                "reject" => entry.verdict.yellow(),
                "decode-error" => entry.verdict.red(),
                "filtered" => entry.verdict.dimmed(),
                _ => entry.verdict.normal(),
            };

            writeln!(
                w,
                "{:<6} {:<16} {:<13} {}",
                entry.line,
                event_label(entry.category, entry.element),
                verdict_colored,
                entry.detail()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alertgate_classifier::MapResolver;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    fn engine_for(element_type: &str, categories: &[&str]) -> ClassifyEngine {
        let config = ClassifierConfig {
            accepted_categories: categories.iter().map(|s| (*s).to_owned()).collect(),
            element_type: element_type.to_owned(),
            ..ClassifierConfig::default()
        };
        let mut resolver = MapResolver::new();
        resolver.insert_host(12, "web01");
        resolver.insert_service(12, 31, "http");
        ClassifyEngine::new(config, Arc::new(resolver)).expect("engine config should be valid")
    }

    #[test]
    fn test_replay_emits_host_alert() {
        let engine = engine_for("host_status", &["neb"]);
        let input = lines(&[
            r#"{"category":1,"element":14,"host_id":12,"state":1,"current_state":1,"state_type":1,"last_check":1700000000,"output":"CRITICAL - host down"}"#,
        ]);

        let report = replay(&engine, &input, "frames.jsonl", false);

        assert_eq!(report.frames, 1);
        assert_eq!(report.emitted, 1);
        assert_eq!(report.entries.len(), 1, "emit entries always appear");

        let alert = report.entries[0].alert.as_ref().expect("emit carries alert");
        assert_eq!(alert.node, "web01");
        assert_eq!(alert.resource, "web01");
        assert_eq!(alert.severity, 1);
        assert_eq!(alert.time_of_event, "2023-11-14 22:13:20");
    }

    #[test]
    fn test_replay_rejects_anonymous_service() {
        let engine = engine_for("service_status", &["neb"]);
        let input = lines(&[
            r#"{"category":1,"element":24,"host_id":99,"service_id":5,"state":2,"state_type":1}"#,
        ]);

        let report = replay(&engine, &input, "-", true);

        assert_eq!(report.rejected, 1);
        assert_eq!(report.emitted, 0);
        assert_eq!(report.entries[0].verdict, "reject");
        let reason = report.entries[0].reason.as_ref().expect("reject has reason");
        assert!(reason.contains("anonymous"), "reason: {}", reason);
    }

    #[test]
    fn test_replay_accepts_storage_without_alert() {
        // Default config accepts the storage metric element.
        let config = ClassifierConfig::default();
        let engine =
            ClassifyEngine::new(config, Arc::new(MapResolver::new())).expect("valid config");
        let input = lines(&[r#"{"category":3,"element":1,"host_id":12}"#]);

        let report = replay(&engine, &input, "-", true);

        assert_eq!(report.accepted, 1);
        assert_eq!(report.emitted, 0);
        assert_eq!(report.entries[0].verdict, "accept");
        assert!(report.entries[0].alert.is_none(), "accept carries no alert");
    }

    #[test]
    fn test_replay_filters_unmatched_elements() {
        let engine = engine_for("host_status", &["neb"]);
        let input = lines(&[
            // service_status element does not match the configured element type
            r#"{"category":1,"element":24,"host_id":12,"service_id":31,"state":2}"#,
            // storage category is not accepted at all
            r#"{"category":3,"element":1}"#,
        ]);

        let report = replay(&engine, &input, "-", true);

        assert_eq!(report.filtered, 2);
        assert_eq!(report.decode_errors, 0, "filtered frames are never decoded");
        assert!(report.entries.iter().all(|e| e.verdict == "filtered"));
    }

    #[test]
    fn test_replay_decode_error_keeps_going() {
        let engine = engine_for("host_status", &["neb"]);
        let input = lines(&[
            r#"{"category":1,"element":14,"host_id":"not-a-number"}"#,
            r#"{"category":1,"element":14,"host_id":12,"state":1,"current_state":1,"state_type":1}"#,
        ]);

        let report = replay(&engine, &input, "-", false);

        assert_eq!(report.decode_errors, 1);
        assert_eq!(report.emitted, 1, "replay continues after a bad payload");
    }

    #[test]
    fn test_replay_skips_blank_and_malformed_lines() {
        let engine = engine_for("host_status", &["neb"]);
        let input = lines(&[
            "",
            "   ",
            "not json",
            r#"{"category":1,"element":14,"host_id":12,"state":1,"current_state":1,"state_type":1}"#,
        ]);

        let report = replay(&engine, &input, "-", false);

        assert_eq!(report.frames, 2, "blank lines are not frames");
        assert_eq!(report.invalid_lines, 1);
        assert_eq!(report.emitted, 1);
    }

    #[test]
    fn test_replay_verbose_controls_entries() {
        let engine = engine_for("host_status", &["neb"]);
        let input = lines(&[
            r#"{"category":3,"element":1}"#,
            r#"{"category":1,"element":14,"host_id":12,"state":1,"current_state":1,"state_type":1}"#,
        ]);

        let quiet = replay(&engine, &input, "-", false);
        assert_eq!(quiet.entries.len(), 1, "quiet mode keeps only emits");
        assert_eq!(quiet.entries[0].verdict, "emit");

        let verbose = replay(&engine, &input, "-", true);
        assert_eq!(verbose.entries.len(), 2, "verbose keeps every verdict");
        assert_eq!(verbose.filtered, quiet.filtered, "totals are unaffected");
    }

    #[test]
    fn test_event_label_uses_category_names() {
        assert_eq!(event_label(1, 24), "neb:24");
        assert_eq!(event_label(3, 1), "storage:1");
        assert_eq!(event_label(99, 1), "99:1", "unknown category keeps raw id");
    }

    #[test]
    fn test_report_render_text_lists_entries() {
        let engine = engine_for("host_status", &["neb"]);
        let input = lines(&[
            r#"{"category":1,"element":14,"host_id":12,"state":1,"current_state":1,"state_type":1,"last_check":1700000000,"output":"down"}"#,
        ]);
        let report = replay(&engine, &input, "frames.jsonl", false);

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Classify:"));
        assert!(output.contains("frames.jsonl"));
        assert!(output.contains("Emitted: 1"));
        assert!(output.contains("neb:14"));
        assert!(output.contains("web01"));
    }

    #[test]
    fn test_report_render_text_without_entries() {
        let engine = engine_for("host_status", &["neb"]);
        let report = replay(&engine, &lines(&[r#"{"category":3,"element":1}"#]), "-", false);

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("No alerts emitted."));
    }

    #[test]
    fn test_report_json_omits_empty_fields() {
        let engine = engine_for("host_status", &["neb"]);
        let input = lines(&[r#"{"category":3,"element":1}"#]);
        let report = replay(&engine, &input, "-", true);

        let json = serde_json::to_value(&report).expect("report serializes");
        let entry = &json["entries"][0];
        assert_eq!(entry["verdict"].as_str(), Some("filtered"));
        assert!(entry.get("reason").is_none(), "no reason for filtered");
        assert!(entry.get("alert").is_none(), "no alert for filtered");
    }
}
