//! `alertgate run` command handler

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use alertgate_classifier::{ClassifierConfig, EventBridgeBuilder};
use alertgate_core::event::RawFrame;
use alertgate_core::pipeline::{HealthStatus, Pipeline};
use alertgate_core::types::NormalizedAlert;

use crate::cli::{OutputFormat, RunArgs};
use crate::error::CliError;
use crate::input;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
///
/// Builds the event bridge, feeds it frames from the input stream and prints
/// every emitted alert as it happens. The command stops when the input ends,
/// then renders a final accounting report.
pub async fn execute(
    args: RunArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = input::load_config(config_path).await?;
    let resolver = input::load_resolver(args.resolve.as_deref())?;

    // External alert channel, so the printer owns the receiving side.
    let (alert_tx, mut alert_rx) =
        mpsc::channel(alertgate_classifier::config::DEFAULT_CHANNEL_CAPACITY);

    let (mut bridge, _) = EventBridgeBuilder::new()
        .config(ClassifierConfig::from_core(&config.stream))
        .resolver(Arc::new(resolver))
        .alert_sender(alert_tx)
        .build()?;

    bridge.start().await?;
    info!(input = %args.input, "event bridge running");

    let format = writer.format();
    let printer = tokio::spawn(async move {
        let mut printed: u64 = 0;
        while let Some(alert) = alert_rx.recv().await {
            match alert_line(&alert, format) {
                Ok(line) => {
                    println!("{}", line);
                    printed += 1;
                }
                Err(e) => error!(error = %e, "failed to format alert"),
            }
        }
        printed
    });

    let feed = feed_frames(&args.input, bridge.frame_sender()).await;

    if let HealthStatus::Degraded(reason) = bridge.health_check().await {
        warn!(reason = reason.as_str(), "bridge degraded before shutdown");
    }

    // Stop joins the bridge worker, so the counters below are final.
    bridge.stop().await?;

    let received = bridge.received_count();
    let prefiltered = bridge.prefiltered_count();
    let decode_errors = bridge.decode_error_count();
    let accepted = bridge.accepted_count();
    let rejected = bridge.rejected_count();
    let emitted = bridge.emitted_count();

    // Dropping the bridge releases its alert sender and ends the printer.
    drop(bridge);
    let printed = printer
        .await
        .map_err(|e| CliError::Command(format!("alert printer failed: {}", e)))?;

    let stats = feed?;
    let report = RunReport {
        input: args.input,
        frames_sent: stats.sent,
        invalid_lines: stats.invalid_lines,
        received,
        prefiltered,
        decode_errors,
        accepted,
        rejected,
        emitted,
        printed,
    };

    writer.render(&report)?;
    Ok(())
}

#[derive(Debug, Default)]
struct FeedStats {
    sent: u64,
    invalid_lines: u64,
}

/// Read frame lines from a file or stdin and push them into the bridge.
///
/// Malformed lines are logged and skipped. A closed frame channel ends the
/// feed early instead of failing, so the accounting report still renders.
async fn feed_frames(input: &str, frame_tx: mpsc::Sender<RawFrame>) -> Result<FeedStats, CliError> {
    let reader: Box<dyn AsyncBufRead + Send + Unpin> = if input == "-" {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        Box::new(BufReader::new(tokio::fs::File::open(input).await?))
    };

    let mut stats = FeedStats::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let frame = match input::parse_frame_line(trimmed) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed frame line");
                stats.invalid_lines += 1;
                continue;
            }
        };

        if frame_tx.send(frame).await.is_err() {
            warn!("bridge stopped accepting frames, aborting input");
            break;
        }
        stats.sent += 1;
    }

    Ok(stats)
}

fn alert_line(alert: &NormalizedAlert, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(alert)?),
        OutputFormat::Text => Ok(format!(
            "[{}] severity={} node={} resource={} {}",
            alert.time_of_event, alert.severity, alert.node, alert.resource, alert.description
        )),
    }
}

/// Final accounting for one bridge run.
#[derive(Serialize)]
pub struct RunReport {
    pub input: String,
    pub frames_sent: u64,
    pub invalid_lines: u64,
    pub received: u64,
    pub prefiltered: u64,
    pub decode_errors: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub emitted: u64,
    pub printed: u64,
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Run: {}", self.input.bold())?;
        writeln!(
            w,
            "Frames sent: {} (invalid lines: {})",
            self.frames_sent, self.invalid_lines
        )?;
        writeln!(w)?;

        writeln!(w, "Bridge accounting")?;
        writeln!(w, "{}", "-".repeat(30))?;
        writeln!(w, "{:<16} {}", "received", self.received)?;
        writeln!(w, "{:<16} {}", "prefiltered", self.prefiltered)?;
        writeln!(w, "{:<16} {}", "decode errors", self.decode_errors)?;
        writeln!(w, "{:<16} {}", "rejected", self.rejected)?;
        writeln!(w, "{:<16} {}", "accepted", self.accepted)?;

        let emitted = self.emitted.to_string();
        if self.emitted > 0 {
            writeln!(w, "{:<16} {}", "emitted", emitted.green().bold())?;
        } else {
            writeln!(w, "{:<16} {}", "emitted", emitted.dimmed())?;
        }
        writeln!(w, "{:<16} {}", "printed", self.printed)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use alertgate_core::types::AlertSeverity;

    fn write_frames(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("should write frame file");
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_feed_frames_sends_parsed_frames() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = write_frames(
            &temp_dir,
            "frames.jsonl",
            concat!(
                r#"{"category":1,"element":14,"host_id":12,"state":1}"#,
                "\n",
                r#"{"category":3,"element":1}"#,
                "\n",
            ),
        );

        let (tx, mut rx) = mpsc::channel(8);
        let stats = feed_frames(&path, tx).await.expect("feed should succeed");

        assert_eq!(stats.sent, 2);
        assert_eq!(stats.invalid_lines, 0);

        let first = rx.recv().await.expect("first frame");
        assert_eq!((first.category_id, first.element_id), (1, 14));
        let second = rx.recv().await.expect("second frame");
        assert_eq!((second.category_id, second.element_id), (3, 1));
        assert!(rx.recv().await.is_none(), "sender dropped after feed");
    }

    #[tokio::test]
    async fn test_feed_frames_skips_bad_lines() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = write_frames(
            &temp_dir,
            "mixed.jsonl",
            concat!(
                "\n",
                "not json\n",
                r#"{"category":1,"element":14,"host_id":12}"#,
                "\n",
            ),
        );

        let (tx, mut rx) = mpsc::channel(8);
        let stats = feed_frames(&path, tx).await.expect("feed should succeed");

        assert_eq!(stats.sent, 1, "only the valid line is sent");
        assert_eq!(stats.invalid_lines, 1, "blank lines are not invalid");
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_feed_frames_missing_file_is_io_error() {
        let (tx, _rx) = mpsc::channel(1);
        let err = feed_frames("/nonexistent/frames.jsonl", tx)
            .await
            .expect_err("missing file should fail");
        assert!(matches!(err, CliError::Io(_)));
    }

    #[tokio::test]
    async fn test_feed_frames_stops_on_closed_channel() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = write_frames(
            &temp_dir,
            "frames.jsonl",
            concat!(
                r#"{"category":1,"element":14}"#,
                "\n",
                r#"{"category":1,"element":14}"#,
                "\n",
            ),
        );

        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        let stats = feed_frames(&path, tx)
            .await
            .expect("closed channel is not an error");
        assert_eq!(stats.sent, 0, "nothing counts as sent on a closed channel");
    }

    #[test]
    fn test_alert_line_text_format() {
        let alert = NormalizedAlert::new(
            "web01",
            "http",
            AlertSeverity::Critical,
            "CRITICAL - connection refused",
            "2023-11-14 22:13:20",
        );

        let line = alert_line(&alert, OutputFormat::Text).expect("should format");
        assert!(line.contains("[2023-11-14 22:13:20]"));
        assert!(line.contains("severity=1"));
        assert!(line.contains("node=web01"));
        assert!(line.contains("resource=http"));
        assert!(line.contains("connection refused"));
    }

    #[test]
    fn test_alert_line_json_format() {
        let alert = NormalizedAlert::new(
            "web01",
            "web01",
            AlertSeverity::Clear,
            "OK - host up",
            "2021-01-01 00:00:00",
        );

        let line = alert_line(&alert, OutputFormat::Json).expect("should format");
        let parsed: serde_json::Value = serde_json::from_str(&line).expect("line is JSON");
        assert_eq!(parsed["node"].as_str(), Some("web01"));
        assert_eq!(parsed["severity"].as_u64(), Some(0));
        assert_eq!(parsed["source"].as_str(), Some("centreon"));
    }

    #[test]
    fn test_run_report_render_text() {
        let report = RunReport {
            input: "frames.jsonl".to_owned(),
            frames_sent: 10,
            invalid_lines: 1,
            received: 10,
            prefiltered: 2,
            decode_errors: 1,
            accepted: 5,
            rejected: 2,
            emitted: 4,
            printed: 4,
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Frames sent: 10 (invalid lines: 1)"));
        assert!(output.contains("Bridge accounting"));
        assert!(output.contains("received"));
        assert!(output.contains("prefiltered"));
        assert!(output.contains("printed"));
    }
}
