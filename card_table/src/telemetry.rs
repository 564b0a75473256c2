//! Line-oriented CSV telemetry.
//!
//! Rows are fire-and-forget: a failed write is logged and the simulation
//! carries on. Column order is fixed for existing analysis tooling.

use std::io::Write;

use crate::game::pause::PauseCounters;

pub const PAUSE_METRICS_HEADER: &str = "resume,options,sound,graphics";

pub trait TelemetrySink {
    fn write_round_summary(&mut self, row: &str);
    fn write_player_outcome(&mut self, row: &str);
    fn write_pause_metrics(&mut self, row: &str);
    fn flush(&mut self) {}
}

/// Result of a resolved round for one seat.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Won,
    Lost,
    Folded,
}

impl Outcome {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Won => "W",
            Self::Lost => "L",
            Self::Folded => "F",
        }
    }
}

/// `round,score,score,...,` in table order. The trailing comma is part of
/// the format.
#[must_use]
pub fn round_summary_row(round: u32, scores: &[u32]) -> String {
    let mut row = format!("{round},");
    for score in scores {
        row.push_str(&format!("{score},"));
    }
    row
}

/// `round,<stake> (W) ,<stake> (L) ,...` in table order.
#[must_use]
pub fn player_outcome_row(round: u32, stakes: &[(usize, Outcome)]) -> String {
    let mut row = format!("{round},");
    for (stake, outcome) in stakes {
        row.push_str(&format!("{stake} ({}) ,", outcome.tag()));
    }
    row
}

#[must_use]
pub fn pause_metrics_row(counters: &PauseCounters) -> String {
    format!(
        "{},{},{},{}",
        counters.resume, counters.options, counters.sound, counters.graphics
    )
}

/// Discards every row.
#[derive(Debug, Default)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn write_round_summary(&mut self, _row: &str) {}
    fn write_player_outcome(&mut self, _row: &str) {}
    fn write_pause_metrics(&mut self, _row: &str) {}
}

/// Keeps rows in memory.
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    pub round_summaries: Vec<String>,
    pub player_outcomes: Vec<String>,
    pub pause_metrics: Vec<String>,
    pub flushes: usize,
}

impl TelemetrySink for MemoryTelemetry {
    fn write_round_summary(&mut self, row: &str) {
        self.round_summaries.push(row.to_string());
    }

    fn write_player_outcome(&mut self, row: &str) {
        self.player_outcomes.push(row.to_string());
    }

    fn write_pause_metrics(&mut self, row: &str) {
        self.pause_metrics.push(row.to_string());
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

/// Appends each row as a line to one of three writers.
#[derive(Debug)]
pub struct CsvTelemetry<W: Write> {
    round_summary: W,
    player_outcome: W,
    pause_metrics: W,
}

impl<W: Write> CsvTelemetry<W> {
    pub fn new(round_summary: W, player_outcome: W, pause_metrics: W) -> Self {
        Self {
            round_summary,
            player_outcome,
            pause_metrics,
        }
    }

    pub fn into_inner(self) -> (W, W, W) {
        (self.round_summary, self.player_outcome, self.pause_metrics)
    }
}

fn write_line(writer: &mut impl Write, stream: &str, row: &str) {
    if let Err(e) = writeln!(writer, "{row}") {
        log::warn!("Failed to write {stream} telemetry row: {e}");
    }
}

impl<W: Write> TelemetrySink for CsvTelemetry<W> {
    fn write_round_summary(&mut self, row: &str) {
        write_line(&mut self.round_summary, "round summary", row);
    }

    fn write_player_outcome(&mut self, row: &str) {
        write_line(&mut self.player_outcome, "player outcome", row);
    }

    fn write_pause_metrics(&mut self, row: &str) {
        write_line(&mut self.pause_metrics, "pause metrics", row);
    }

    fn flush(&mut self) {
        for (stream, writer) in [
            ("round summary", &mut self.round_summary),
            ("player outcome", &mut self.player_outcome),
            ("pause metrics", &mut self.pause_metrics),
        ] {
            if let Err(e) = writer.flush() {
                log::warn!("Failed to flush {stream} telemetry: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_round_summary_keeps_trailing_comma() {
        assert_eq!(round_summary_row(3, &[9, 12, 0]), "3,9,12,0,");
        assert_eq!(round_summary_row(1, &[]), "1,");
    }

    #[test]
    fn test_player_outcome_tags() {
        let row = player_outcome_row(
            2,
            &[(7, Outcome::Won), (1, Outcome::Lost), (2, Outcome::Folded)],
        );
        assert_eq!(row, "2,7 (W) ,1 (L) ,2 (F) ,");
    }

    #[test]
    fn test_pause_metrics_column_order() {
        let counters = PauseCounters {
            resume: 4,
            options: 1,
            sound: 2,
            graphics: 3,
        };
        assert_eq!(pause_metrics_row(&counters), "4,1,2,3");
    }

    #[test]
    fn test_csv_telemetry_writes_lines() {
        let mut sink = CsvTelemetry::new(Vec::new(), Vec::new(), Vec::new());
        sink.write_round_summary("1,5,");
        sink.write_round_summary("2,6,");
        sink.write_pause_metrics("0,0,0,0");
        sink.flush();

        let (rounds, players, pause) = sink.into_inner();
        assert_eq!(String::from_utf8(rounds).unwrap(), "1,5,\n2,6,\n");
        assert!(players.is_empty());
        assert_eq!(String::from_utf8(pause).unwrap(), "0,0,0,0\n");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_write_failures_are_swallowed() {
        let mut sink = CsvTelemetry::new(FailingWriter, FailingWriter, FailingWriter);
        sink.write_player_outcome("1,3 (W) ,");
        sink.flush();
    }
}
