//! CSV telemetry files on disk.

use anyhow::{Context, Result};
use card_table::telemetry::{CsvTelemetry, PAUSE_METRICS_HEADER};
use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

pub const ROUND_SUMMARY_FILE: &str = "round_summary.csv";
pub const PLAYER_OUTCOME_FILE: &str = "player_outcome.csv";
pub const PAUSE_METRICS_FILE: &str = "pause_metrics.csv";

pub type FileTelemetry = CsvTelemetry<BufWriter<File>>;

/// Open the three telemetry files in `dir` for appending, creating the
/// directory if needed.
pub fn open(dir: &Path) -> Result<FileTelemetry> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create telemetry directory {}", dir.display()))?;

    let round_summary = append(&dir.join(ROUND_SUMMARY_FILE), None)?;
    let player_outcome = append(&dir.join(PLAYER_OUTCOME_FILE), None)?;
    let pause_metrics = append(&dir.join(PAUSE_METRICS_FILE), Some(PAUSE_METRICS_HEADER))?;

    log::info!("Writing telemetry to {}", dir.display());
    Ok(CsvTelemetry::new(round_summary, player_outcome, pause_metrics))
}

/// The header goes in only when the file is new.
fn append(path: &Path, header: Option<&str>) -> Result<BufWriter<File>> {
    let created = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    if let (true, Some(header)) = (created, header) {
        writeln!(writer, "{header}")
            .with_context(|| format!("Failed to write header to {}", path.display()))?;
    }
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_table::telemetry::TelemetrySink;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("ct_sim_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_rows_land_in_their_files() {
        let dir = scratch_dir("rows");
        let mut sink = open(&dir).unwrap();
        sink.write_round_summary("1,9,12,");
        sink.write_player_outcome("1,4 (L) ,6 (W) ,");
        sink.write_pause_metrics("2,1,0,1");
        sink.flush();
        drop(sink);

        let rounds = fs::read_to_string(dir.join(ROUND_SUMMARY_FILE)).unwrap();
        let players = fs::read_to_string(dir.join(PLAYER_OUTCOME_FILE)).unwrap();
        let pause = fs::read_to_string(dir.join(PAUSE_METRICS_FILE)).unwrap();
        assert_eq!(rounds, "1,9,12,\n");
        assert_eq!(players, "1,4 (L) ,6 (W) ,\n");
        assert_eq!(pause, format!("{PAUSE_METRICS_HEADER}\n2,1,0,1\n"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_reopening_appends_without_second_header() {
        let dir = scratch_dir("append");
        for row in ["1,0,0,0", "3,1,1,1"] {
            let mut sink = open(&dir).unwrap();
            sink.write_pause_metrics(row);
            sink.flush();
        }

        let pause = fs::read_to_string(dir.join(PAUSE_METRICS_FILE)).unwrap();
        assert_eq!(pause, format!("{PAUSE_METRICS_HEADER}\n1,0,0,0\n3,1,1,1\n"));

        let _ = fs::remove_dir_all(&dir);
    }
}
