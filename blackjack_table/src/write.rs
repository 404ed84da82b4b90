use crate::stats::SessionStats;
use std::io::Write;

const WIDTH: usize = 60;

/// Writes `stats` as a framed text table to `writer`.
pub fn write_summary(stats: &SessionStats, mut writer: impl Write) -> std::io::Result<()> {
    writeln!(writer, "{:-^WIDTH$}", "session summary")?;
    write!(writer, "{}", stats)?;
    writeln!(writer, "{}", "-".repeat(WIDTH))?;
    writer.flush()
}

/// Writes `stats` as pretty printed JSON to `writer`.
pub fn write_summary_json(stats: &SessionStats, mut writer: impl Write) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, stats)?;
    writeln!(writer)?;
    writer.flush()
}
