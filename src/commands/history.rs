//! Implementation of the `execproc history` command.

use crate::cli::HistoryArgs;
use execproc::error::Result;
use execproc::events::{RunRecord, read_records};

/// Execute the `execproc history` command.
pub fn cmd_history(args: HistoryArgs) -> Result<()> {
    let records = read_records(&args.log)?;

    if records.is_empty() {
        println!("No runs recorded.");
        return Ok(());
    }

    for record in tail(&records, args.tail) {
        println!("{}", format_record(record));
    }

    Ok(())
}

fn tail(records: &[RunRecord], n: usize) -> &[RunRecord] {
    if n == 0 || n >= records.len() {
        records
    } else {
        &records[records.len() - n..]
    }
}

fn format_record(record: &RunRecord) -> String {
    let stages = record.command.lines().count();
    let first = record
        .command
        .lines()
        .next()
        .unwrap_or_default()
        .split_once(" : ")
        .map(|(_, cmd)| cmd.trim_matches('"'))
        .unwrap_or_default();
    let more = if stages > 1 {
        format!(" (+{} stages)", stages - 1)
    } else {
        String::new()
    };

    format!(
        "{}  {}  [{}]  {}{}  {}ms",
        record.ts.format("%Y-%m-%d %H:%M:%S"),
        record.actor,
        record.result,
        first,
        more,
        record.duration_ms
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(command: &str, result: &str) -> RunRecord {
        RunRecord {
            ts: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            actor: "me@box".to_string(),
            command: command.to_string(),
            working_directory: None,
            result: result.to_string(),
            results: result.to_string(),
            duration_ms: 7,
        }
    }

    #[test]
    fn test_format_single_stage() {
        let line = format_record(&record("0 : \"echo hi\"", "0"));
        assert_eq!(line, "2024-05-01 12:30:00  me@box  [0]  echo hi  7ms");
    }

    #[test]
    fn test_format_pipeline() {
        let line = format_record(&record("0 : \"ls\"\n1 : \"wc -l\"", "0"));
        assert!(line.contains("ls (+1 stages)"));
    }

    #[test]
    fn test_tail() {
        let records = vec![record("0 : \"a\"", "0"), record("0 : \"b\"", "1")];
        assert_eq!(tail(&records, 1).len(), 1);
        assert_eq!(tail(&records, 1)[0].result, "1");
        assert_eq!(tail(&records, 0).len(), 2);
        assert_eq!(tail(&records, 5).len(), 2);
    }
}
