use chrono::{DateTime, Utc};

/// Run data captured for the exported report. The platform layer fills this
/// from its view of the job so the engine never reads live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportData {
    pub current: u32,
    pub total: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub entries: Vec<ReportLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub timestamp: String,
    pub label: String,
    pub message: String,
}

/// Deterministic file name for a report generated at `now`.
pub fn report_file_name(now: DateTime<Utc>) -> String {
    format!("courier-report-{}.txt", now.format("%Y%m%d-%H%M%S"))
}

/// Render the plain-text run report.
pub fn render_report(data: &ReportData, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("Courier dispatch report\n");
    out.push_str(&format!("Generated: {}\n", now.format("%Y-%m-%d %H:%M:%S UTC")));
    out.push('\n');
    out.push_str(&format!("Processed: {} / {}\n", data.current, data.total));
    out.push_str(&format!("Successful: {}\n", data.success_count));
    out.push_str(&format!("Failed: {}\n", data.failure_count));
    out.push('\n');
    out.push_str("Activity log:\n");
    if data.entries.is_empty() {
        out.push_str("  (no entries)\n");
    }
    for line in &data.entries {
        out.push_str(&format!(
            "  [{}] {:<7} {}\n",
            line.timestamp, line.label, line.message
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_carries_the_stamp() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 15, 30).unwrap();
        assert_eq!(report_file_name(now), "courier-report-20250301-091530.txt");
    }

    #[test]
    fn report_lists_counts_and_entries() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 15, 30).unwrap();
        let data = ReportData {
            current: 2,
            total: 2,
            success_count: 1,
            failure_count: 1,
            entries: vec![
                ReportLine {
                    timestamp: "09:15:01".to_string(),
                    label: "success".to_string(),
                    message: "✓ sent to 111".to_string(),
                },
                ReportLine {
                    timestamp: "09:15:02".to_string(),
                    label: "error".to_string(),
                    message: "Failed to send to 222".to_string(),
                },
            ],
        };

        let text = render_report(&data, now);
        assert!(text.contains("Processed: 2 / 2"));
        assert!(text.contains("Successful: 1"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("[09:15:01] success ✓ sent to 111"));
    }

    #[test]
    fn empty_log_is_marked() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let data = ReportData {
            current: 0,
            total: 0,
            success_count: 0,
            failure_count: 0,
            entries: Vec::new(),
        };
        assert!(render_report(&data, now).contains("(no entries)"));
    }
}
