use ferrous_replay_domain::ReplayReport;
use std::fmt::Write;

pub fn render_text(report: &ReplayReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Records read: {}", report.records_read);
    let _ = writeln!(out, "Records skipped: {}", report.records_skipped);
    let _ = writeln!(out, "Successful responses: {}", report.success_count);
    let _ = writeln!(out, "Failed queries: {}", report.error_count);
    let _ = writeln!(out, "Retried over TCP: {}", report.tcp_retry_count);
    let _ = writeln!(out, "Total dispatched, incl. TCP retries: {}", report.total_dispatched);
    let _ = writeln!(out, "Mean RTT: {:?}", report.mean_rtt);
    let _ = writeln!(out, "Max RTT: {:?}", report.max_rtt);
    let _ = writeln!(out, "Execution time: {:?}", report.elapsed);

    if !report.rcode_counts.is_empty() {
        let _ = writeln!(out, "\nResponse codes");
        for (rcode, count) in &report.rcode_counts {
            let _ = writeln!(out, "  {:<10} {}", rcode, count);
        }
    }

    if !report.errors_by_kind.is_empty() {
        let _ = writeln!(out, "\nErrors");
        for (kind, count) in &report.errors_by_kind {
            let _ = writeln!(out, "  {:<10} {}", kind, count);
        }
    }

    out
}

pub fn render_json(report: &ReplayReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
