//! HTML dashboard.
//!
//! A pure function of the run report. Every feed-provided value is escaped.

use std::fmt::Write;

use chrono::SecondsFormat;

use crate::enrich::EnrichedRecord;
use crate::pipeline::PipelineReport;
use crate::utils::escape_html;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;background:#f6f7f9;color:#222}\
table{border-collapse:collapse;width:100%;background:#fff}\
th,td{padding:.5rem .75rem;border-bottom:1px solid #e3e5e8;text-align:left;font-size:.9rem}\
th{background:#2d3e50;color:#fff}\
.dot{display:inline-block;width:.7rem;height:.7rem;border-radius:50%}\
.ok{background:#2ecc71}.expired{background:#e74c3c}.unknown{background:#95a5a6}\
footer{margin-top:1rem;font-size:.8rem;color:#666}";

/// Renders the dashboard page for `report`.
pub fn render_dashboard(report: &PipelineReport) -> String {
    let title = escape_html(&report.site.sitename);
    let mut html = String::with_capacity(4096 + report.records.len() * 512);

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <table>\n<thead><tr><th>Status</th><th>IP</th><th>ASN</th><th>Location</th>\
         <th>Provider</th><th>Start</th><th>Expires</th><th>Days left</th><th>Price</th>\
         <th>Residual value</th></tr></thead>\n<tbody>\n"
    );
    for record in &report.records {
        render_row(&mut html, record);
    }
    let _ = write!(
        html,
        "</tbody>\n</table>\n<footer>1 USD = {:.4} CNY, rate as of {}{}</footer>\n</body>\n</html>\n",
        report.rate.rate_cny,
        report.rate.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        if report.rate.is_fallback() {
            " (fallback)"
        } else {
            ""
        }
    );
    html
}

fn render_row(html: &mut String, record: &EnrichedRecord) {
    let status = match record.days_remaining {
        None => "unknown",
        Some(_) if record.is_expired => "expired",
        Some(_) => "ok",
    };
    let provider = if record.vps.store_url.trim().is_empty() {
        escape_html(&record.vps.store)
    } else {
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            escape_html(&record.vps.store_url),
            escape_html(&record.vps.store)
        )
    };
    let days = record
        .days_remaining
        .map(|d| d.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let _ = writeln!(
        html,
        "<tr><td><span class=\"dot {status}\" title=\"{status}\"></span></td>\
         <td>{}</td><td>{}</td><td>{} | {}</td><td>{provider}</td><td>{}</td><td>{}</td>\
         <td>{days}</td><td>{}</td><td>{}</td></tr>",
        escape_html(&record.vps.ip),
        escape_html(&record.asn),
        escape_html(&record.country_code),
        escape_html(&record.city),
        escape_html(&record.vps.startday),
        escape_html(&record.vps.endday),
        escape_html(&record.vps.price),
        record.residual,
    );
}
