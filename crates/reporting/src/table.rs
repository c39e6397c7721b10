// In crates/reporting/src/table.rs

use crate::display::{DisplayRow, SummaryDisplay};
const HEADERS: [&str; 9] = [
    "Spread",
    "Entry Date",
    "Size",
    "P&L (USD)",
    "P&L %",
    "Status",
    "To Target",
    "To Stop",
    "Time Stop",
];

/// Renders the portfolio summary and position detail as a plain-text table.
pub fn render_table(rows: &[DisplayRow], summary: &SummaryDisplay) -> String {
    let cells: Vec<[&str; 9]> = rows
        .iter()
        .map(|r| {
            [
                r.spread_name.as_str(),
                r.entry_date.as_str(),
                r.size.as_str(),
                r.pnl_usd.as_str(),
                r.pnl_pct.as_str(),
                r.status.as_str(),
                r.prox_profit_target_pct.as_str(),
                r.prox_stop_loss_pct.as_str(),
                r.prox_time_stop.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!(
        "--- Portfolio Summary ---\n\
         Total P&L (USD):      {}\n\
         % of Capital at Risk: {}\n\
         Number of Trades:     {}\n\
         \n\
         --- Position Detail ---\n",
        summary.total_pnl_usd, summary.pct_capital_at_risk, summary.trade_count
    );

    push_line(&mut out, &HEADERS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_refs: Vec<&str> = rule.iter().map(String::as_str).collect();
    push_line(&mut out, &rule_refs, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            // Text columns are left-aligned, numbers right-aligned.
            if i <= 1 || i == 5 {
                format!("{:<width$}", cell, width = *width)
            } else {
                format!("{:>width$}", cell, width = *width)
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_summary_and_aligned_rows() {
        let rows = vec![DisplayRow {
            trade_id: 1,
            spread_name: "CAPI/PANA Q4".to_string(),
            entry_date: "2025-09-15".to_string(),
            size: "8".to_string(),
            pnl_usd: "$12,500.00".to_string(),
            pnl_pct: "31.25%".to_string(),
            status: "OK".to_string(),
            prox_profit_target_pct: "87%".to_string(),
            prox_stop_loss_pct: "0%".to_string(),
            prox_time_stop: "33 / 45 days".to_string(),
        }];
        let summary = SummaryDisplay {
            total_pnl_usd: "$12,500.00".to_string(),
            pct_capital_at_risk: "0.00%".to_string(),
            trade_count: "1".to_string(),
        };

        let table = render_table(&rows, &summary);
        assert!(table.contains("Total P&L (USD):      $12,500.00"));
        assert!(table.contains("Number of Trades:     1"));

        let lines: Vec<&str> = table.lines().collect();
        let header = lines.iter().position(|l| l.starts_with("Spread")).unwrap();
        let data = lines[header + 2];
        assert!(data.starts_with("CAPI/PANA Q4"));
        assert!(data.ends_with("33 / 45 days"));
        // Columns line up with their headers.
        assert_eq!(lines[header].find("Entry Date"), data.find("2025-09-15"));
    }
}
