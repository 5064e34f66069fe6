use colored::Colorize;
use leadgather_scanner::ListingRecord;

pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Shorten to `max_chars` characters with a trailing ellipsis. Display only;
/// exported records always carry the full text.
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars).collect();
    shortened.push_str("...");
    shortened
}

pub fn render_summary(records: &[ListingRecord]) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "{} {}\n",
        "Total listings:".bright_white().bold(),
        records.len()
    ));
    report.push_str(&format!("{}\n\n", "═".repeat(60).bright_blue()));

    for record in records {
        let title = if record.title.is_empty() {
            "(untitled)"
        } else {
            record.title.as_str()
        };
        report.push_str(&format!("[{}] {}\n", record.index, title.bold()));
        report.push_str(&format!("  {} {}\n", "Price:".cyan(), record.price));
        report.push_str(&format!("  {} {}\n", "Location:".cyan(), record.location));

        if !record.revenue.is_empty() {
            report.push_str(&format!("  {} {}\n", "Revenue:".cyan(), record.revenue));
        }
        if !record.cash_flow.is_empty() {
            report.push_str(&format!("  {} {}\n", "Cash Flow:".cyan(), record.cash_flow));
        }
        if !record.link.is_empty() {
            report.push_str(&format!("  {} {}\n", "Link:".cyan(), record.link));
        }
        if !record.description.is_empty() {
            report.push_str(&format!(
                "  {} {}\n",
                "Description:".cyan(),
                truncate_for_display(&record.description, DESCRIPTION_PREVIEW_CHARS)
            ));
        }

        report.push_str(&format!("{}\n", "─".repeat(60)));
    }

    report
}

pub fn print_summary(records: &[ListingRecord]) {
    print!("{}", render_summary(records));
}
