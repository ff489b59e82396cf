use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use website_builder::api::{CmdMessage, ListedVersion, MessageLevel};
use website_builder::config::BuilderConfig;

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_versions(versions: &[ListedVersion]) {
    for version in versions {
        let idx_str = format!("{:>4}. ", version.index);
        let time_ago = format_time_ago(&version.timestamp);

        let preview: String = version
            .content
            .chars()
            .take(LINE_WIDTH)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();

        let fixed_width = idx_str.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let preview = truncate_to_width(preview.trim(), available);
        let padding = available.saturating_sub(preview.width());

        println!(
            "{}{}{}{}",
            idx_str.yellow(),
            preview,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_full_versions(versions: &[ListedVersion]) {
    for (i, version) in versions.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {}",
            format!("{}.", version.index).yellow(),
            version.timestamp.bold()
        );
        println!("--------------------------------");
        println!("{}", version.content);
    }
}

pub(super) fn print_backups(names: &[String]) {
    for name in names {
        println!("{}", name);
    }
}

pub(super) fn print_config(config: &BuilderConfig) {
    for key in BuilderConfig::KEYS {
        let value = config.get(key).unwrap_or_default();
        println!("{} = {}", key.bold(), value);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

/// Version timestamps are naive local time; unparseable ones print as-is.
fn format_time_ago(timestamp: &str) -> String {
    let parsed = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f");
    let time_str = match parsed {
        Ok(at) => {
            let duration = Local::now().naive_local().signed_duration_since(at);
            Formatter::new().convert(duration.to_std().unwrap_or_default())
        }
        Err(_) => timestamp.to_string(),
    };
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
