use chrono::{DateTime, Utc};
use colored::Colorize;
use ppocket::api::{CmdMessage, MessageLevel};
use ppocket::model::Item;
use timeago::Formatter;
use unicode_width::UnicodeWidthChar;

const TITLE_WIDTH: usize = 80;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_welcome(username: &str) {
    if username.is_empty() {
        println!("Welcome to PPocket");
    } else {
        println!("Welcome to PPocket {}", username.bold());
    }
}

pub(super) fn print_items(items: &[Item], words_per_minute: u32) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }

    let now = Utc::now();
    for item in items {
        let title = truncate_to_width(item.title(), TITLE_WIDTH);
        println!("* {} => {}", title.bold(), item.url().cyan());
        for tag in item.tag_names() {
            println!("\t- {}", tag);
        }
        println!("\t{}\n", summary_line(item, words_per_minute, now).dimmed());
    }
}

/// `[<minutes> min | status: <status> | favorite: <flag>]`, plus how long ago
/// the item was saved when the service told us.
fn summary_line(item: &Item, words_per_minute: u32, now: DateTime<Utc>) -> String {
    let minutes = item
        .reading_minutes(words_per_minute)
        .map(|m| m.to_string())
        .unwrap_or_else(|| "?".to_string());
    let status = item
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let mut line = format!(
        "[{} min | status: {} | favorite: {}]",
        minutes, status, item.favorite
    );
    if let Some(added) = item.added_at() {
        line.push_str(&format!(" saved {}", format_time_ago(added, now)));
    }
    line
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
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
