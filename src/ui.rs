use colored::*;
use jiff::Timestamp;

use crate::models::{status::Status, store::TaskStore, task::Task};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the glyph for a task's column
pub fn get_status_glyph(status: Status) -> ColoredString {
    match status {
        Status::Pending => "○".normal(),
        Status::Processing => "◐".yellow(),
        Status::Done => "✓".dimmed(),
    }
}

/// Column title shown above each group of tasks
pub fn get_column_title(status: Status) -> &'static str {
    match status {
        Status::Pending => "PENDING",
        Status::Processing => "PROCESSING",
        Status::Done => "DONE",
    }
}

/// Render the whole board, one section per status in chain order
pub fn render_board(store: &TaskStore) {
    let selected_id = store.selected_task().map(|t| t.id);

    if store.task_count() == 0 {
        println!("No tasks yet. Use 'add <title>' to create one.");
        return;
    }

    for status in Status::ALL {
        let tasks: Vec<_> = store.tasks().iter().filter(|t| t.status == status).collect();
        render_view_header(get_column_title(status), tasks.len());

        for task in tasks {
            render_task_line(task, selected_id == Some(task.id));
        }
    }
    println!();
}

/// Render a single task line with id, glyph, title, and right-aligned labels
pub fn render_task_line(task: &Task, is_selected: bool) {
    let terminal_width = get_terminal_width();

    let marker = if is_selected { "›" } else { " " };
    let id_str = format!("{:>3}", task.id);
    let glyph = get_status_glyph(task.status);

    let left_section = format!(" {} {}  {}  {}", marker, id_str, glyph, task.title);
    let styled_left = if task.status == Status::Done {
        left_section.dimmed()
    } else if is_selected {
        left_section.bold().underline()
    } else {
        left_section.bold()
    };

    let right_section = task.labels.join(", ");
    if right_section.is_empty() {
        println!("{}", styled_left);
        return;
    }

    // Glyphs are a single column wide, so count chars rather than bytes
    let left_visible_len = format!(" {} {}  {}  {}", marker, id_str, " ", task.title)
        .chars()
        .count();
    let right_visible_len = right_section.chars().count();
    let total_content = left_visible_len + right_visible_len;

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!(
            "{}{}{}",
            styled_left,
            " ".repeat(padding),
            right_section.dimmed()
        );
    } else {
        // Not enough space for right alignment, just print normally
        println!("{}", styled_left);
    }
}

/// Render every field of a task, including attachments and comments
pub fn render_task_detail(task: &Task) {
    println!(
        "\n  {} {}  {}",
        format!("#{}", task.id).dimmed(),
        task.title.bold(),
        get_status_glyph(task.status)
    );
    println!("  {} {}", "Status:".dimmed(), task.status);

    if !task.description.is_empty() {
        println!();
        for line in task.description.lines() {
            println!("  {}", line);
        }
    }

    if !task.labels.is_empty() {
        println!("\n  {} {}", "Labels:".dimmed(), task.labels.join(", ").cyan());
    }

    if !task.attachments.is_empty() {
        render_section_header("Attachments");
        for attachment in &task.attachments {
            println!("  📎 {}", attachment);
        }
    }

    if !task.comments.is_empty() {
        render_section_header("Comments");
        for comment in &task.comments {
            println!(
                "  {}  {}",
                format_comment_time(comment.created_at).dimmed(),
                comment.content
            );
        }
    }
    println!();
}

/// Render search results as plain task lines
pub fn render_search_results(term: &str, tasks: &[&Task]) {
    let title = if term.is_empty() {
        String::from("ALL TASKS")
    } else {
        format!("SEARCH \"{}\"", term)
    };
    render_view_header(&title, tasks.len());

    if tasks.is_empty() {
        println!("  {}", "No matching tasks".dimmed());
    }
    for task in tasks {
        render_task_line(task, false);
    }
    println!();
}

/// Render per-status task counts
pub fn render_counts(store: &TaskStore) {
    for status in Status::ALL {
        println!(
            "  {} {:<12} {}",
            get_status_glyph(status),
            status.as_str(),
            store.count_by_status(status)
        );
    }
    println!("  {:<14} {}", "total".dimmed(), store.task_count());
}

/// Render the reference label set
pub fn render_labels(labels: &[String]) {
    render_view_header("LABELS", labels.len());
    for label in labels {
        println!("  {} {}", "•".green(), label);
    }
    println!();
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// Render a section header (e.g., "Comments")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Format a comment timestamp for display (e.g., "Today 14:03", "Feb 15 09:10")
pub fn format_comment_time(timestamp: Timestamp) -> String {
    let zoned = jiff::Zoned::new(timestamp, jiff::tz::TimeZone::system());
    let today = jiff::Zoned::now().date();

    if zoned.date() == today {
        zoned.strftime("Today %H:%M").to_string()
    } else {
        zoned.strftime("%b %d %H:%M").to_string()
    }
}
