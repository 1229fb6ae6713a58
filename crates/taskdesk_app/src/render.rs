//! Terminal output for the session. Log lines go through the logger; these
//! prints are the product output on stdout/stderr.

use taskdesk_core::SessionView;

const BAR_WIDTH: usize = 24;

pub fn render_status(view: &SessionView) {
    println!(
        "[{}] {:>3}% {}",
        progress_bar(view.progress),
        view.progress,
        view.message
    );
}

/// Print detail lines not yet shown; returns the new shown count. Details
/// only ever grow within one task.
pub fn render_detail_delta(details: &[String], shown: usize) -> usize {
    for detail in details.iter().skip(shown) {
        println!("    - {detail}");
    }
    details.len()
}

/// Print the unseen tail of the server stream log; returns the new shown
/// byte offset. The log is replaced wholesale by each snapshot, not
/// appended to, so the remembered offset is only a hint: whenever it does
/// not land on a char boundary of the new log (shrunk log, or rewritten
/// content), the delta restarts from zero.
pub fn render_stream_delta(stream_log: &str, shown: usize) -> usize {
    let start = if shown <= stream_log.len() && stream_log.is_char_boundary(shown) {
        shown
    } else {
        0
    };
    let fresh = &stream_log[start..];
    if !fresh.is_empty() {
        for line in fresh.lines() {
            println!("    | {line}");
        }
    }
    stream_log.len()
}

pub fn render_summary(view: &SessionView) {
    println!("[{}] 100% processing complete", progress_bar(100));
    for (name, value) in &view.summary {
        println!("  {name}: {value}");
    }
    if !view.issues.is_empty() {
        println!("  issues:");
        for issue in &view.issues {
            println!("    - {issue}");
        }
    }
    if !view.artifacts.is_empty() {
        println!("fetching {} artifact(s)...", view.artifacts.len());
    }
}

pub fn render_failure(view: &SessionView) {
    eprintln!(
        "task failed: {}",
        view.error.as_deref().unwrap_or("unknown error")
    );
    if !view.stream_log.is_empty() {
        eprintln!("--- server log ---");
        eprintln!("{}", view.stream_log);
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    let mut bar = String::with_capacity(BAR_WIDTH);
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::{progress_bar, render_stream_delta};

    #[test]
    fn bar_endpoints() {
        assert_eq!(progress_bar(0), "-".repeat(24));
        assert_eq!(progress_bar(100), "#".repeat(24));
    }

    #[test]
    fn stream_delta_tracks_offset() {
        let first = "line one\n";
        let shown = render_stream_delta(first, 0);
        assert_eq!(shown, first.len());

        let grown = "line one\nline two\n";
        let shown = render_stream_delta(grown, shown);
        assert_eq!(shown, grown.len());

        // A shorter log means a fresh task; the offset restarts.
        let fresh = "new\n";
        assert_eq!(render_stream_delta(fresh, shown), fresh.len());
    }

    #[test]
    fn rewritten_multibyte_log_restarts_the_offset() {
        let shown = render_stream_delta("abcd", 0);
        assert_eq!(shown, 4);

        // The snapshot replaced the log wholesale with CJK text; the old
        // offset falls inside a character and must not be sliced at.
        let replaced = "中中中";
        assert_eq!(render_stream_delta(replaced, shown), replaced.len());
    }
}
