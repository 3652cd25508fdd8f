//! Text rendering of the view model.

use std::fmt::Write;

use obd_core::{AppViewModel, Notice, NoticeLevel, Route};

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    if view.route == Route::SignIn {
        out.push_str("Not signed in. Use: login <username> <password>\n");
        return out;
    }

    let _ = writeln!(
        out,
        "Base: {} uploaded, {} after scrub{}",
        view.total,
        view.final_count,
        if view.busy { " (working...)" } else { "" }
    );
    for row in &view.filters {
        let _ = writeln!(
            out,
            "  {:<9} {:<3} removed {:>8}  {:>5.1}%",
            row.filter.key(),
            if row.enabled { "on" } else { "off" },
            row.removed,
            row.fraction * 100.0
        );
    }
    if let Some(operator) = &view.target_operator {
        let _ = writeln!(out, "  target operator: {operator}");
    }
    for stage in &view.stages {
        let _ = writeln!(
            out,
            "  stage {:<20} {:>8} left ({} removed)",
            stage.stage, stage.count, stage.removed
        );
    }
    if !view.cleaned_preview.is_empty() {
        let _ = writeln!(out, "Preview: {}", view.cleaned_preview.join(", "));
    }
    let _ = writeln!(out, "Campaign: {}", view.campaign_phase);

    if let Some(stats) = &view.db_stats {
        let _ = writeln!(
            out,
            "Reference lists: DND {} / SUB {} / UNSUB {}",
            stats.dnd_count, stats.sub_count, stats.unsub_count
        );
    }
    if let Some(health) = &view.health {
        let _ = writeln!(out, "Health: {} (database {})", health.status, health.database);
        if let Some(target) = &health.connected_to {
            let _ = writeln!(out, "  connected to {target}");
        }
    }
    if !view.history.is_empty() {
        out.push_str("History:\n");
        for entry in &view.history {
            let removed = entry.per_filter_removed;
            let _ = writeln!(
                out,
                "  {}  {} -> {}  (dnd {}, sub {}, unsub {}, operator {})",
                entry.timestamp,
                entry.total_input,
                entry.final_count,
                removed.dnd,
                removed.sub,
                removed.unsub,
                removed.operator
            );
        }
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.text)
}

pub fn print_copy_block(text: &str) {
    println!("----- cleaned list -----");
    println!("{text}");
    println!("------------------------");
}
