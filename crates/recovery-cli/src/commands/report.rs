use recovery_core::{weekly_report, Config};

use super::{open_app, print_json, CliResult};

pub fn report(json: bool) -> CliResult {
    let config = Config::load_or_default();
    let app = open_app(&config)?;
    let report = weekly_report(&app.state().sessions, app.clock().now(), config.report_window());

    if json {
        return print_json(&report);
    }

    println!("last {} days", config.report.window_days);
    println!("  sessions:  {}", report.session_count);
    println!("  avg delta: {:+.1}", report.avg_delta);
    if let Some(situation) = report.top_situation {
        println!("  most common situation: {}", situation.label());
    }
    if !report.top_routines.is_empty() {
        println!("  top routines:");
        for (i, r) in report.top_routines.iter().enumerate() {
            println!(
                "    {}. {} ({}) x{} avg {:+.1}",
                i + 1,
                r.routine_title,
                r.routine_id,
                r.count,
                r.avg_delta
            );
        }
    }
    Ok(())
}

pub fn history(limit: usize) -> CliResult {
    let app = open_app(&Config::load_or_default())?;
    let sessions = &app.state().sessions;
    print_json(&sessions[..limit.min(sessions.len())])
}
