use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use recovery_core::session::validate_rating;
use recovery_core::{
    format_clock, Action, Admission, Clock, CompletedRun, Config, Event, HelpfulTag, Outcome,
    Rating, Routine, Ticker, TimeSlot,
};

use super::{load_catalog, open_app, print_json, CliResult};

#[derive(Args)]
pub struct PlayArgs {
    /// Routine id, e.g. MEET_3M_001
    pub id: String,
    /// How you feel before starting (0-10)
    #[arg(long)]
    pub before: i64,
    /// How you feel afterwards (0-10); asked interactively when omitted
    #[arg(long)]
    pub after: Option<i64>,
    /// What helped most
    #[arg(long, default_value = "breathing")]
    pub tag: HelpfulTag,
    /// Length of one countdown second, in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,
}

pub fn run(args: PlayArgs) -> CliResult {
    let config = Config::load_or_default();
    let catalog = load_catalog(&config)?;
    let mut app = open_app(&config)?;

    let routine = catalog.require(&args.id)?.clone();
    validate_rating("before", args.before)?;
    if let Some(after) = args.after {
        validate_rating("after", after)?;
    }
    let slot = TimeSlot::from_minutes(routine.duration_min).ok_or_else(|| {
        format!(
            "routine {} lasts {} minutes, which is not a bookable time slot",
            routine.id, routine.duration_min
        )
    })?;

    match app.dispatch(Action::RequestStart(slot))? {
        Outcome::Start(Admission::Granted) => {}
        Outcome::Start(Admission::DailyLimitReached { used, limit }) => {
            return Err(format!(
                "free daily limit reached ({used}/{limit}); try again tomorrow or run `recovery-cli pro on`"
            )
            .into());
        }
        Outcome::Start(Admission::ProOnly { slot }) => {
            return Err(format!("{slot}-minute routines require pro").into());
        }
        Outcome::ConsentRequired => {
            return Err("consent required: run `recovery-cli consent` first".into());
        }
        other => return Err(format!("unexpected outcome: {other:?}").into()),
    }

    tracing::debug!(routine_id = %routine.id, remaining = ?app.remaining_free_starts(), "start admitted");

    let checkin = app.current_checkin();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let period = Duration::from_millis(args.tick_ms.max(1));
    let Some(run) = runtime.block_on(play(routine, period, app.shared_clock())) else {
        eprintln!("routine abandoned; no session recorded");
        return Ok(());
    };

    let after = match args.after {
        Some(after) => after,
        None => prompt_after()?,
    };
    let outcome = app.dispatch(Action::CompleteSession {
        run,
        checkin,
        rating: Rating::new(args.before, after).with_tag(args.tag),
    })?;
    if let Outcome::Recorded(session) = outcome {
        print_json(&session)?;
    }
    Ok(())
}

/// Run the routine to completion. `None` when interrupted with Ctrl-C.
async fn play(routine: Routine, period: Duration, clock: Arc<dyn Clock>) -> Option<CompletedRun> {
    let step_count = routine.steps.len();
    let first = routine.steps.first().map(|s| (s.text.clone(), s.seconds));
    let (mut ticker, mut events) = Ticker::with_clock(period, clock);

    eprintln!("{} ({})", routine.title, format_clock(routine.total_seconds()));
    ticker.start(routine).await;
    if let Some((text, seconds)) = first {
        eprintln!("  1/{step_count} [{}] {text}", format_clock(seconds));
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(Event::StepAdvanced { step_index, step_text, step_secs, .. }) => {
                    eprintln!("  {}/{step_count} [{}] {step_text}", step_index + 1, format_clock(step_secs));
                }
                Some(Event::RoutineCompleted { .. }) => {
                    eprintln!("done");
                    return ticker.completion().await;
                }
                Some(_) => {}
                None => return None,
            },
            _ = tokio::signal::ctrl_c() => {
                ticker.exit().await;
                return None;
            }
        }
    }
}

fn prompt_after() -> Result<i64, Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    loop {
        eprint!("How do you feel now (0-10)? ");
        std::io::stderr().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err("no rating given".into());
        }
        match line.trim().parse::<i64>() {
            Ok(value) if validate_rating("after", value).is_ok() => return Ok(value),
            _ => eprintln!("please enter a whole number from 0 to 10"),
        }
    }
}
