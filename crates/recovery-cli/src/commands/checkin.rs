use clap::Subcommand;
use recovery_core::{Action, CheckIn, Config, Noise, Situation, TimeSlot};

use super::{open_app, print_json, CliResult};

fn score_arg() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(0..=10)
}

#[derive(Subcommand)]
pub enum CheckinAction {
    /// Print the last check-in (or the default one)
    Show,
    /// Record a check-in; omitted fields keep their previous values
    Set {
        /// meeting_pre, afternoon_crash, stuck or before_leave
        #[arg(long)]
        situation: Option<Situation>,
        /// Available minutes: 3, 10 or 30
        #[arg(long)]
        time: Option<TimeSlot>,
        /// quiet, normal or loud
        #[arg(long)]
        noise: Option<Noise>,
        #[arg(long, value_parser = score_arg())]
        energy: Option<u8>,
        #[arg(long, value_parser = score_arg())]
        tension: Option<u8>,
        #[arg(long, value_parser = score_arg())]
        overheat: Option<u8>,
        #[arg(long, value_parser = score_arg())]
        urgency: Option<u8>,
        #[arg(long)]
        alone: Option<bool>,
        #[arg(long)]
        privacy: Option<bool>,
        #[arg(long)]
        walkable: Option<bool>,
    },
}

pub fn run(action: CheckinAction) -> CliResult {
    let mut app = open_app(&Config::load_or_default())?;
    match action {
        CheckinAction::Show => match app.state().last_checkin {
            Some(last) => print_json(&last)?,
            None => print_json(&CheckIn::default())?,
        },
        CheckinAction::Set {
            situation,
            time,
            noise,
            energy,
            tension,
            overheat,
            urgency,
            alone,
            privacy,
            walkable,
        } => {
            let prev = app.current_checkin();
            let checkin = CheckIn {
                situation: situation.unwrap_or(prev.situation),
                time_slot: time.unwrap_or(prev.time_slot),
                noise: noise.unwrap_or(prev.noise),
                energy: energy.unwrap_or(prev.energy),
                tension: tension.unwrap_or(prev.tension),
                overheat: overheat.unwrap_or(prev.overheat),
                urgency: urgency.unwrap_or(prev.urgency),
                alone: alone.unwrap_or(prev.alone),
                privacy: privacy.unwrap_or(prev.privacy),
                walkable: walkable.unwrap_or(prev.walkable),
            };
            if checkin.time_slot.requires_pro() && !app.state().is_pro {
                eprintln!("note: {}-minute routines require pro", checkin.time_slot);
            }
            app.dispatch(Action::SubmitCheckIn(checkin))?;
            if let Some(last) = app.state().last_checkin {
                print_json(&last)?;
            }
        }
    }
    Ok(())
}
