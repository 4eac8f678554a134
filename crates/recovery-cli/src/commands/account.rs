use clap::Subcommand;
use recovery_core::{Action, Config, Profile};

use super::{open_app, print_json, CliResult};

const NOTICE: &str = "These routines are short self-care breaks. They do not diagnose, \
treat or prevent any condition. If you feel unwell, talk to a professional.";

#[derive(Subcommand)]
pub enum ProAction {
    /// Enable Pro (unlimited starts, 30-minute routines)
    On,
    /// Disable Pro
    Off,
    /// Show the Pro flag and today's free starts
    Status,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the profile as JSON
    Show,
    /// Update profile fields
    Set {
        #[arg(long)]
        job_type: Option<String>,
        #[arg(long)]
        work_style: Option<String>,
    },
}

pub fn consent(revoke: bool) -> CliResult {
    let mut app = open_app(&Config::load_or_default())?;
    app.dispatch(Action::SetConsent(!revoke))?;
    if revoke {
        println!("consent revoked");
    } else {
        println!("{NOTICE}");
        println!("consent recorded");
    }
    Ok(())
}

pub fn run_pro(action: ProAction) -> CliResult {
    let mut app = open_app(&Config::load_or_default())?;
    match action {
        ProAction::On => {
            app.dispatch(Action::SetPro(true))?;
            println!("pro enabled");
        }
        ProAction::Off => {
            app.dispatch(Action::SetPro(false))?;
            println!("pro disabled");
        }
        ProAction::Status => {
            print_json(&serde_json::json!({
                "isPro": app.state().is_pro,
                "remainingFreeStarts": app.remaining_free_starts(),
            }))?;
        }
    }
    Ok(())
}

pub fn run_profile(action: ProfileAction) -> CliResult {
    let mut app = open_app(&Config::load_or_default())?;
    match action {
        ProfileAction::Show => print_json(&app.state().profile)?,
        ProfileAction::Set {
            job_type,
            work_style,
        } => {
            let current = app.state().profile.clone();
            let profile = Profile {
                job_type: job_type.unwrap_or(current.job_type),
                work_style: work_style.unwrap_or(current.work_style),
            };
            app.dispatch(Action::SetProfile(profile))?;
            print_json(&app.state().profile)?;
        }
    }
    Ok(())
}
