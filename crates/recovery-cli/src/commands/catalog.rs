use std::path::PathBuf;

use clap::Subcommand;
use recovery_core::{Catalog, Config, Situation, TimeSlot};

use super::{load_catalog, print_json, CliResult};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List routines
    List {
        #[arg(long)]
        situation: Option<Situation>,
        #[arg(long)]
        time: Option<TimeSlot>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print one routine as JSON
    Show {
        id: String,
    },
    /// Check a catalog file for problems
    Validate {
        /// Catalog to check (defaults to the configured one)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run(action: CatalogAction) -> CliResult {
    let config = Config::load_or_default();
    match action {
        CatalogAction::List {
            situation,
            time,
            json,
        } => {
            let catalog = load_catalog(&config)?;
            let routines = catalog.select(situation, time.map(TimeSlot::minutes));
            if json {
                print_json(&routines)?;
            } else {
                for r in routines {
                    println!(
                        "{:<14} {:>3}m  {:<16} {:<9} {}",
                        r.id,
                        r.duration_min,
                        r.situation.key(),
                        r.recovery_type.key(),
                        r.title
                    );
                }
            }
        }
        CatalogAction::Show { id } => {
            let catalog = load_catalog(&config)?;
            print_json(catalog.require(&id)?)?;
        }
        CatalogAction::Validate { path } => {
            let catalog = match path {
                Some(path) => Catalog::from_path(&path)?,
                None => load_catalog(&config)?,
            };
            let issues = catalog.validate();
            if issues.is_empty() {
                println!("ok: {} routines", catalog.len());
            } else {
                print_json(&issues)?;
                return Err(format!("{} issue(s) found", issues.len()).into());
            }
        }
    }
    Ok(())
}
