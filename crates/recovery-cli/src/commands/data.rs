use std::path::PathBuf;

use recovery_core::{Action, Config};

use super::{open_app, CliResult};

pub fn export(out: Option<PathBuf>) -> CliResult {
    let app = open_app(&Config::load_or_default())?;
    let json = app.state().export_json()?;
    match out {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("exported to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn reset() -> CliResult {
    let mut app = open_app(&Config::load_or_default())?;
    app.dispatch(Action::Reset)?;
    println!("all stored data cleared");
    Ok(())
}
