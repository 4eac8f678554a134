use recovery_core::{recommend, CheckIn, Config, Routine, TypeScores};
use serde::Serialize;

use super::{load_catalog, open_app, print_json, CliResult};

#[derive(Serialize)]
struct RecommendView<'a> {
    checkin: CheckIn,
    scores: &'a TypeScores,
    routines: &'a [&'a Routine],
    remaining_free_starts: Option<u32>,
}

pub fn run(all: bool) -> CliResult {
    let config = Config::load_or_default();
    let catalog = load_catalog(&config)?;
    let app = open_app(&config)?;

    let checkin = app.current_checkin();
    let recs = recommend(&catalog, &checkin, config.recommend.top_n);
    if recs.is_empty() {
        eprintln!(
            "no routine fits a {}-minute {} check-in; try another time slot, noise level or setting",
            checkin.time_slot,
            checkin.situation.label().to_lowercase()
        );
    }

    let routines = if all { &recs.browse } else { &recs.recommended };
    print_json(&RecommendView {
        checkin,
        scores: &recs.scores,
        routines,
        remaining_free_starts: app.remaining_free_starts(),
    })
}
