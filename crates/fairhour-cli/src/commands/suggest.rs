use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use fairhour_core::top_suggestions;

use crate::commands::heatmap::gather_participants;
use crate::common;

#[derive(Args)]
pub struct SuggestArgs {
    /// Candidate date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
    /// Participant as id:zone:country (repeatable)
    #[arg(long = "participant")]
    pub participants: Vec<String>,
    /// JSON file with a participant array
    #[arg(long, conflicts_with = "participants")]
    pub participants_file: Option<PathBuf>,
    /// TOML file mapping country codes to working-hours configs
    #[arg(long)]
    pub work_config: Option<PathBuf>,
    /// Number of suggestions to show
    #[arg(long, default_value_t = 3)]
    pub count: usize,
    /// Emit JSON instead of the ranked list
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SuggestArgs) -> Result<(), Box<dyn Error>> {
    let participants = gather_participants(&args.participants, args.participants_file.as_ref())?;
    let generator = common::build_generator(args.work_config.as_deref())?;

    let entries = generator.generate(args.date, &participants).await?;
    let suggestions = top_suggestions(&entries, args.count);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    println!("Best meeting hours for {}:", args.date);
    for (rank, entry) in suggestions.iter().enumerate() {
        let breakdown = entry.equity.breakdown;
        println!(
            "{}. {:02}:00 UTC  score {:>3}  (green {}, orange {}, red {}, critical {})",
            rank + 1,
            entry.hour,
            entry.equity.score,
            breakdown.green,
            breakdown.orange,
            breakdown.red,
            breakdown.critical,
        );
    }
    Ok(())
}
