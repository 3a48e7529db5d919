use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use fairhour_core::{render_ascii, Participant};

use crate::common;

#[derive(Args)]
pub struct HeatmapArgs {
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
    /// Emit JSON instead of the ASCII table
    #[arg(long)]
    pub json: bool,
}

pub(crate) fn gather_participants(
    specs: &[String],
    file: Option<&PathBuf>,
) -> Result<Vec<Participant>, Box<dyn Error>> {
    let participants = match file {
        Some(path) => common::load_participants_file(path)?,
        None => common::parse_participants(specs)?,
    };
    if participants.is_empty() {
        return Err("at least one participant is required".into());
    }
    Ok(participants)
}

pub async fn run(args: HeatmapArgs) -> Result<(), Box<dyn Error>> {
    let participants = gather_participants(&args.participants, args.participants_file.as_ref())?;
    let generator = common::build_generator(args.work_config.as_deref())?;

    let entries = generator.generate(args.date, &participants).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*entries)?);
    } else {
        print!("{}", render_ascii(args.date, &entries));
    }
    Ok(())
}
