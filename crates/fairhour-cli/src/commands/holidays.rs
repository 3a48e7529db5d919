use std::error::Error;

use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum HolidaysAction {
    /// Fetch public holidays for a country and year
    Fetch {
        #[arg(long)]
        country: String,
        #[arg(long)]
        year: i32,
        /// Emit JSON instead of one line per holiday
        #[arg(long)]
        json: bool,
    },
    /// Warm the cache for a set of countries, current and next year
    Prefetch {
        #[arg(long, value_delimiter = ',')]
        countries: Vec<String>,
    },
}

pub async fn run(action: HolidaysAction) -> Result<(), Box<dyn Error>> {
    let service = common::build_service()?;

    match action {
        HolidaysAction::Fetch {
            country,
            year,
            json,
        } => {
            let holidays = service.fetch_holidays(&country, year).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&holidays)?);
            } else if holidays.is_empty() {
                println!("no holidays on record for {country} {year}");
            } else {
                for holiday in holidays {
                    println!("{}  {}", holiday.date, holiday.name);
                }
            }
        }
        HolidaysAction::Prefetch { countries } => {
            let loaded = service.prefetch(&countries).await;
            println!("warmed {loaded} country-year entries");
        }
    }
    Ok(())
}
