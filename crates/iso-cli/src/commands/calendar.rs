use colored::Colorize;
use iso_core::calendar::{Calendar, DateTime};

pub fn run(start: DateTime, advance: i64) -> Result<(), String> {
    let mut calendar = Calendar::new(start.clone());
    calendar.advance(advance);
    let end = calendar.time();

    println!("  {}", "Calendar".bold().underline());
    println!("  from    {start}");
    println!("  to      {end}  ({})", end.friendly_date());
    println!("  scale   {}", format!("{:?}", calendar.time_scale(advance)).to_lowercase());
    match calendar.time_change(&start, end) {
        Some(change) => println!("  change  {}", format!("{change:?}").to_lowercase()),
        None => println!("  change  {}", "none".dimmed()),
    }
    Ok(())
}
