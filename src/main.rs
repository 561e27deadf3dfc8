use crate::dispatch::dispatch::Dispatch;
use crate::ride::Ride;
use crate::ride::RideStatus::{Assigned, Cancelled, Completed, InProgress, Pending};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::settings::Style;

mod dispatch;
mod driver;
mod ride;
mod time;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())
        .expect("Failed to spawn pager");

    let mut stdin = pager.stdin.take().expect("Failed to open stdin for pager");

    if let Err(e) = stdin.write_all(content.as_bytes()) {
        // Broken pipe is common if the user quits the pager early
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error writing to pager: {}", e);
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn print_table<T: tabled::Tabled>(rows: &[T]) {
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn print_timeline(day: u64, lanes: &[Vec<&Ride>]) {
    if lanes.is_empty() {
        println!("No active rides on day {}.", day);
        return;
    }
    println!("Day {} timeline ({} lanes):", day, lanes.len());
    for (i, lane) in lanes.iter().enumerate() {
        let blocks = lane
            .iter()
            .map(|r| {
                let (start, end) = r.window();
                format!("[{}-{} {} {}]", start.clock(), end.clock(), r.id, r.patient_name)
            })
            .collect::<Vec<String>>()
            .join("  ");
        println!("  lane {}: {}", i + 1, blocks);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let scenario = args.scenario.to_str().ok_or("Invalid scenario path")?;
    let mut dispatch = Dispatch::load_from_file(scenario)?;
    println!(
        "Dispatch desk online. Loaded {} rides and {} drivers from {} (default ride length {} min)",
        dispatch.rides.len(),
        dispatch.drivers.len(),
        args.scenario.display(),
        dispatch.settings.default_ride_minutes
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "drivers".to_string(),
            "check".to_string(),
            "assign".to_string(),
            "start".to_string(),
            "complete".to_string(),
            "cancel".to_string(),
            "timeline".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let sub = parts.get(1).map(|s| *s).unwrap_or("a");
                        let filtered_rides: Vec<Ride> = dispatch.rides.iter()
                            .filter(|r| match sub {
                                "p" | "pending" => r.status == Pending,
                                "s" | "scheduled" => r.status == Assigned || r.status == InProgress,
                                "d" | "done" => r.status == Completed || r.status == Cancelled,
                                _ => true, // 'ls' or 'ls a'
                            })
                            .cloned()
                            .collect();
                        if filtered_rides.is_empty() {
                            println!("No matching rides found.")
                        } else {
                            print_table(&filtered_rides);
                        }
                    },
                    "drivers" => {
                        let mut drivers: Vec<_> = dispatch.drivers.values().cloned().collect();
                        drivers.sort_by(|a, b| a.full_name.cmp(&b.full_name));
                        print_table(&drivers);
                    },
                    "check" => {
                        if let Some(id) = parts.get(1) {
                            match dispatch.check_availability(&Arc::from(*id)) {
                                Ok(verdicts) => {
                                    for v in verdicts {
                                        match &v.reason {
                                            None => println!(
                                                "  {:<24} {}",
                                                v.driver.full_name,
                                                "available".green()
                                            ),
                                            Some(reason) => println!(
                                                "  {:<24} {}",
                                                v.driver.full_name,
                                                reason.to_string().red()
                                            ),
                                        }
                                    }
                                },
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: check <ride_id>");
                        }
                    },
                    "assign" => {
                        if let (Some(ride_id), Some(driver_id)) = (parts.get(1), parts.get(2)) {
                            match dispatch.assign(&Arc::from(*ride_id), &Arc::from(*driver_id)) {
                                Ok(()) => println!("Assigned {} to ride {}.", driver_id, ride_id),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: assign <ride_id> <driver_id>");
                        }
                    },
                    "start" | "complete" | "cancel" => {
                        if let Some(id) = parts.get(1) {
                            let ride_id = Arc::from(*id);
                            let result = match parts[0] {
                                "start" => dispatch.start(&ride_id),
                                "complete" => dispatch.complete(&ride_id),
                                _ => dispatch.cancel(&ride_id),
                            };
                            match result {
                                Ok(()) => println!("Ride {} is now {}.", id, dispatch.ride(&ride_id)?.status),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        } else {
                            println!("Usage: {} <ride_id>", parts[0]);
                        }
                    },
                    "timeline" => {
                        let day = parts.get(1).and_then(|d| d.parse::<u64>().ok()).unwrap_or(1);
                        let lanes = dispatch.timeline(day);
                        print_timeline(day, &lanes);
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [status]          - List rides in a table or filter by status: p - pending, s - scheduled, d - done");
                        println!("  drivers              - List the driver roster");
                        println!("  check <id>           - Show per-driver availability for ride <id>");
                        println!("  assign <id> <drv>    - Assign driver <drv> to ride <id> (refused on conflict)");
                        println!("  start <id>           - Mark an assigned ride as in progress");
                        println!("  complete <id>        - Mark an in-progress ride as completed");
                        println!("  cancel <id>          - Cancel a pending or assigned ride");
                        println!("  timeline [day]       - Show the day's rides packed into non-overlapping lanes");
                        println!("  help / ?             - Show this help menu");
                        println!("  exit / quit          - Exit the dispatch desk\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
