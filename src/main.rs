mod config;
mod conversation;
mod display;
mod parser;
mod planning;
mod store;
mod web;

use std::path::Path;
use chrono::Local;

use config::PlannerConfig;
use display::{print_planning, write_planning_to_file};
use parser::{demo_slots, demo_subjects, load_slots, load_subjects};
use planning::{generate_planning, PlanningRequest, Preferences};

const DEFAULT_SUBJECTS_CSV: &str = "data/subjects.csv";
const DEFAULT_SLOTS_CSV: &str = "data/slots.csv";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = PlannerConfig::from_env();
    let args: Vec<String> = std::env::args().collect();

    // Check if we should run in web mode
    if args.len() > 1 && args[1] == "web" {
        if let Some(port) = args.get(2).and_then(|p| p.parse::<u16>().ok()) {
            config.port = port;
        }

        println!("Starting web server on {}:{}...", config.bind_address, config.port);
        println!("Access the chat at http://localhost:{}", config.port);

        web::start_server(config).await?;
        return Ok(());
    }

    // CLI mode: `plan [subjects.csv] [slots.csv] [output.txt]`
    let file_args: &[String] = match args.get(1).map(String::as_str) {
        Some("plan") => &args[2..],
        _ => &args[1..],
    };

    let subjects_path = file_args.first().map(String::as_str).unwrap_or(DEFAULT_SUBJECTS_CSV);
    let slots_path = file_args.get(1).map(String::as_str).unwrap_or(DEFAULT_SLOTS_CSV);
    if let Some(output) = file_args.get(2) {
        config.output_file = output.clone();
    }

    let (subjects, available_slots) = if Path::new(subjects_path).exists() && Path::new(slots_path).exists() {
        println!("Loading subjects from {} and slots from {}...", subjects_path, slots_path);
        (load_subjects(subjects_path)?, load_slots(slots_path)?)
    } else {
        println!("Input files not found, using demo data");
        (demo_subjects(), demo_slots())
    };

    println!("Loaded {} subjects and {} weekly slots", subjects.len(), available_slots.len());

    let request = PlanningRequest {
        subjects,
        available_slots,
        preferences: Preferences::default(),
    };

    println!("\n\n=== Running Study Planner ===");
    let planning = generate_planning(&request, Local::now().naive_local())?;
    print_planning(&planning);

    println!("\n=== Writing Planning to File ===");
    write_planning_to_file(&planning, &config.output_file)?;
    println!("Planning saved to: {}", config.output_file);

    Ok(())
}
