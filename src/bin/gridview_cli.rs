//! CLI tool for gridview - lays out a JSON grid description and outputs the projection
//!
//! Usage:
//!   gridview_cli <grid.json>              # Output JSON to stdout
//!   gridview_cli <grid.json> -o out.json  # Output JSON to file
//!   gridview_cli -                        # Read the description from stdin

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Read, Write};

use gridview::{GridDescription, Result, TableView, TextCell};

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut json = String::new();
        io::stdin().read_to_string(&mut json)?;
        Ok(json)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn run(input_path: &str, output_path: Option<&str>) -> Result<()> {
    let json = read_input(input_path)?;
    let description = GridDescription::from_json(&json)?;
    let table: TableView<TextCell> = description.into_table();
    let output = serde_json::to_string_pretty(&table.projection())?;

    match output_path {
        Some(path) => {
            fs::write(path, &output)?;
            eprintln!("Written: {}", path);
        }
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(output.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let Some(input_path) = args.get(1) else {
        eprintln!("Usage: gridview_cli <grid.json | -> [-o output.json]");
        std::process::exit(1);
    };
    let output_path = match (args.get(2).map(String::as_str), args.get(3)) {
        (Some("-o"), Some(path)) => Some(path.as_str()),
        _ => None,
    };

    if let Err(e) = run(input_path, output_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
