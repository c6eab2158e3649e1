// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::{fs, process};
use std::path::PathBuf;
use clap::Parser;
use itertools::Itertools;
use tracing_subscriber::{fmt, EnvFilter};

use gerber::object::GraphicsObject;

#[derive(Parser)]
#[command(version, about = "Parse a Gerber file and summarize its contents")]
struct Cli {
    /// Gerber file to read
    file: PathBuf,

    /// Print the token stream instead of the summary
    #[arg(long)]
    tokens: bool,

    /// List every graphics object
    #[arg(long)]
    objects: bool,

    /// More log output on stderr (-v warnings, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn kind(obj: &GraphicsObject) -> &'static str {
    match obj {
        GraphicsObject::Draw(_) => "draws",
        GraphicsObject::Arc(_) => "arcs",
        GraphicsObject::Flash(_) => "flashes",
        GraphicsObject::Region(_) => "regions",
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let text = match fs::read_to_string(&cli.file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Cannot read {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    if cli.tokens {
        for token in gerber::tokenize(&text) {
            println!("{}", token);
        }
        return;
    }

    let doc = gerber::parse(&text);
    println!("unit:    {}", doc.unit());
    match doc.format() {
        Some(format) => println!("format:  {}", format),
        None => println!("format:  (none)"),
    }
    if let Some(function) = doc.file_function() {
        println!("function: {}", function);
    }
    if let Some(software) = doc.generation_software() {
        println!("generated by: {}", software);
    }
    for attr in doc.file_attributes() {
        println!("attribute {}", attr);
    }
    for aperture in doc.apertures() {
        println!("aperture {}", aperture);
    }
    for template in doc.templates().keys() {
        println!("macro {}", template);
    }

    let counts = doc.objects().iter().counts_by(kind);
    println!("objects: {} ({})", doc.objects().len(),
             ["draws", "arcs", "flashes", "regions"].iter()
                 .map(|k| format!("{} {}", counts.get(k).copied().unwrap_or(0), k))
                 .join(", "));
    if cli.objects {
        for obj in doc.objects() {
            println!("  {}", obj);
        }
    }

    let bbox = doc.bounding_box();
    if bbox.is_valid() {
        println!("bounds:  ({}, {}) - ({}, {}), {} x {} {}", bbox.min_x, bbox.min_y,
                 bbox.max_x, bbox.max_y, doc.width(), doc.height(), doc.unit());
    }
    for warning in doc.warnings() {
        println!("warning: {}", warning);
    }
}
