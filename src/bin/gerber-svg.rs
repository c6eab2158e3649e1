// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::{fs, process};
use std::path::PathBuf;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use gerber::render::{svg::SvgRenderer, RenderOptions};

#[derive(Parser)]
#[command(version, about = "Convert a Gerber file to SVG")]
struct Cli {
    /// Gerber file to read
    file: PathBuf,

    /// Output file; standard output if not given
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace arcs by straight segments
    #[arg(long)]
    polygonize: bool,

    /// Segments per full circle when polygonizing
    #[arg(long, default_value_t = 32)]
    segments: u32,

    /// Keep Gerber's y axis instead of flipping with a group transform
    #[arg(long)]
    no_flip: bool,

    /// Space around the image, in file units
    #[arg(long, default_value_t = 0.)]
    margin: f64,

    /// Color of dark polarity
    #[arg(long, default_value = "#000000")]
    dark: String,

    /// Color of clear polarity
    #[arg(long, default_value = "#ffffff")]
    clear: String,

    /// Background color; transparent if not given
    #[arg(long)]
    background: Option<String>,

    /// Decimal places of coordinates
    #[arg(long, default_value_t = 6)]
    precision: usize,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
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
    let doc = gerber::parse(&text);

    let mut opts = RenderOptions::default()
        .colors(cli.dark, cli.clear)
        .flip_y(!cli.no_flip)
        .precision(cli.precision);
    if cli.polygonize {
        opts = opts.polygonized(cli.segments);
    }
    let mut renderer = SvgRenderer::new(opts).margin(cli.margin);
    if let Some(color) = cli.background {
        renderer = renderer.background(color);
    }
    let svg = renderer.render_to_string(&doc);

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, svg) {
                eprintln!("Cannot write {}: {}", path.display(), e);
                process::exit(1);
            }
            info!("wrote {} ({} objects)", path.display(), doc.objects().len());
        }
        None => println!("{}", svg),
    }
}
