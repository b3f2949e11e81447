use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cutter_engine::cutter::{Primitive, RecordingCutter};
use cutter_engine::gcode::GcodeInterpreter;
use cutter_engine::svg::{render_document, SvgRenderConfig};
use log::info;

/// Drive a cutting-plotter front-end against an input file and report the
/// resulting move/line/curve primitives.
///
/// There is no real or simulated device wired up here -- device drivers and
/// the graphical simulator are out of scope for this engine -- so both
/// subcommands run against a [`RecordingCutter`] and print what it saw.
#[derive(Debug, Parser)]
#[command(name = "cutter", author, about)]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interpret an SVG file.
    Svg {
        file: PathBuf,
        #[arg(long, default_value_t = 0.5)]
        paper_padding: f64,
    },
    /// Interpret a G-code file.
    Gcode { file: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opt = Opt::parse();

    let mut cutter = RecordingCutter::new();
    match opt.command {
        Command::Svg { file, paper_padding } => {
            let text = fs::read_to_string(&file)?;
            let document = roxmltree::Document::parse(&text)?;
            render_document(&document, &mut cutter, SvgRenderConfig { paper_padding });
        }
        Command::Gcode { file } => {
            let text = fs::read_to_string(&file)?;
            let mut interpreter = GcodeInterpreter::new();
            interpreter.run(&text, &mut cutter);
        }
    }

    report(&cutter);
    Ok(())
}

fn report(cutter: &RecordingCutter) {
    info!("{} primitives emitted", cutter.primitives.len());
    for primitive in &cutter.primitives {
        match primitive {
            Primitive::MoveTo(p) => println!("move_to {:.4} {:.4}", p.x, p.y),
            Primitive::CutTo(p) => println!("cut_to {:.4} {:.4}", p.x, p.y),
            Primitive::CurveTo(p0, p1, p2, p3) => println!(
                "curve_to {:.4} {:.4} {:.4} {:.4} {:.4} {:.4} {:.4} {:.4}",
                p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
            ),
        }
    }
}
