use riscv_smoke::*;

use clap::Parser;
use std::hint::black_box;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Opts {
    /// Write the emitted instruction image to a file
    #[arg(short, long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Print the instruction listing
    #[arg(short, long)]
    listing: bool,
}

fn run(opts: &Opts) -> Result<(), SmokeError> {
    // black_box keeps the image live so the emission cannot be elided.
    let image = black_box(smoke_image()?);
    if let Some(path) = &opts.dump {
        std::fs::write(path, &image)?;
    }
    if opts.listing {
        println!("{}", smoke_listing());
    }
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    match run(&opts) {
        Ok(()) => (),
        Err(e) => println!("{e}"),
    }
    println!("Hello World");
}
