// Command line control of an ELL9K filter slider
//
// Connects to the slider, runs one command and prints the resulting state.
// Run with RUST_LOG=debug to see the frames on the wire.

use clap::{Parser, Subcommand};
use ell9k_rs::{Slider, SliderConfig};
use std::time::Duration;

#[derive(Parser)]
#[command(about = "Drive an ELL9K four-position filter slider")]
struct Cli {
    /// Serial device of the slider
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Log every diagnostic at info level
    #[arg(short, long)]
    verbose: bool,

    /// Settle delay before each read, in milliseconds
    #[arg(long, default_value_t = 10)]
    settle_ms: u64,

    /// Allow renaming the last slot and match duplicate labels first-wins
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Move one slot forward
    Forward,
    /// Move one slot backward
    Backward,
    /// Home the slider
    Reset,
    /// Move to a slot index
    Position { index: i64 },
    /// Move to the slot with this label
    Filter { name: String },
    /// Relabel a slot
    Rename { index: i64, name: String },
    /// Poll the device status
    Status,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SliderConfig::new(&cli.port)
        .verbose(cli.verbose)
        .strict(cli.strict)
        .settle_delay(Duration::from_millis(cli.settle_ms));
    let mut slider = Slider::connect(&config)?;

    let changed = match cli.command {
        Command::Forward => slider.forward(),
        Command::Backward => slider.backward(),
        Command::Reset => slider.reset(),
        Command::Position { index } => slider.set_position(index),
        Command::Filter { name } => slider.set_filter(&name),
        Command::Rename { index, name } => slider.rename_filter(index, &name),
        Command::Status => slider.refresh_status(),
    };

    let changed: Vec<_> = changed.iter().map(|field| field.as_str()).collect();
    println!("Changed: {}", changed.join(", "));
    println!("Port:     {}", slider.port());
    println!("Ready:    {}", slider.is_ready());
    println!("Position: {}", slider.get_position());
    println!("Filter:   {}", slider.get_filter());
    println!("Filters:  {}", slider.get_filter_list().join(", "));
    println!("Status:   {}", slider.get_status());
    println!("Console:  {}", slider.get_console());

    Ok(())
}
