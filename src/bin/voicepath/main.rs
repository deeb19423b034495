//! voicepath - live microphone to speaker with a pitch-modulation warble
//!
//! Run with: cargo run -- --pitch 0.25

mod cli;
mod commands;

use std::io::BufRead;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use log::info;

use commands::Command;
use voicepath::{
    io::{list_devices, LiveStream},
    session::LiveSession,
};

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let args = cli::Args::parse();
    cli::init_logging(&args);

    if args.list_devices {
        for device in list_devices().wrap_err("failed to enumerate audio devices")? {
            let role = match (device.is_input, device.is_output) {
                (true, true) => "in/out",
                (true, false) => "in",
                _ => "out",
            };
            println!("{:>6}  {}", role, device.name);
        }
        return Ok(());
    }

    let stream = LiveStream::open(args.stream_config()).wrap_err("failed to open audio devices")?;
    let config = args.session_config(stream.sample_rate());

    let (mut session, mut handle) =
        LiveSession::start(config).wrap_err("failed to build the voice path")?;
    if let Some(offset) = args.pitch {
        session.set_pitch_offset(offset)?;
    }
    if args.echo {
        session.set_echo(true)?;
    }
    for (band, value) in args.bands() {
        session.set_band(band, value)?;
    }

    println!("=== voicepath ===");
    println!("Input:       {}", stream.input_name());
    println!("Output:      {}", stream.output_name());
    println!("Sample rate: {} Hz", stream.sample_rate());
    println!();
    println!("{}", commands::HELP);
    println!();

    let running = stream.play(session).wrap_err("failed to start audio streams")?;

    for line in std::io::stdin().lock().lines() {
        let line = line.wrap_err("failed to read stdin")?;
        match commands::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{}", commands::HELP),
            Ok(Some(command)) => {
                if !command.send(&mut handle) {
                    eprintln!("audio thread is busy, try again");
                }
            }
            Ok(None) => {}
            Err(err) => eprintln!("{}", err),
        }
    }

    // Let the audio thread tear the graph down before the streams go away
    handle.close();
    std::thread::sleep(Duration::from_millis(100));

    info!("stopped ({} input underruns)", running.underruns());
    drop(running);
    Ok(())
}
