use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};
use pantilt::{ControllerHandle, PanTiltController, Result, Settings};
use pantilt_common::cmd::{Direction, MoveRequest, StepRequest};
use serde_json::{json, Value};

/// Drive a pan/tilt servo mount through a PCA9685
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never touch the bus, whatever the settings say
    #[arg(long, conflicts_with = "hardware")]
    simulate: bool,

    /// Drive the chip on the configured bus
    #[arg(long)]
    hardware: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the commanded position
    Position,
    /// Print axis limits, step size and step delay
    Limits,
    /// Center both axes
    Reset,
    /// Move to an absolute position
    Set {
        #[arg(long, allow_negative_numbers = true)]
        pan: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        tilt: Option<i32>,
        /// Interpolate instead of jumping
        #[arg(long)]
        smooth: bool,
    },
    /// Move one axis relative to where it is
    Step {
        /// left, right, up or down
        #[arg(value_parser = parse_direction)]
        direction: Direction,
        /// Degrees; the configured step when omitted
        #[arg(long)]
        step: Option<i32>,
    },
    /// Point at fractional angles
    Look {
        #[arg(allow_negative_numbers = true)]
        pan: f64,
        #[arg(allow_negative_numbers = true)]
        tilt: f64,
    },
    /// Run a short exercise of every motion
    Demo,
}

fn parse_direction(s: &str) -> core::result::Result<Direction, String> {
    Direction::from_str(s)
        .ok_or_else(|| format!("invalid direction '{s}', use: left, right, up, down"))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };
    if args.simulate {
        settings.endpoint.simulate = true;
    } else if args.hardware {
        settings.endpoint.simulate = false;
    }

    let handle = ControllerHandle::new(settings);
    let outcome = run(&handle, args.command);
    handle.shutdown();

    match outcome {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_caller_fault() => {
            error!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("Servo command failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(handle: &ControllerHandle, command: Cmd) -> Result<Value> {
    match command {
        Cmd::Position => {}
        Cmd::Limits => {
            let limits = handle.with(|c| c.limits())?;
            return Ok(json!({ "result": "okay", "limits": limits }));
        }
        Cmd::Reset => handle.with(|c| c.reset_position())??,
        Cmd::Set { pan, tilt, smooth } => {
            let req = MoveRequest { pan, tilt, smooth };
            handle.with(|c| c.apply_move(&req))??
        }
        Cmd::Step { direction, step } => {
            let req = StepRequest { direction, step };
            handle.with(|c| c.apply_step(&req))??
        }
        Cmd::Look { pan, tilt } => handle.with(|c| c.look(pan, tilt))??,
        Cmd::Demo => handle.with(demo)??,
    }

    let position = handle.with(|c| c.get_position())?;
    Ok(json!({ "result": "okay", "position": position }))
}

fn demo(ctl: &mut PanTiltController) -> Result<()> {
    info!("Initial position: {:?}", ctl.get_position());

    ctl.pan_left(Some(10))?;
    ctl.tilt_up(Some(15))?;
    info!("After movement: {:?}", ctl.get_position());

    ctl.move_to_position(Some(45), Some(120), false)?;
    info!("After absolute move: {:?}", ctl.get_position());

    ctl.move_to_position(Some(135), Some(60), true)?;
    info!("After smooth move: {:?}", ctl.get_position());

    ctl.reset_position()?;
    info!("After reset: {:?}", ctl.get_position());
    Ok(())
}
