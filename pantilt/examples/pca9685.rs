//! Bring-up check: sweeps both axes end to end on real hardware.
//!
//! `cargo run --example pca9685 -- 1 0x40`

use std::time::Duration;

use clap::Parser;
use log::info;
use pantilt::{PanTiltController, Settings};

#[derive(Parser, Debug)]
#[command(about = "Sweep both axes between their limits")]
struct Args {
    /// I2C bus number, as in /dev/i2c-N
    #[arg(default_value_t = 1)]
    bus: u8,

    /// Chip address, hex with or without 0x
    #[arg(default_value = "0x40", value_parser = parse_address)]
    address: u8,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid address '{s}': {e}"))
}

fn main() -> pantilt::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let args = Args::parse();
    let mut settings = Settings::default();
    settings.endpoint.bus = args.bus;
    settings.endpoint.address = args.address;
    settings.endpoint.simulate = false;
    settings.step_delay_ms = 10;

    let mut ctl = PanTiltController::new(&settings)?;
    if ctl.is_simulated() {
        info!("no chip found, sweeping the simulation");
    }
    let limits = ctl.limits();

    for _ in 0..2 {
        ctl.move_to_position(Some(limits.pan.min), Some(limits.tilt.min), true)?;
        info!("at {:?}", ctl.get_position());
        std::thread::sleep(Duration::from_millis(250));

        ctl.move_to_position(Some(limits.pan.max), Some(limits.tilt.max), true)?;
        info!("at {:?}", ctl.get_position());
        std::thread::sleep(Duration::from_millis(250));
    }

    ctl.reset_position()?;
    ctl.close();
    Ok(())
}
