use anyhow::{Context, Result};
use fcdpp::FunCube;

fn main() -> Result<()> {
    env_logger::init();

    let mut radio = FunCube::open_first().context("Failed to open FUNcube Dongle Pro+")?;

    let status = radio.status().context("Read dongle status")?;
    print!("{status}");

    radio.close();
    Ok(())
}
