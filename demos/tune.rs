use anyhow::{bail, Context, Result};
use fcdpp::FunCube;

fn main() -> Result<()> {
    env_logger::init();

    let Some(arg) = std::env::args().nth(1) else {
        bail!("usage: tune <frequency in Hz>");
    };
    let hz: u32 = arg.parse().context("Frequency must be an integer number of Hz")?;

    let mut radio = FunCube::open_first().context("Failed to open FUNcube Dongle Pro+")?;

    println!("Firmware: {}", radio.query().context("Read identity")?);
    let actual = radio.set_frequency_hz(hz).context("Set frequency")?;
    println!("Requested {hz} Hz, tuned to {actual} Hz");
    println!("RF filter: {}", radio.rf_filter().context("Read RF filter")?);

    Ok(())
}
