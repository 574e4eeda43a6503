//! Single-shot bring-up demo for the Grove kit.
//!
//! Initializes the three peripherals, shows the current temperature and
//! exercises the alarm once. Set `GROVEKIT_SIM` to run against the simulated
//! hardware layer, `PORT` to point subplatform registration at a different
//! serial port, and `RUST_LOG` to control verbosity.

use std::env;
use std::thread::sleep;
use std::time::Duration;

use anyhow::Result;
use grovekit::config::pins::Platform;
use grovekit::hal::sim::SimHal;
use grovekit::hal::Hal;
use grovekit::Devices;

fn main() -> Result<()> {
    env_logger::init();

    if env::var_os("GROVEKIT_SIM").is_some() {
        log::info!("GROVEKIT_SIM is set, using the simulated hardware layer");
        return run(SimHal::new(Platform::GalileoGen2));
    }

    #[cfg(feature = "linux-hal")]
    {
        run(grovekit::hal::linux::LinuxHal::new())
    }
    #[cfg(not(feature = "linux-hal"))]
    {
        anyhow::bail!("built without the linux-hal feature; set GROVEKIT_SIM=1 to run simulated")
    }
}

fn run<H: Hal>(hal: H) -> Result<()> {
    let mut devices = Devices::init(hal)?;
    devices.reset()?;

    let celsius = devices.temperature()?;
    log::info!("current temperature: {celsius} C");
    devices.message(&format!("Temp {celsius} C"))?;
    sleep(Duration::from_secs(2));

    devices.start_alarm()?;
    sleep(Duration::from_secs(2));
    devices.stop_alarm()?;

    devices.message("Done")?;
    Ok(())
}
