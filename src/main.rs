//! Command-line entry point: generates calibration G-code files.

use anyhow::{bail, Context, Result};
use engravekit::{guide_line, init_logging, FocusTest, SpeedPowerTest};
use std::path::Path;
use tracing::info;

const USAGE: &str = "\
Usage: engravekit <command>

Commands:
  speed-power    Write speed-power-tuning.gcode
  focus          Write focus-tuning.gcode
  guides         Write spoilboard guide line files
  all            Write every calibration file
";

fn write_speed_power() -> Result<()> {
    let powers: Vec<f64> = (20..=80).step_by(10).map(f64::from).collect();
    let speeds: Vec<f64> = (200..=1200).step_by(100).map(f64::from).collect();
    let mut test = SpeedPowerTest::new(speeds, powers)?;
    test.set_square_size(5.0)?;
    let mut doc = test.build()?;
    doc.save(Path::new("speed-power-tuning.gcode"))
        .context("writing speed/power test")?;
    info!("wrote speed-power-tuning.gcode");
    Ok(())
}

fn write_focus() -> Result<()> {
    let heights: Vec<f64> = (-5..=5).map(f64::from).collect();
    let test = FocusTest::new(heights, 10.0)?;
    let mut doc = test.build()?;
    doc.save(Path::new("focus-tuning.gcode"))
        .context("writing focus test")?;
    info!("wrote focus-tuning.gcode");
    Ok(())
}

fn write_guides() -> Result<()> {
    for (name, angle) in [("horizontal", 0.0), ("vertical", 90.0)] {
        let mut doc = guide_line(150.0, angle, 40.0)?;
        doc.set_header(&format!("{} guide line for spoilboard", name));
        let filename = format!("spoilboard-guide-{}.gcode", name);
        doc.save(Path::new(&filename))
            .with_context(|| format!("writing {}", filename))?;
        info!(%filename, "wrote guide line");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let command = std::env::args().nth(1).unwrap_or_default();
    match command.as_str() {
        "speed-power" => write_speed_power()?,
        "focus" => write_focus()?,
        "guides" => write_guides()?,
        "all" => {
            write_speed_power()?;
            write_focus()?;
            write_guides()?;
        }
        _ => {
            eprint!("{}", USAGE);
            bail!("unknown command: {:?}", command);
        }
    }
    Ok(())
}
