use std::str::FromStr;

use anyhow::Result;
use log::LevelFilter;

/// Route the `log` facade to stderr, `level` is any `LevelFilter` name.
pub fn init_logging(level: &str) -> Result<()> {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] - {} - [{}] {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::from_str(level)?)
        .chain(std::io::stderr());

    if dispatch.apply().is_err() {
        eprintln!("logger has already been set");
    }

    Ok(())
}
