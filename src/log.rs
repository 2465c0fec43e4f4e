use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// `-v` count of the CLI mapped to a level, warnings are always shown.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Log lines are printed as PACE comments so they can share a stream with the decomposition.
pub fn build_pace_logger_for_level(level: LevelFilter) {
    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| writeln!(buf, "c {} - {}", record.level(), record.args()))
        .filter(None, level)
        .target(env_logger::Target::Stderr)
        .init();
}

pub fn build_pace_logger_for_verbosity(verbosity: u8) {
    build_pace_logger_for_level(level_for_verbosity(verbosity));
}

#[cfg(test)]
mod tests {
    use crate::log::level_for_verbosity;
    use log::LevelFilter;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(7), LevelFilter::Trace);
    }
}
