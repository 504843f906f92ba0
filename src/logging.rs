use std::{env, str::FromStr};

use log::LevelFilter;
use once_cell::sync::OnceCell;

pub const LOG_LEVEL_VAR: &str = "BINJA_PLATFORM_LOG";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

static LOGGER: OnceCell<LevelFilter> = OnceCell::new();

fn parse_level(value: Option<&str>) -> (LevelFilter, Option<String>) {
	match value.map(str::trim) {
		None | Some("") => (DEFAULT_LEVEL, None),
		Some(v) => match LevelFilter::from_str(v) {
			Ok(level) => (level, None),
			Err(_) => (DEFAULT_LEVEL, Some(v.to_string())),
		},
	}
}

/// Routes `log` records into the Binary Ninja log window.
///
/// Safe to call repeatedly; only the first call installs the logger. Returns the
/// level in effect.
pub fn init() -> LevelFilter {
	*LOGGER.get_or_init(|| {
		let value = env::var(LOG_LEVEL_VAR).ok();
		let (level, rejected) = parse_level(value.as_deref());

		if binaryninja::logger::init(level).is_err() {
			log::set_max_level(level);
		}

		if let Some(rejected) = rejected {
			log::warn!("{LOG_LEVEL_VAR}={rejected:?} is not a log level, using {DEFAULT_LEVEL}");
		}

		level
	})
}

#[cfg(test)]
mod tests {
	use log::LevelFilter;

	use super::{parse_level, DEFAULT_LEVEL};

	#[test]
	fn unset_uses_default() {
		assert_eq!(parse_level(None), (DEFAULT_LEVEL, None));
		assert_eq!(parse_level(Some("  ")), (DEFAULT_LEVEL, None));
	}

	#[test]
	fn names_are_case_insensitive() {
		assert_eq!(parse_level(Some("DEBUG")).0, LevelFilter::Debug);
		assert_eq!(parse_level(Some("trace")).0, LevelFilter::Trace);
		assert_eq!(parse_level(Some(" off ")).0, LevelFilter::Off);
	}

	#[test]
	fn garbage_falls_back_and_is_reported() {
		assert_eq!(
			parse_level(Some("loud")),
			(DEFAULT_LEVEL, Some("loud".to_string()))
		);
	}
}
