//! Safe, reference-counted wrappers over the Binary Ninja core's platform,
//! architecture and calling convention registries.

pub mod architecture;
pub mod convention;
pub mod error;
pub mod list;
pub mod logging;
pub mod platform;
pub mod rc;
pub mod string;

pub use architecture::ArchitecturePlatformExt;
pub use binaryninja::architecture::CoreArchitecture;
pub use convention::{CallingConvention, ConventionSlot};
pub use error::{Error, Result};
pub use platform::Platform;
pub use rc::Ref;

#[cfg(feature = "plugin")]
#[no_mangle]
pub extern "C" fn CorePluginInit() -> bool {
	let level = logging::init();
	let os_list = Platform::os_list();

	log::debug!(
		"logging at {level}; {} platforms across {} operating systems: {}",
		Platform::list_all().len(),
		os_list.len(),
		os_list.join(", ")
	);

	true
}

#[cfg(test)]
mod tests {
	#[test]
	fn plugin_entry_is_not_a_default_feature() {
		let manifest = include_str!("../Cargo.toml");
		let defaults = manifest
			.lines()
			.find(|line| line.trim_start().starts_with("default"))
			.unwrap_or_default();

		assert!(!defaults.contains("plugin"), "{defaults}");
	}
}
