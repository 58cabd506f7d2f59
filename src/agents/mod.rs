pub mod command_runner;
pub mod extension_manager;
pub mod version_control;

pub use command_runner::{CommandOutcome, CommandRunner, DryRunRunner, SystemCommandRunner};
pub use extension_manager::ExtensionManagerAgent;
pub use version_control::VersionControlAgent;
