//! Services layer - Provisioning and upgrade workflows
//!
//! Services sequence external tool invocations and filesystem steps.
//! They depend on the [`CommandRunner`](crate::infra::CommandRunner) and
//! [`AdminCatalog`](crate::infra::AdminCatalog) traits, never on concrete
//! processes, so tests can swap in fakes.

mod provisioner;
mod upgrader;
pub mod workspace;

pub use provisioner::Provisioner;
pub use upgrader::{UpgradeOptions, Upgrader};
pub use workspace::{declares_static_root, hard_reset, patch_settings};
