//! Installation request assembled from the command line

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;

/// Configuration for one installer run.
///
/// Built once after the required options have been validated, immutable for
/// the rest of the process.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Package path as understood by the remote server, passed through verbatim
    pub package_path: String,
    /// Base URL of the Sitecore server
    pub sitecore_url: String,
    /// Local (or UNC) path to the Sitecore web root
    pub deploy_folder: PathBuf,
    /// Remote call timeout
    pub timeout: Duration,
    /// Remove the deployed connector files at the end of the run
    pub cleanup: bool,
}

impl InstallRequest {
    /// Build a request from parsed flags.
    ///
    /// On failure returns the display names of every missing required option,
    /// so the caller can report each one on its own line.
    pub fn from_cli(cli: &Cli) -> std::result::Result<Self, Vec<&'static str>> {
        let mut missing = Vec::new();

        if cli.package_path.as_deref().unwrap_or("").is_empty() {
            missing.push("Package Path");
        }
        if cli.sitecore_url.as_deref().unwrap_or("").is_empty() {
            missing.push("Sitecore Web URL");
        }
        if cli
            .sitecore_deploy_folder
            .as_deref()
            .is_none_or(|path| path.as_os_str().is_empty())
        {
            missing.push("Sitecore Deploy folder");
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        // Validated above, the unwraps cannot fail
        Ok(Self {
            package_path: cli.package_path.clone().unwrap_or_default(),
            sitecore_url: cli.sitecore_url.clone().unwrap_or_default(),
            deploy_folder: cli.sitecore_deploy_folder.clone().unwrap_or_default(),
            timeout: cli.timeout(),
            cleanup: cli.cleanup,
        })
    }
}
