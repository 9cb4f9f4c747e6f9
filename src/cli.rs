//! CLI definitions using clap derive API

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Default remote call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// packageinstaller - Sitecore update package installer
///
/// Deploys the TDS connector to a Sitecore web root and invokes it to install
/// an update package.
#[derive(Parser, Debug)]
#[command(
    name = "packageinstaller",
    version,
    about = "Installs a Sitecore update package.",
    after_help = "Example:\n    \
                  packageinstaller -v --sitecoreUrl \"http://mysite.com/\" \
                  --sitecoreDeployFolder \"C:\\inetpub\\wwwroot\\mysite\\Website\" \
                  --packagePath \"C:\\Package1.update\""
)]
pub struct Cli {
    /// Path to the package. The package must be located in a folder reachable
    /// by the web server.
    #[arg(long = "packagePath", short = 'p', value_name = "PACKAGE PATH")]
    pub package_path: Option<String>,

    /// Url to the root of the Sitecore server.
    #[arg(long = "sitecoreUrl", short = 'u', value_name = "SITECORE URL")]
    pub sitecore_url: Option<String>,

    /// Path to the Sitecore web root. The folder must already exist.
    #[arg(
        long = "sitecoreDeployFolder",
        short = 'f',
        value_name = "SITECORE DEPLOY FOLDER"
    )]
    pub sitecore_deploy_folder: Option<PathBuf>,

    /// Increase debug message verbosity.
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Remove the package installer when done.
    #[arg(long = "cleanup", short = 'c')]
    pub cleanup: bool,

    /// Package installer timeout (in seconds).
    #[arg(long = "timeout", short = 't', value_name = "SECONDS")]
    pub timeout: Option<String>,
}

impl Cli {
    /// Timeout for the remote install call.
    ///
    /// Parsed leniently: a value that does not parse as an integer is ignored
    /// and the default of 600 seconds is kept.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout
            .as_deref()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}
