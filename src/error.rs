//! Error types and handling for the package installer
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes.
//! Every error variant maps to a stable process exit code so scripted callers
//! can tell the failure classes apart.

use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes, one per failure class
pub mod exit {
    /// Run completed, or help was shown
    pub const SUCCESS: i32 = 0;
    /// Malformed command-line syntax
    pub const OPTION_PARSE: i32 = 100;
    /// Connector source artifacts missing, deployment failed
    pub const DEPLOY_FAILED: i32 = 101;
    /// Remote install call failed, or a runtime error after validation
    pub const INSTALL_FAILED: i32 = 102;
    /// Required option missing, or deploy folder not found
    pub const INVALID_ARGUMENTS: i32 = 103;
}

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug)]
pub enum InstallerError {
    #[error("Sitecore Deploy Folder {path} not found.")]
    #[diagnostic(
        code(packageinstaller::deploy_folder_not_found),
        help("The deploy folder must exist before the installer runs")
    )]
    DeployFolderNotFound { path: String },

    #[error("Cannot find file {path}")]
    #[diagnostic(
        code(packageinstaller::connector::source_missing),
        help("The connector files ship next to the packageinstaller executable")
    )]
    SourceArtifactMissing { path: String },

    #[error("Remote install call to {url} failed")]
    #[diagnostic(code(packageinstaller::install::call_failed))]
    RemoteCallFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Install service at {url} returned {status}: {fault}")]
    #[diagnostic(code(packageinstaller::install::service_fault))]
    ServiceFault {
        url: String,
        status: String,
        fault: String,
    },

    #[error("IO error: {message}")]
    #[diagnostic(code(packageinstaller::io_error))]
    Io { message: String },
}

impl InstallerError {
    /// Exit code for this failure, distinct and stable per class
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DeployFolderNotFound { .. } => exit::INVALID_ARGUMENTS,
            Self::SourceArtifactMissing { .. } => exit::DEPLOY_FAILED,
            Self::RemoteCallFailed { .. } | Self::ServiceFault { .. } | Self::Io { .. } => {
                exit::INSTALL_FAILED
            }
        }
    }

    /// Short name of the failure kind, used when reporting remote faults
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeployFolderNotFound { .. } => "DeployFolderNotFound",
            Self::SourceArtifactMissing { .. } => "SourceArtifactMissing",
            Self::RemoteCallFailed { .. } => "RemoteCallFailed",
            Self::ServiceFault { .. } => "ServiceFault",
            Self::Io { .. } => "IoError",
        }
    }
}

impl From<std::io::Error> for InstallerError {
    fn from(err: std::io::Error) -> Self {
        InstallerError::Io {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallerError>;
