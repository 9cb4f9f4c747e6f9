//! packageinstaller - Sitecore update package installer
//!
//! Command line utility that deploys the TDS connector into a Sitecore web
//! root and invokes it over HTTP to install an update package. Four stages,
//! strictly in order: parse flags, deploy the connector copy-if-changed, issue
//! one blocking install call with a timeout, optionally remove the deployed
//! files again.

use clap::{CommandFactory, Parser};
use std::process;

mod cli;
mod client;
mod connector;
mod error;
mod request;
mod trace;

use cli::Cli;
use error::{InstallerError, Result, exit};
use request::InstallRequest;
use trace::Trace;

fn main() {
    // No arguments at all means the user wants usage, not an error
    if std::env::args_os().len() <= 1 {
        let _ = Cli::command().print_help();
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = err.print();
                return;
            }
            let _ = err.print();
            process::exit(exit::OPTION_PARSE);
        }
    };

    let request = match InstallRequest::from_cli(&cli) {
        Ok(request) => request,
        Err(missing) => {
            for name in missing {
                show_error(&format!("{name} is required."));
            }
            process::exit(exit::INVALID_ARGUMENTS);
        }
    };

    let trace = Trace::new(cli.verbose);

    if let Err(err) = run(&request, trace) {
        report(&err);
        process::exit(err.exit_code());
    }
}

/// Deploy the connector, run the install call, then clean up if asked to.
///
/// Cleanup runs on both the success and the failure path of the install call,
/// but only once a connector was actually deployed; validation and deployment
/// failures leave nothing behind to remove.
fn run(request: &InstallRequest, trace: Trace) -> Result<()> {
    if !request.deploy_folder.is_dir() {
        return Err(InstallerError::DeployFolderNotFound {
            path: request.deploy_folder.display().to_string(),
        });
    }

    trace.debug(format!(
        "Initializing update package installation: {}",
        request.package_path
    ));

    let source_dir = connector::source_dir()?;
    let deployed = connector::deploy(&source_dir, &request.deploy_folder, trace)?;

    let result = client::install_package(request, trace);

    if request.cleanup {
        deployed.remove(trace);
    }

    result
}

fn show_error(message: &str) {
    eprintln!("Error: {message}");
    eprintln!("Try 'packageinstaller --help' for more information.");
}

/// Report a failure the way its class calls for: validation errors get the
/// short form with the help hint, remote faults get the kind name and the
/// cause chain.
fn report(err: &InstallerError) {
    match err {
        InstallerError::DeployFolderNotFound { .. } => {
            show_error(&err.to_string());
        }
        InstallerError::SourceArtifactMissing { .. } => {
            show_error(&err.to_string());
            eprintln!("Sitecore connector deployment failed.");
        }
        InstallerError::RemoteCallFailed { .. }
        | InstallerError::ServiceFault { .. }
        | InstallerError::Io { .. } => {
            eprintln!("Exception: {err} ({})", err.kind());
            let mut cause = std::error::Error::source(err);
            while let Some(inner) = cause {
                eprintln!("Caused by: {inner}");
                cause = inner.source();
            }
        }
    }
}
