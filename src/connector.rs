//! Connector deployment into the Sitecore web root
//!
//! The "connector" is the pair of files that expose the remote install
//! operation on the server: the service library, copied into `bin/`, and the
//! `.asmx` service descriptor, copied into the fixed connector subfolder.
//! Both ship next to the packageinstaller executable and are copied with
//! copy-if-changed semantics so repeated runs do not rewrite a current
//! deployment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result};
use crate::trace::Trace;

/// Fixed name of the connector subfolder under the web root
pub const CONNECTOR_FOLDER: &str = "_DEV";
/// Service library deployed into `bin/`
pub const SERVICE_LIBRARY: &str = "HedgehogDevelopment.TDS.PackageInstallerService.dll";
/// Service descriptor deployed into the connector folder
pub const SERVICE_FILE: &str = "TdsPackageInstaller.asmx";
/// Subfolder next to the executable holding the service descriptor
const INCLUDES_FOLDER: &str = "Includes";

/// Destination paths of a deployed connector.
///
/// Returned by [`deploy`] and threaded through to the cleanup stage, so the
/// stages share no hidden state.
#[derive(Debug)]
pub struct DeployedConnector {
    pub library: PathBuf,
    pub service: PathBuf,
}

impl DeployedConnector {
    /// Best-effort removal of the deployed files.
    ///
    /// Clears read-only attributes first, then deletes. A file that cannot be
    /// deleted (for example still locked by the server process) is left in
    /// place without raising an error.
    pub fn remove(&self, trace: Trace) {
        let mut removed = true;
        for path in [&self.library, &self.service] {
            let _ = clear_readonly(path);
            if fs::remove_file(path).is_err() {
                removed = false;
            }
        }
        if removed {
            trace.debug("Sitecore connector removed successfully.");
        }
    }
}

/// Directory holding the connector source artifacts, next to the executable
pub fn source_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        InstallerError::Io {
            message: format!("executable path {} has no parent", exe.display()),
        }
    })
}

/// Deploy the connector under `deploy_folder`.
///
/// Fails with [`InstallerError::SourceArtifactMissing`] when either source
/// file is absent, in which case nothing is written. The connector subfolder
/// is created if needed; `bin/` is expected to exist in any Sitecore web root.
pub fn deploy(source_dir: &Path, deploy_folder: &Path, trace: Trace) -> Result<DeployedConnector> {
    trace.debug(format!(
        "Initializing Sitecore connector at {}...",
        deploy_folder.display()
    ));

    let library_source = source_dir.join(SERVICE_LIBRARY);
    let service_source = source_dir.join(INCLUDES_FOLDER).join(SERVICE_FILE);

    for source in [&library_source, &service_source] {
        if !source.is_file() {
            return Err(InstallerError::SourceArtifactMissing {
                path: source.display().to_string(),
            });
        }
    }

    let connector_dir = deploy_folder.join(CONNECTOR_FOLDER);
    if !connector_dir.is_dir() {
        fs::create_dir_all(&connector_dir)?;
    }

    let library = deploy_folder.join("bin").join(SERVICE_LIBRARY);
    let service = connector_dir.join(SERVICE_FILE);

    let mut updated = copy_if_changed(&library_source, &library)?;
    updated |= copy_if_changed(&service_source, &service)?;

    trace.debug(if updated {
        "Sitecore connector deployed successfully."
    } else {
        "Sitecore connector already deployed."
    });

    Ok(DeployedConnector { library, service })
}

/// Copy `source` over `dest` when the destination is absent, differs in
/// length, or is older than the source. Returns whether a copy happened.
///
/// After a copy the destination is made writable again so a later cleanup can
/// delete it.
pub fn copy_if_changed(source: &Path, dest: &Path) -> Result<bool> {
    if !source.is_file() {
        return Ok(false);
    }

    let copy_needed = match fs::metadata(dest) {
        Err(_) => true,
        Ok(dest_meta) => {
            let source_meta = fs::metadata(source)?;
            source_meta.len() != dest_meta.len()
                || source_meta.modified()? > dest_meta.modified()?
        }
    };

    if copy_needed {
        fs::copy(source, dest)?;
        clear_readonly(dest)?;
    }

    Ok(copy_needed)
}

/// Make `path` writable by its owner if it is currently read-only
fn clear_readonly(path: &Path) -> std::io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    if permissions.readonly() {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            permissions.set_mode(permissions.mode() | 0o200);
        }
        #[cfg(not(unix))]
        {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
        }
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}
