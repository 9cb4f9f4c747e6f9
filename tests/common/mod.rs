//! Common test utilities for packageinstaller integration tests

// Not every test binary uses every helper
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

/// Names must match what the installer deploys
pub const SERVICE_LIBRARY: &str = "HedgehogDevelopment.TDS.PackageInstallerService.dll";
pub const SERVICE_FILE: &str = "TdsPackageInstaller.asmx";
pub const CONNECTOR_FOLDER: &str = "_DEV";

/// A throwaway Sitecore web root with the `bin/` folder every site has
pub struct TestSite {
    #[allow(dead_code)]
    temp: TempDir,
    pub web_root: PathBuf,
}

impl TestSite {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let web_root = temp.path().join("Website");
        std::fs::create_dir_all(web_root.join("bin")).expect("Failed to create web root");
        Self { temp, web_root }
    }

    pub fn deployed_library(&self) -> PathBuf {
        self.web_root.join("bin").join(SERVICE_LIBRARY)
    }

    pub fn deployed_service(&self) -> PathBuf {
        self.web_root.join(CONNECTOR_FOLDER).join(SERVICE_FILE)
    }
}

/// Path to the packageinstaller binary under test
#[allow(dead_code)]
pub fn installer_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_packageinstaller"))
}

/// Place the connector source artifacts next to the binary under test, the
/// way they ship in a release. Idempotent; callers should serialize through a
/// `Once` when tests in one process share the staging.
#[allow(dead_code)]
pub fn stage_connector_sources() {
    let bin_dir = installer_bin()
        .parent()
        .expect("binary has a parent directory")
        .to_path_buf();
    write_if_absent(&bin_dir.join(SERVICE_LIBRARY), b"fixture service library");
    let includes = bin_dir.join("Includes");
    std::fs::create_dir_all(&includes).expect("Failed to create Includes folder");
    write_if_absent(
        &includes.join(SERVICE_FILE),
        b"<%@ WebService Language=\"C#\" Class=\"TdsPackageInstaller\" %>",
    );
}

fn write_if_absent(path: &Path, content: &[u8]) {
    if !path.exists() {
        std::fs::write(path, content).expect("Failed to write connector fixture");
    }
}

/// One-shot HTTP stub standing in for the deployed install service.
///
/// Accepts a single request, captures it, and answers with the configured
/// status and body.
#[allow(dead_code)]
pub struct StubService {
    base_url: String,
    request_rx: mpsc::Receiver<String>,
    handle: thread::JoinHandle<()>,
}

#[allow(dead_code)]
impl StubService {
    pub fn spawn(status_line: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub service");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let (request_tx, request_rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("Failed to accept connection");
            let request = read_http_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("Failed to write response");
            let _ = request_tx.send(request);
        });
        Self {
            base_url,
            request_rx,
            handle,
        }
    }

    /// Base URL to hand to `--sitecoreUrl`
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Wait for the stub to finish and return the captured request
    pub fn into_request(self) -> String {
        self.handle.join().expect("stub service panicked");
        self.request_rx.recv().expect("no request captured")
    }
}

fn read_http_request(stream: &mut std::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).expect("Failed to read request");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
    };
    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);
    while buf.len() < header_end + 4 + content_length {
        let n = stream.read(&mut chunk).expect("Failed to read request body");
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).to_string()
}
