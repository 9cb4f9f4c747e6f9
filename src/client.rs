//! Remote installer client
//!
//! Issues the single blocking SOAP call that performs the package install on
//! the server side. The endpoint is the service descriptor deployed by the
//! connector stage, addressed under the fixed connector folder. One attempt,
//! bounded by the configured timeout, no retries.

use crate::connector::{CONNECTOR_FOLDER, SERVICE_FILE};
use crate::error::{InstallerError, Result};
use crate::request::InstallRequest;
use crate::trace::Trace;

/// Namespace of the install service, also the base of the SOAPAction header
const SERVICE_NAMESPACE: &str = "http://hedgehogdevelopment.com/";
/// Name of the single remote operation
const INSTALL_OPERATION: &str = "InstallPackage";

/// Endpoint of the deployed install service.
///
/// Joins the base URL, the connector folder and the service file with exactly
/// one `/` at each seam, whatever trailing slashes the caller supplied.
pub fn service_url(sitecore_url: &str) -> String {
    let base = sitecore_url.trim_end_matches('/');
    format!("{base}/{CONNECTOR_FOLDER}/{SERVICE_FILE}")
}

/// Invoke the install operation for `request.package_path`.
///
/// Blocks until the server responds or the timeout elapses. Any transport
/// error, timeout included, surfaces as [`InstallerError::RemoteCallFailed`];
/// a non-success HTTP status as [`InstallerError::ServiceFault`] carrying the
/// SOAP fault text when one is present.
pub fn install_package(request: &InstallRequest, trace: Trace) -> Result<()> {
    let url = service_url(&request.sitecore_url);

    trace.debug("Initializing package installation ..");
    trace.debug(format!(
        "   Service URL {}, timeout {}s",
        url,
        request.timeout.as_secs()
    ));

    let client = reqwest::blocking::Client::builder()
        .timeout(request.timeout)
        .build()
        .map_err(|source| InstallerError::RemoteCallFailed {
            url: url.clone(),
            source,
        })?;

    let response = client
        .post(&url)
        .header("Content-Type", "text/xml; charset=utf-8")
        .header(
            "SOAPAction",
            format!("\"{SERVICE_NAMESPACE}{INSTALL_OPERATION}\""),
        )
        .body(soap_envelope(&request.package_path))
        .send()
        .map_err(|source| InstallerError::RemoteCallFailed {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(InstallerError::ServiceFault {
            url,
            status: status.to_string(),
            fault: fault_text(&body),
        });
    }

    trace.debug("Update package installed successfully.");
    Ok(())
}

/// SOAP 1.1 envelope for the install operation
fn soap_envelope(package_path: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <soap:Envelope xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" \
         xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\n\
           <soap:Body>\n\
             <{op} xmlns=\"{ns}\">\n\
               <path>{path}</path>\n\
             </{op}>\n\
           </soap:Body>\n\
         </soap:Envelope>",
        op = INSTALL_OPERATION,
        ns = SERVICE_NAMESPACE,
        path = xml_escape(package_path),
    )
}

/// Pull the `<faultstring>` out of a SOAP fault body, falling back to a
/// truncated copy of the body itself
fn fault_text(body: &str) -> String {
    if let Some(start) = body.find("<faultstring>") {
        let rest = &body[start + "<faultstring>".len()..];
        if let Some(end) = rest.find("</faultstring>") {
            return rest[..end].trim().to_string();
        }
    }
    const MAX_FAULT_LEN: usize = 500;
    let trimmed = body.trim();
    if trimmed.len() > MAX_FAULT_LEN {
        // Back off to a char boundary, the limit may land inside a multi-byte char
        let mut end = MAX_FAULT_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    } else {
        trimmed.to_string()
    }
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
