//! HTTP status to error code resolution.

use ackgen_model::ShapeGraph;
use tracing::warn;

use crate::crd::Crd;

/// Code returned when nothing declares a status.
pub const UNKNOWN_EXCEPTION_CODE: &str = "UNKNOWN";

/// Error code that means `http_status` for `crd`.
///
/// A configured override wins. Otherwise the declared errors of the point
/// read, then the list read, then the attribute read are scanned for an
/// exception shape carrying that status; its declared fault code is used, or
/// its shape name when it declares none. Falls back to
/// [`UNKNOWN_EXCEPTION_CODE`].
#[must_use]
pub fn exception_code(graph: &ShapeGraph, crd: &Crd, http_status: u16) -> String {
    if let Some(configured) = configured_error(crd, http_status) {
        return configured.code().to_owned();
    }

    let read_ops = [&crd.ops.read_one, &crd.ops.read_many, &crd.ops.get_attributes];
    for op in read_ops.into_iter().flatten() {
        for error_ref in &op.errors {
            let Some(shape) = graph.resolve(error_ref) else {
                warn!(op = %op.name, shape = %error_ref.shape, "declared error shape is missing");
                continue;
            };
            let Some(info) = &shape.error else {
                continue;
            };
            if info.http_status_code == Some(http_status) {
                return info.code.clone().unwrap_or_else(|| shape.name.clone());
            }
        }
    }
    UNKNOWN_EXCEPTION_CODE.to_owned()
}

/// Configured message prefix the error for `http_status` must carry.
#[must_use]
pub fn exception_message_prefix(crd: &Crd, http_status: u16) -> Option<&str> {
    configured_error(crd, http_status).and_then(|e| e.message_prefix())
}

/// Error codes that retrying can never fix.
#[must_use]
pub fn terminal_codes(crd: &Crd) -> &[String] {
    crd.config
        .exceptions
        .as_ref()
        .map(|e| e.terminal_codes.as_slice())
        .unwrap_or_default()
}

fn configured_error(crd: &Crd, http_status: u16) -> Option<&crate::config::ErrorConfig> {
    crd.config.exceptions.as_ref()?.errors.get(&http_status)
}
