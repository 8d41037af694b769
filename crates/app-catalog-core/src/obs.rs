//! Structured tracing events for catalog listing calls.
//!
//! Events are emitted at `info!` level with an `event` field, except for
//! absorbed payload problems which go out at `warn!`.

use tracing::{debug, info, warn};

use crate::source::DataMode;
use crate::strategy::{EndpointSelection, ListQuery};

/// Emit event: listing requested.
pub fn emit_list_requested(query: &ListQuery, mode: DataMode) {
    info!(
        event = "catalog.list_requested",
        sort_by = %query.sort.sort_by,
        order = %query.sort.order,
        category = query.category().unwrap_or("-"),
        mode = ?mode,
    );
}

/// Emit event: remote endpoint chosen.
pub fn emit_endpoint_selected(selection: &EndpointSelection) {
    info!(
        event = "catalog.endpoint_selected",
        path = %selection.endpoint,
        rule = selection.rule,
        presorted = selection.presorted,
    );
}

/// Emit event: records sorted locally.
pub fn emit_fallback_sort(records: usize) {
    debug!(event = "catalog.fallback_sort", records = records);
}

/// Emit event: payload was not a record list and was replaced by an empty one.
pub fn emit_malformed_payload(path: &str, kind: &str) {
    warn!(event = "catalog.malformed_payload", path = %path, kind = %kind);
}

/// Emit event: listing finished.
pub fn emit_list_completed(records: usize, sorted_locally: bool) {
    info!(
        event = "catalog.list_completed",
        records = records,
        sorted_locally = sorted_locally,
    );
}
