// Copyright (c) The Wire Team
// SPDX-License-Identifier: Apache-2.0

use axum::response::IntoResponse;

/// Prometheus metrics in text exposition format
pub async fn get_metrics() -> impl IntoResponse {
    crate::metrics::render()
}
