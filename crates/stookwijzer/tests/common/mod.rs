//! Common helpers for stookwijzer integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use axum::http::Uri;
use reqwest::Url;
use stookwijzer::ClientConfig;
use test_utils::MockServer;

/// Location used throughout: RD ≈ (205419.86, 459726.89).
pub const LATITUDE: f64 = 52.123456;
pub const LONGITUDE: f64 = 6.123456;

/// A config that queries `server` instead of RIVM.
pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        feature_url: server.url("/geo/alo/wms"),
        timeout_secs: 2,
        ..ClientConfig::default()
    }
}

/// Decoded query parameters of a recorded request.
pub fn query_params(uri: &Uri) -> HashMap<String, String> {
    let url = Url::parse(&format!("http://localhost{}", uri)).expect("recorded URI is absolute-path");
    url.query_pairs().into_owned().collect()
}
