//! Client for the RIVM Stookwijzer, the Dutch wood-burning advisory.
//!
//! A [`Stookwijzer`] is built once per monitored location. Each call to
//! [`Stookwijzer::update`] issues one GetFeatureInfo request and replaces
//! the current [`AdvisoryReading`] and forecast. Failures never escape as
//! errors: they are handed to a [`Reporter`] and the reading degrades to
//! [`AdviceCode::Unknown`].

pub mod advice;
pub mod client;
pub mod config;
pub mod coordinates;
pub mod forecast;
mod http;
pub mod reading;
pub mod report;
pub mod source;
pub mod wind;

pub use advice::{classify, AdviceCode, AdvicePolicy, AdvicePolicyKind, LocalClassifier, RemoteAdviceCode};
pub use client::Stookwijzer;
pub use config::ClientConfig;
pub use coordinates::{CoordinateProvider, CoordinateSource, RdPolynomial, RemoteTransform};
pub use forecast::{ForecastConfig, ForecastSample};
pub use reading::AdvisoryReading;
pub use report::{MemoryReporter, Reporter, TracingReporter};
pub use source::{FeatureSource, HttpFeatureSource};

pub use stookwijzer_common::{BoundingBox, GeoPoint, ProjectedPoint, StookwijzerError, StookwijzerResult};
pub use wms_protocol::{FeatureCollection, FeatureProperties};
