//! This crate provides Summarist, a summary server for partitioned CSV datasets. It implements
//! batch reductions (means and frequency tables) over date-partitioned air quality data, a
//! chunked parallel plate search over a large parking violations export, and census population
//! lookups. By computing summaries in the service the volume of data that needs to be transferred
//! to the end user is vastly reduced.
//!
//! The server is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team. Axum performs well in [various](https://github.com/programatik29/rust-web-benchmarks/blob/master/result/hello-world.md) [benchmarks](https://web-frameworks-benchmark.netlify.app/result?l=rust)
//!   and is built on top of various popular components, including the [hyper] HTTP library.
//! * [Serde](serde) performs (de)serialisation of JSON request and response data.
//! * [csv] decodes the partitioned datasets and the reference tables.
//! * [Rayon](rayon) executes CPU-bound reduction and filter tasks on a worker thread pool.

pub mod app;
pub mod app_state;
pub mod batch;
pub mod census;
pub mod cli;
pub mod decoder;
pub mod error;
pub mod fees;
pub mod locator;
pub mod metrics;
pub mod models;
pub mod reducer;
pub mod resource_manager;
pub mod schema;
pub mod search;
pub mod server;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod validated_query;
