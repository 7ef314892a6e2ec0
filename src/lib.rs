pub mod cycle;
pub mod dataset;
pub mod fetch;
pub mod ingest;
pub mod output;
pub mod query;
pub mod report;
pub mod settings;
pub mod subject;
pub mod tiers;
