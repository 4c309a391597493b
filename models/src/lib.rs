//! Wire models for the FortiSOAR REST API.
//!
//! Pure data structures mirroring what the platform sends and accepts. No I/O
//! and no business logic - the client crate drives these.
//!
//! - [`hydra`]: paged collection envelope and IRI helpers
//! - [`lookup`]: records fetched when resolving names to identifiers
//! - [`export`]: export templates, their builder and export job status
//! - [`query`]: the structured filter/sort body of `/api/query/{module}`
//! - [`solution_pack`]: solution pack search results

pub mod error;
pub mod export;
pub mod hydra;
pub mod lookup;
pub mod query;
pub mod solution_pack;

#[cfg(test)]
mod tests;

pub use common::ErrorLocation;
pub use error::model_error::ModelError;
pub use export::job::{EXPORT_COMPLETE_STATUS, ExportJobStatus, ExportTrigger, FileRef};
pub use export::template::{
    ConnectorSelection, ExportMetadata, ExportOptions, ExportTemplate, ModuleSelection,
    PlaybookBlocks, PlaybookCollectionSelection, PlaybookSelection,
};
pub use export::template_spec::ExportTemplateSpec;
pub use hydra::{HydraCollection, iri_last_segment};
pub use lookup::{
    ConnectorInfo, ConnectorRecord, ExportTemplateRecord, PicklistNameRecord,
    PlaybookCollectionInfo, WorkflowCollectionRecord,
};
pub use query::{Direction, Filter, Logic, Query, Sort};
pub use solution_pack::{PackTemplate, SolutionPack};
