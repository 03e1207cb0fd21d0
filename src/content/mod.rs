//! Content Resolution
//!
//! Reads page content from interchangeable backends behind one
//! [`ContentSource`] interface, tracks each read as a [`FetchState`], and
//! applies the per-section fallback policy.

pub mod fallback;
pub mod fetch;
pub mod frontmatter;
pub mod query;
pub mod record;
pub mod source;
pub mod sources;

pub use fallback::{
    merge_fields, resolve_list, resolve_single, sort_by_display_order, ListResolution,
    ResolutionOrigin, SinglePolicy, SingleResolution,
};
pub use fetch::{fetch_state, FetchSnapshot, FetchState};
pub use query::{FetchMode, FilterValue, QueryDescriptor};
pub use record::ContentRecord;
pub use source::{BackendKind, ContentSource, ContentSources};
