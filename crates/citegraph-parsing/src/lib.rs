pub mod config;
pub mod section;
pub mod validate;

pub use config::{ParsingConfig, ParsingConfigBuilder};
pub use section::{
    RefBlob, STRATEGY_CHAIN, SegmentationResult, SegmentationStrategy, segment,
    segment_with_config, split_at_bare_numbers, split_at_bracket_markers, split_blob,
};
pub use validate::{clean, clean_with_config, is_valid_reference, merge_continuations};
// Re-export domain types from core (canonical definitions live there)
pub use citegraph_core::ReferenceEntry;

/// Turn one paper's raw bibliography blob into validated entries.
///
/// Pipeline:
/// 1. Segment the blob with the strategy chain
/// 2. Merge soft-wrapped continuation lines
/// 3. Drop candidates without a length, year or preprint signal
/// 4. Normalize whitespace
pub fn extract_entries(paper: &str, blob: &str, config: &ParsingConfig) -> Vec<ReferenceEntry> {
    let segmented = segment_with_config(blob, config);
    let entries = clean_with_config(paper, &segmented.references, config);
    tracing::debug!(
        paper,
        strategy = ?segmented.strategy,
        candidates = segmented.references.len(),
        kept = entries.len(),
        "segmented references"
    );
    entries
}
