//! Source maps from transpiled L-dialect text back to the S-dialect source
//! it was lowered from.
//!
//! An [`EmitMap`] is intentionally not [`basc_util::span::SourceMap`]: that
//! type maps a byte offset to a line/column *within a single known text*,
//! while this one maps a byte range of *generated* text back to a byte range
//! of *different, original* text. Two texts, not one.

use basc_util::Span;

/// One contiguous run of generated text and the source range it was
/// lowered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSegment {
    pub generated: Span,
    pub original: Span,
}

/// An ordered list of [`MappingSegment`]s covering the text emitted by one
/// [`crate::Transpiler::transpile`] call.
///
/// Segments are pushed in non-decreasing `generated.start` order by every
/// emitter in this crate (a single left-to-right walk of the AST), which is
/// what lets [`EmitMap::original_for_generated_offset`] binary-search rather
/// than scan.
#[derive(Debug, Clone, Default)]
pub struct EmitMap {
    mappings: Vec<MappingSegment>,
}

impl EmitMap {
    pub fn new() -> Self {
        Self { mappings: Vec::new() }
    }

    pub fn push(&mut self, generated: Span, original: Span) {
        self.mappings.push(MappingSegment { generated, original });
    }

    pub fn mappings(&self) -> &[MappingSegment] {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// The original span covering a byte offset in the generated text, if
    /// any segment claims it.
    pub fn original_for_generated_offset(&self, offset: usize) -> Option<Span> {
        let idx = self
            .mappings
            .binary_search_by(|seg| {
                if offset < seg.generated.start {
                    std::cmp::Ordering::Greater
                } else if offset >= seg.generated.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()?;
        Some(self.mappings[idx].original)
    }

    /// Composes `self` (generated -> this pass's input) with `upstream`
    /// (this pass's input -> further upstream original) into a single map
    /// from `self`'s generated positions directly to `upstream`'s original
    /// positions.
    ///
    /// Used when transpilation runs as the last of several emitting passes
    /// over the same logical file (e.g. a future pass that emits from
    /// already-lowered L-dialect text): each pass only knows how to map back
    /// one hop, and `compose` flattens the chain so callers always resolve
    /// straight to the original S-dialect source.
    pub fn compose(&self, upstream: &EmitMap) -> EmitMap {
        let mut composed = EmitMap::new();
        for seg in &self.mappings {
            let original = upstream.original_for_generated_offset(seg.original.start).unwrap_or(seg.original);
            composed.push(seg.generated, original);
        }
        composed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end, 1, 1)
    }

    #[test]
    fn looks_up_the_segment_containing_an_offset() {
        let mut map = EmitMap::new();
        map.push(span(0, 5), span(100, 105));
        map.push(span(5, 10), span(105, 112));

        assert_eq!(map.original_for_generated_offset(2), Some(span(100, 105)));
        assert_eq!(map.original_for_generated_offset(7), Some(span(105, 112)));
        assert_eq!(map.original_for_generated_offset(20), None);
    }

    #[test]
    fn compose_chains_through_an_upstream_map() {
        let mut upstream = EmitMap::new();
        upstream.push(span(100, 105), span(0, 5));

        let mut downstream = EmitMap::new();
        downstream.push(span(0, 3), span(100, 103));

        let composed = downstream.compose(&upstream);
        assert_eq!(composed.mappings().len(), 1);
        assert_eq!(composed.mappings()[0].generated, span(0, 3));
        assert_eq!(composed.mappings()[0].original, span(0, 5));
    }

    #[test]
    fn compose_falls_back_to_its_own_original_when_upstream_has_no_coverage() {
        let upstream = EmitMap::new();
        let mut downstream = EmitMap::new();
        downstream.push(span(0, 3), span(100, 103));

        let composed = downstream.compose(&upstream);
        assert_eq!(composed.mappings()[0].original, span(100, 103));
    }
}
