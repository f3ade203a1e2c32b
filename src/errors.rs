//! Error values reported by mesh construction, the octree and the CSG engine.
//!
//! Degenerate geometry is deliberately absent: a zero-area triangle is a
//! [`RayHit::Degenerate`](crate::intersect::RayHit::Degenerate) result or a
//! skipped candidate pair, never an error.

/// All the possible failures a caller can observe.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CsgError {
    /// (VertexIndexOutOfBounds) A face or lookup referenced a vertex that does not exist
    #[error("(VertexIndexOutOfBounds) vertex index {index} is out of range (vertices.len = {len})")]
    VertexIndexOutOfBounds { index: usize, len: usize },
    /// (FaceIndexOutOfBounds) A lookup referenced a face that does not exist
    #[error("(FaceIndexOutOfBounds) face index {index} is out of range (faces.len = {len})")]
    FaceIndexOutOfBounds { index: usize, len: usize },
    /// (MalformedBuffer) A geometry buffer is internally inconsistent
    #[error("(MalformedBuffer) {0}")]
    MalformedBuffer(String),
    /// (OutsideRegion) A box handed to the octree lies outside the node's region
    #[error("(OutsideRegion) bounding box (id {id:?}) is not inside the octree region")]
    OutsideRegion { id: Option<usize> },
    /// (SegmentExtraction) The exact overlap test reported an overlap but fewer
    /// than two edge hits were found between the two triangles
    #[error(
        "(SegmentExtraction) faces {face_a} and {face_b} overlap but only {hits} edge intersection(s) were found"
    )]
    SegmentExtraction {
        face_a: usize,
        face_b: usize,
        hits: usize,
    },
}

/// Result alias used throughout the crate.
pub type CsgResult<T> = Result<T, CsgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_indices() {
        let err = CsgError::VertexIndexOutOfBounds { index: 9, len: 3 };
        assert!(err.to_string().contains("vertex index 9"));

        let err = CsgError::SegmentExtraction { face_a: 1, face_b: 2, hits: 1 };
        let message = err.to_string();
        assert!(message.contains("faces 1 and 2"));
        assert!(message.contains("only 1"));
    }

    #[test]
    fn outside_region_reports_the_id() {
        assert!(CsgError::OutsideRegion { id: Some(4) }.to_string().contains("Some(4)"));
        assert!(CsgError::OutsideRegion { id: None }.to_string().contains("None"));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CsgError>();
    }
}
