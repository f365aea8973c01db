use crate::common::*;
use bbox::{prelude::*, TLBR, XYWH};

/// One tracked object instance in one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    /// Object identity. The same id repeats across frames.
    pub id: i32,
    /// Whether a human has confirmed this record.
    pub is_labeled: bool,
    /// Bounding box in pixel units.
    pub bbox: XYWH<i32>,
    pub occlusion: bool,
    pub out_of_view: bool,
    /// Path to the frame image. May be empty.
    pub image_path: String,
}

impl AnnotationRecord {
    /// Check if the record equals the one a freshly grown slot holds.
    pub fn is_default(&self) -> bool {
        let Self {
            id,
            is_labeled,
            bbox,
            occlusion,
            out_of_view,
            image_path,
        } = self;
        *id == 0
            && !is_labeled
            && bbox.is_zero()
            && !occlusion
            && !out_of_view
            && image_path.is_empty()
    }

    /// The box as a validated rectangle, or `None` if its extent is negative.
    pub fn rect(&self) -> Option<TLBR<i32>> {
        TLBR::try_from(&self.bbox).ok()
    }

    /// Area shared by the boxes of two records. Zero if they do not overlap.
    pub fn overlap(&self, other: &Self) -> i32 {
        self.bbox
            .intersect_with(&other.bbox)
            .map(|rect| rect.area())
            .unwrap_or(0)
    }
}
