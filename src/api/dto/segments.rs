/*
 * Responsibility
 * - GET /segments の response DTO
 * - Field names follow the existing frontend contract (IsChecked / SegmentName / SegmentID)
 */
use serde::{Deserialize, Serialize};

use crate::services::mautic::Segment;

/// One selectable segment. `is_checked` is a client-side concern and always starts false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentAndId {
    #[serde(rename = "IsChecked")]
    pub is_checked: bool,
    #[serde(rename = "SegmentName")]
    pub segment_name: String,
    #[serde(rename = "SegmentID")]
    pub segment_id: String,
}

impl From<&Segment> for SegmentAndId {
    fn from(segment: &Segment) -> Self {
        Self {
            is_checked: false,
            segment_name: segment.name.clone(),
            segment_id: segment.id.to_string(),
        }
    }
}
