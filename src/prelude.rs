pub use crate::load::{LoadError, LoadStats};
pub use crate::region::{FindError, NodeId, Region, RegionTree};
pub use crate::regions::{RegionReader, Regions};
pub use crate::segmentation::{IncorrectCode, Level, Segmentation, SegmentationError};
