//! Hierarchical region code lookup.
//!
//! Region codes such as `101020116` are concatenations of fixed-width
//! segments, one per administrative level (continent, country, province,
//! city, district). A [Segmentation] describes the widths, a [RegionTree]
//! maps every loaded code prefix to an opaque payload, and [Regions]
//! publishes a tree to concurrent readers and replaces it atomically on
//! reload.
//!
//! ```
//! use std::sync::Arc;
//! use regiontree::prelude::*;
//!
//! let seg: Segmentation = "continent:1,country:2,province:2,city:2,district:2"
//!     .parse()
//!     .unwrap();
//! let mut tree = RegionTree::with_segmentation(Arc::new(seg));
//! tree.load("1\t亚洲\tAsia\n101\t中国\n".as_bytes()).unwrap();
//!
//! let regions = Regions::new(tree);
//! let reader = regions.reader();
//! assert_eq!(&reader.find("101").unwrap()[..], "中国".as_bytes());
//! assert_eq!(reader.find("199").unwrap_err(), FindError::NotFound);
//! assert_eq!(reader.find("99").unwrap_err(), FindError::IncorrectCode);
//! assert_eq!(reader.find("").unwrap_err(), FindError::IncorrectCode);
//! ```

pub mod load;
pub mod prelude;
pub mod region;
pub mod regions;
pub mod segmentation;

pub use prelude::*;
