#![allow(dead_code)]

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use regiontree::prelude::*;

pub const ROOT_DATA: &str = "世界\tWorld";

pub fn china() -> Arc<Segmentation> {
    let seg = Segmentation::from_widths([
        ("continent", 1),
        ("country", 2),
        ("province", 2),
        ("city", 2),
        ("district", 2),
    ])
    .unwrap();
    Arc::new(seg)
}

pub fn empty_tree() -> RegionTree {
    RegionTree::new(
        china(),
        anybytes::Bytes::from_source(ROOT_DATA.as_bytes().to_vec()),
    )
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn open(name: &str) -> File {
    File::open(fixture(name)).unwrap()
}

pub fn loaded_tree(name: &str) -> RegionTree {
    let mut tree = empty_tree();
    tree.load(open(name)).unwrap();
    tree
}

pub fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub const FIND_CASES: &[(&str, Result<&str, FindError>)] = &[
    ("1", Ok("亚洲\tAsia")),
    ("101", Ok("中国")),
    ("10101", Ok("北京")),
    ("1010101", Ok("北京")),
    ("101010101", Ok("东城")),
    ("101010116", Ok("延庆")),
    ("101020116", Ok("蓟县")),
    ("101020117", Err(FindError::NotFound)),
    ("3", Err(FindError::NotFound)),
    ("199", Err(FindError::NotFound)),
    ("99", Err(FindError::IncorrectCode)),
    ("", Err(FindError::IncorrectCode)),
    ("10102011", Err(FindError::IncorrectCode)),
    ("1010201161", Err(FindError::IncorrectCode)),
];
