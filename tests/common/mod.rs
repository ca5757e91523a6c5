#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use gtprep::PassConfig;

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    RgbImage::from_pixel(width, height, Rgb([240, 240, 240]))
        .save_with_format(path, ImageFormat::Jpeg)
        .expect("write jpeg file");
}

pub fn write_gt(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write gt file");
}

/// A small receipt dataset under `root`:
/// - `r1`: two good lines, one short line, one blank line
/// - `r2`: label with commas, a tiny box and a box outside the image
/// - `r3`: ground truth without an image
pub fn create_receipts(root: &Path) {
    write_jpeg(&root.join("images/r1.jpg"), 120, 80);
    write_jpeg(&root.join("images/r2.jpg"), 100, 100);

    write_gt(
        &root.join("gt/r1.txt"),
        "10,10,110,10,110,30,10,30,GROCERY MART\n\
         not,enough,fields\n\
         \n\
         10,40,60,40,60,70,10,70,TOTAL 12.50\n",
    );
    write_gt(
        &root.join("gt/r2.txt"),
        "10,90,90,10,10,10,90,90,Hello, World\n\
         5,5,7,5,7,7,5,7,tiny\n\
         150,150,190,150,190,190,150,190,outside\n",
    );
    write_gt(&root.join("gt/r3.txt"), "1,1,50,1,50,50,1,50,orphan\n");
}

pub fn full_text_config(root: &Path) -> PassConfig {
    PassConfig::full_text_under(root)
}

pub fn per_line_config(root: &Path) -> PassConfig {
    PassConfig::per_line_under(root)
}
