//! Inventory reports of annotated mosaic photos.

mod common;
pub mod config;
pub mod embed;
pub mod filter;
pub mod report;
pub mod tally;

pub use config::Config;
pub use embed::EmbeddedImage;
pub use filter::RecordFilter;
pub use report::Report;

use crate::common::*;

/// Warn about annotation metadata that disagrees with the actual image.
pub fn check_image(survey: &Survey, image: &EmbeddedImage) {
    let images = &survey.annotations.images;

    if images.len() > 1 {
        warn!(
            "the document has {} images, all points are drawn on the same picture",
            images.len()
        );
    }

    for entry in images {
        if let Some(size) = entry.size {
            if size != image.size {
                warn!(
                    "image #{} is annotated as {}, but the picture is {}",
                    entry.index, size, image.size
                );
            }
        }
    }

    let outside = survey.out_of_bounds(&image.size);
    if !outside.is_empty() {
        warn!("{} points lie outside of the picture", outside.len());
    }
}
