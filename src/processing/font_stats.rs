//! Document-wide font size statistics

use crate::config::ExtractionConfig;
use std::collections::HashMap;

/// Sizes are compared at 0.01pt resolution
const SIZE_RESOLUTION: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontThresholds {
    /// Most frequent span size in the document
    pub body_font_size: f32,
    pub min_heading_font_size: f32,
}

impl FontThresholds {
    /// Body size is the mode of `sizes`; ties go to the size seen first.
    /// An empty (or fully invalid) input yields the configured fallback pair.
    pub fn estimate(sizes: &[f32], config: &ExtractionConfig) -> Self {
        let mut counts: Vec<(i32, usize)> = Vec::new();
        let mut index: HashMap<i32, usize> = HashMap::new();

        for &size in sizes {
            if !size.is_finite() || size < 0.0 {
                continue;
            }
            let key = size_key(size);
            match index.get(&key) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(key, counts.len());
                    counts.push((key, 1));
                }
            }
        }

        // max_by_key keeps the last maximum, so walk with an explicit strict comparison
        let mut best: Option<(i32, usize)> = None;
        for &(key, count) in &counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((key, count));
            }
        }

        match best {
            Some((key, _)) => {
                let body_font_size = key as f32 / SIZE_RESOLUTION;
                Self {
                    body_font_size,
                    min_heading_font_size: body_font_size + config.heading_font_margin,
                }
            }
            None => Self {
                body_font_size: config.fallback_body_size,
                min_heading_font_size: config.fallback_heading_size,
            },
        }
    }
}

/// Bucket a size at the resolution body sizes are estimated with
fn size_key(size: f32) -> i32 {
    (size * SIZE_RESOLUTION).round() as i32
}

impl FontThresholds {
    /// Strictly larger than body text, compared at bucket resolution so a line
    /// set in the body font never clears its own (rounded) body size
    pub fn exceeds_body(&self, size: f32) -> bool {
        size.is_finite() && size_key(size) > size_key(self.body_font_size)
    }
}
