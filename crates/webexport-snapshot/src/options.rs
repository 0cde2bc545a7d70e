//! Snapshot options

/// Options controlling how a snapshot is frozen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotOptions {
    /// Copy every computed style property into the clone's `style` attribute
    pub inline_styles: bool,

    /// Drop `style`, `class` and `id` from every clone node
    pub strip_presentation: bool,

    /// Pin images to the source they currently display
    pub sync_images: bool,

    /// Promote lazy-load attributes and materialize CSS background images
    pub enhanced_images: bool,
}

impl SnapshotOptions {
    /// Options used for printing: styles are either frozen inline or stripped entirely
    pub fn for_print(preserve_styles: bool, enhanced_images: bool) -> Self {
        Self {
            inline_styles: preserve_styles,
            strip_presentation: !preserve_styles,
            sync_images: true,
            enhanced_images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_print() {
        let keep = SnapshotOptions::for_print(true, false);
        assert!(keep.inline_styles && !keep.strip_presentation && keep.sync_images);
        let plain = SnapshotOptions::for_print(false, true);
        assert!(!plain.inline_styles && plain.strip_presentation && plain.enhanced_images);
    }
}
