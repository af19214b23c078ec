//! Plane-based picture descriptors.
//!
//! [`PictureView`] is the borrowed descriptor used at both engine
//! boundaries: decoded pictures borrow engine-managed buffers (valid only
//! until the next decode call), and encode input borrows caller-owned
//! storage for the duration of one encode call. [`FrameBuffer`] is the
//! owned I420 scratch a caller copies decoded planes into when it needs
//! them past that window.

use crate::error::{CodecError, Result};

/// Number of plane slots in a picture descriptor.
///
/// Three are used for planar chroma-subsampled color; the fourth is
/// reserved and always empty (no alpha channel).
pub const MAX_PLANES: usize = 4;

/// A borrowed, plane-based picture descriptor.
#[derive(Debug, Clone, Copy)]
pub struct PictureView<'a> {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// Plane data; slot 3 is always `None`.
    pub planes: [Option<&'a [u8]>; MAX_PLANES],
    /// Row stride per plane in bytes; 0 for absent planes.
    pub strides: [usize; MAX_PLANES],
}

impl<'a> PictureView<'a> {
    /// Builds an I420 view over caller-owned planes.
    pub fn i420(
        width: u32,
        height: u32,
        y: &'a [u8],
        u: &'a [u8],
        v: &'a [u8],
        strides: [usize; 3],
    ) -> Self {
        Self {
            width,
            height,
            planes: [Some(y), Some(u), Some(v), None],
            strides: [strides[0], strides[1], strides[2], 0],
        }
    }

    /// Returns the given plane, if present.
    pub fn plane(&self, index: usize) -> Option<&'a [u8]> {
        self.planes.get(index).copied().flatten()
    }

    /// Returns the row stride of the given plane (0 for absent planes).
    pub fn stride(&self, index: usize) -> usize {
        self.strides.get(index).copied().unwrap_or(0)
    }
}

/// Owned I420 picture storage with tightly packed rows.
///
/// Replaces process-wide scratch state: each caller owns its buffer, and a
/// borrowed [`PictureView`] over it is scoped to one encode call.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
}

impl FrameBuffer {
    /// Creates an empty buffer; dimensions are taken from the first copy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Picture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Picture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copies a picture into owned storage, packing any stride padding out
    /// of the rows. Resizes as needed, so one buffer can be reused across
    /// pictures of varying dimensions.
    pub fn copy_from(&mut self, picture: &PictureView<'_>) -> Result<()> {
        let width = picture.width as usize;
        let height = picture.height as usize;
        let chroma_width = width.div_ceil(2);
        let chroma_height = height.div_ceil(2);

        let dims = [
            (width, height),
            (chroma_width, chroma_height),
            (chroma_width, chroma_height),
        ];

        for (index, (w, h)) in dims.into_iter().enumerate() {
            let src = picture.plane(index).ok_or(CodecError::MissingPlane(index))?;
            let stride = picture.stride(index);
            let needed = if h == 0 { 0 } else { (h - 1) * stride + w };
            if src.len() < needed {
                return Err(CodecError::ShortPlane {
                    plane: index,
                    needed,
                    actual: src.len(),
                });
            }

            let dst = match index {
                0 => &mut self.y,
                1 => &mut self.u,
                _ => &mut self.v,
            };
            dst.resize(w * h, 0);
            for row in 0..h {
                dst[row * w..(row + 1) * w].copy_from_slice(&src[row * stride..row * stride + w]);
            }
        }

        self.width = picture.width;
        self.height = picture.height;
        Ok(())
    }

    /// Borrows the stored picture for one encode call.
    pub fn as_view(&self) -> PictureView<'_> {
        let width = self.width as usize;
        let chroma_width = width.div_ceil(2);
        PictureView::i420(
            self.width,
            self.height,
            &self.y,
            &self.u,
            &self.v,
            [width, chroma_width, chroma_width],
        )
    }
}

#[cfg(test)]
#[cfg_attr(all(coverage_nightly, test), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_copy_from_packs_out_stride_padding() {
        // 4x2 luma with stride 6 (2 bytes of padding per row).
        let y = [1, 2, 3, 4, 0, 0, 5, 6, 7, 8, 0, 0];
        // 2x1 chroma with stride 3.
        let u = [9, 10, 0];
        let v = [11, 12, 0];
        let picture = PictureView::i420(4, 2, &y, &u, &v, [6, 3, 3]);

        let mut buffer = FrameBuffer::new();
        buffer.copy_from(&picture).unwrap();

        let view = buffer.as_view();
        assert_eq!(view.plane(0).unwrap(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(view.plane(1).unwrap(), &[9, 10]);
        assert_eq!(view.plane(2).unwrap(), &[11, 12]);
        assert_eq!(view.stride(0), 4);
        assert_eq!(view.stride(1), 2);
        assert_eq!(view.plane(3), None);
        assert_eq!(view.stride(3), 0);
    }

    #[test]
    fn test_copy_from_missing_plane() {
        let y = [0u8; 4];
        let mut picture = PictureView::i420(2, 2, &y, &y, &y, [2, 1, 1]);
        picture.planes[1] = None;

        let mut buffer = FrameBuffer::new();
        let err = buffer.copy_from(&picture).unwrap_err();
        assert!(matches!(err, CodecError::MissingPlane(1)));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_copy_from_short_plane() {
        let y = [0u8; 3]; // needs 4 bytes for 2x2
        let c = [0u8; 1];
        let picture = PictureView::i420(2, 2, &y, &c, &c, [2, 1, 1]);

        let mut buffer = FrameBuffer::new();
        let err = buffer.copy_from(&picture).unwrap_err();
        assert!(matches!(err, CodecError::ShortPlane { plane: 0, .. }));
    }

    #[test]
    fn test_buffer_reuse_across_dimensions() {
        let y1 = [1u8; 16];
        let c1 = [2u8; 4];
        let big = PictureView::i420(4, 4, &y1, &c1, &c1, [4, 2, 2]);

        let y2 = [3u8; 4];
        let c2 = [4u8; 1];
        let small = PictureView::i420(2, 2, &y2, &c2, &c2, [2, 1, 1]);

        let mut buffer = FrameBuffer::new();
        buffer.copy_from(&big).unwrap();
        assert_eq!(buffer.width(), 4);
        buffer.copy_from(&small).unwrap();
        assert_eq!(buffer.width(), 2);
        assert_eq!(buffer.as_view().plane(0).unwrap(), &[3, 3, 3, 3]);
    }
}
