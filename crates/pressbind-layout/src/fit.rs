// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scaling an image against a target rectangle.

use pressbind_core::ImageSize;

/// Shrink-to-fit: scale `image` down uniformly just enough to fit inside
/// `available_width` x `available_height`. Images that already fit keep their
/// native size.
///
/// The constraining side is set to the available extent exactly, so the
/// result never overshoots on that axis through rounding.
pub fn fit_within(image: ImageSize, available_width: f32, available_height: f32) -> ImageSize {
    let ratio_w = image.width / available_width;
    let ratio_h = image.height / available_height;

    if ratio_w <= 1.0 && ratio_h <= 1.0 {
        return image;
    }
    scale_to_constraining_side(image, available_width, available_height, ratio_w, ratio_h)
}

/// Fill: scale `image` up or down until it meets the target on the more
/// constraining axis. Aspect ratio is preserved, so the other axis may fall
/// short of the target.
pub fn fill_within(image: ImageSize, available_width: f32, available_height: f32) -> ImageSize {
    let ratio_w = image.width / available_width;
    let ratio_h = image.height / available_height;
    scale_to_constraining_side(image, available_width, available_height, ratio_w, ratio_h)
}

fn scale_to_constraining_side(
    image: ImageSize,
    available_width: f32,
    available_height: f32,
    ratio_w: f32,
    ratio_h: f32,
) -> ImageSize {
    if ratio_w > ratio_h {
        ImageSize::new(available_width, image.height / ratio_w)
    } else {
        ImageSize::new(image.width / ratio_h, available_height)
    }
}
