//! Waveform renderer
//!
//! Downsamples channel 0 into a min/max envelope per pixel column and
//! paints it, overlaying highlighted bands for intervals currently marked
//! for removal. Rendering is a pure function of the model: it never
//! mutates the buffer or the registry, so re-rendering on any model change
//! is always safe ("last write wins").

use image::{Rgba, RgbaImage};

use crate::audio::SampleBuffer;
use crate::editor::registry::PauseInterval;

/// Zoom bounds exposed to the UI layer.
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 20.0;

const BACKGROUND: Rgba<u8> = Rgba([18, 18, 22, 255]);
const WAVE_COLOR: Rgba<u8> = Rgba([94, 234, 212, 255]);
const BAND_COLOR: Rgba<u8> = Rgba([255, 69, 58, 255]);
const BAND_ALPHA: f32 = 0.4;

/// Computed drawing model for one render pass.
#[derive(Debug, Clone)]
pub struct WaveformView {
    /// Drawing width in pixels (`width * zoom` columns).
    pub width: u32,
    /// Drawing height in pixels.
    pub height: u32,
    /// (min, max) sample envelope of channel 0, one entry per column.
    pub columns: Vec<(f32, f32)>,
    /// Pixel spans `[start_x, end_x)` of intervals marked for removal.
    pub bands: Vec<(u32, u32)>,
}

impl WaveformView {
    /// Build the envelope and highlight bands for the current model state.
    ///
    /// `width` is the target drawing width before zoom; the view holds
    /// `ceil(width * zoom)` columns, each covering
    /// `ceil(frame_count / columns)` frames of channel 0.
    pub fn build(
        buffer: &SampleBuffer,
        intervals: &[PauseInterval],
        width: u32,
        height: u32,
        zoom: f32,
    ) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let column_count = (width as f32 * zoom).ceil() as usize;
        let samples = buffer.channel(0);
        let step = samples.len().div_ceil(column_count.max(1)).max(1);

        let mut columns = Vec::with_capacity(column_count);
        for i in 0..column_count {
            let slice_start = i * step;
            let slice = samples
                .get(slice_start..(slice_start + step).min(samples.len()))
                .unwrap_or(&[]);
            if slice.is_empty() {
                columns.push((0.0, 0.0));
                continue;
            }
            let mut min = 1.0f32;
            let mut max = -1.0f32;
            for &sample in slice {
                if sample < min {
                    min = sample;
                }
                if sample > max {
                    max = sample;
                }
            }
            columns.push((min, max));
        }

        let duration = buffer.duration();
        let draw_width = column_count as u32;
        let bands = intervals
            .iter()
            .filter(|p| p.marked_for_removal)
            .map(|p| {
                let start_x = ((p.start / duration) * draw_width as f64) as u32;
                let end_x = ((p.end / duration) * draw_width as f64).ceil() as u32;
                (start_x.min(draw_width), end_x.min(draw_width))
            })
            .collect();

        Self {
            width: draw_width,
            height,
            columns,
            bands,
        }
    }

    /// Paint the view to an RGBA image.
    pub fn render(&self) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let center_y = self.height as f32 / 2.0;

        for (x, &(min, max)) in self.columns.iter().enumerate() {
            // Same mapping as the envelope contract: y = (1 + s) * h/2,
            // positive samples above center once the image is top-down.
            let y_top = ((1.0 - max) * center_y) as u32;
            let y_bottom = (((1.0 - min) * center_y) as u32).min(self.height.saturating_sub(1));
            for y in y_top..=y_bottom {
                image.put_pixel(x as u32, y, WAVE_COLOR);
            }
        }

        for &(start_x, end_x) in &self.bands {
            for x in start_x..end_x {
                for y in 0..self.height {
                    let blended = blend(*image.get_pixel(x, y), BAND_COLOR, BAND_ALPHA);
                    image.put_pixel(x, y, blended);
                }
            }
        }

        image
    }
}

/// Convenience wrapper: build and paint in one call.
pub fn render_waveform(
    buffer: &SampleBuffer,
    intervals: &[PauseInterval],
    width: u32,
    height: u32,
    zoom: f32,
) -> RgbaImage {
    WaveformView::build(buffer, intervals, width, height, zoom).render()
}

fn blend(dst: Rgba<u8>, src: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let mix = |d: u8, s: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
    Rgba([
        mix(dst[0], src[0]),
        mix(dst[1], src[1]),
        mix(dst[2], src[2]),
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn interval(start: f64, end: f64, marked: bool) -> PauseInterval {
        PauseInterval {
            id: Uuid::new_v4(),
            start,
            end,
            marked_for_removal: marked,
        }
    }

    /// Buffer whose first half is a flat 0.8 plateau and second half silent.
    fn plateau_buffer() -> SampleBuffer {
        let mut buffer = SampleBuffer::new(1, 1000, 100);
        for sample in buffer.channel_mut(0)[..500].iter_mut() {
            *sample = 0.8;
        }
        buffer
    }

    #[test]
    fn test_column_count_scales_with_zoom() {
        let buffer = plateau_buffer();
        let view = WaveformView::build(&buffer, &[], 100, 50, 1.0);
        assert_eq!(view.columns.len(), 100);

        let zoomed = WaveformView::build(&buffer, &[], 100, 50, 4.0);
        assert_eq!(zoomed.columns.len(), 400);
        assert_eq!(zoomed.width, 400);
    }

    #[test]
    fn test_envelope_tracks_signal_shape() {
        let buffer = plateau_buffer();
        let view = WaveformView::build(&buffer, &[], 100, 50, 1.0);

        // First half of the columns see the plateau, second half silence.
        assert_eq!(view.columns[10], (0.8, 0.8));
        assert_eq!(view.columns[80], (0.0, 0.0));
    }

    #[test]
    fn test_only_marked_intervals_produce_bands() {
        let buffer = plateau_buffer(); // 10 seconds at 100 Hz
        let intervals = vec![interval(2.0, 4.0, true), interval(5.0, 6.0, false)];
        let view = WaveformView::build(&buffer, &intervals, 100, 50, 1.0);

        assert_eq!(view.bands, vec![(20, 40)]);
    }

    #[test]
    fn test_bands_clamped_to_drawing_width() {
        let buffer = plateau_buffer();
        let intervals = vec![interval(9.5, 12.0, true)];
        let view = WaveformView::build(&buffer, &intervals, 100, 50, 1.0);

        assert_eq!(view.bands, vec![(95, 100)]);
    }

    #[test]
    fn test_render_is_pure() {
        let buffer = plateau_buffer();
        let intervals = vec![interval(2.0, 4.0, true)];
        let before = buffer.clone();

        let first = render_waveform(&buffer, &intervals, 100, 50, 1.0);
        let second = render_waveform(&buffer, &intervals, 100, 50, 1.0);

        assert_eq!(buffer, before);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_render_paints_band_region() {
        let buffer = plateau_buffer();
        let intervals = vec![interval(2.0, 4.0, true)];
        let image = render_waveform(&buffer, &intervals, 100, 50, 1.0);

        // Inside the band the background is tinted toward red.
        let tinted = image.get_pixel(30, 0);
        let plain = image.get_pixel(80, 0);
        assert!(tinted[0] > plain[0]);
    }
}
