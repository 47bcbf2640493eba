// Example production
// Restartable iterator that cuts (features, labels) windows out of the audio
// and label buffers, one full pass per registered signal transform

use crate::audio::SignalTransform;
use crate::dataset::plan::WindowPlan;
use crate::markers::MarkerTimeline;

/// Lazily yields fixed-shape (features, labels) pairs
///
/// Window `i` of pass `t` addresses global example `t * num_examples + i`,
/// so registering `k` transforms multiplies the corpus size by `k`. The
/// configured marker offset logically delays the audio relative to the
/// markers; windows whose shifted start would land before sample 0 are
/// dropped, and `total_examples` reflects the drop.
#[derive(Debug, Clone)]
pub struct ExampleBuilder {
    audio: Vec<f32>,
    label_buffer: Vec<f32>,
    plan: WindowPlan,
    transforms: Vec<SignalTransform>,
    marker_offset: usize,
    first_valid: usize,
    pass: usize,
    cursor: usize,
    transformed: Vec<f32>,
}

impl ExampleBuilder {
    /// Build a producer over an audio buffer and its marker timeline
    ///
    /// `markers` must be positioned in label-buffer coordinates (the caller
    /// extracts them at the effective label sample rate when the
    /// label/feature ratio is not 1). Only markers with at least one set
    /// articulation bit mark the label buffer; all-zero negatives pass
    /// through untouched.
    pub fn new(
        audio: Vec<f32>,
        markers: &MarkerTimeline,
        plan: WindowPlan,
        marker_offset: usize,
    ) -> Self {
        let available_space = audio.len() + marker_offset;
        let label_len = (plan.label_feature_ratio() * available_space as f64).ceil() as usize;

        let mut label_buffer = vec![0.0f32; label_len];
        for marker in markers.markers() {
            if marker.is_positive() && marker.pos < label_len {
                label_buffer[marker.pos] = 1.0;
            }
        }

        let first_valid = if marker_offset == 0 || plan.num_examples == 0 {
            0
        } else {
            marker_offset
                .div_ceil(plan.stride_features)
                .min(plan.num_examples)
        };
        if first_valid > 0 {
            log::debug!(
                "{} window(s) dropped per pass: marker offset {} shifts their start before sample 0",
                first_valid,
                marker_offset
            );
        }

        let transforms = vec![SignalTransform::Identity];
        let transformed = transforms[0].apply(&audio);

        ExampleBuilder {
            audio,
            label_buffer,
            plan,
            transforms,
            marker_offset,
            first_valid,
            pass: 0,
            cursor: first_valid,
            transformed,
        }
    }

    /// Register an additional transform pass; call before iterating
    pub fn transform(mut self, transform: SignalTransform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    /// Valid windows in each pass, after offset drops
    pub fn examples_per_pass(&self) -> usize {
        self.plan.num_examples - self.first_valid
    }

    /// Windows dropped from each pass by the marker offset
    pub fn dropped_per_pass(&self) -> usize {
        self.first_valid
    }

    /// Total examples this builder will yield across all passes
    pub fn total_examples(&self) -> usize {
        self.examples_per_pass() * self.transforms.len()
    }

    pub fn has_next(&self) -> bool {
        self.pass < self.transforms.len() && self.cursor < self.plan.num_examples
    }

    /// Rewind to the first window of the first pass
    pub fn reset(&mut self) {
        self.pass = 0;
        self.cursor = self.first_valid;
        self.transformed = self.transforms[0].apply(&self.audio);
    }

    /// Produce the next (features, labels) window, or `None` when drained
    pub fn next_example(&mut self) -> Option<(Vec<f32>, Vec<f32>)> {
        if !self.has_next() {
            return None;
        }

        let i = self.cursor;

        // cursor starts at first_valid, so this start is never negative
        let feature_start = i * self.plan.stride_features - self.marker_offset;
        let feature_end = feature_start + self.plan.num_features;
        let features = self.transformed[feature_start..feature_end].to_vec();

        let label_start = (i as f64 * self.plan.stride_labels).floor() as usize;
        let mut labels = vec![0.0f32; self.plan.num_labels];
        let copied = self
            .label_buffer
            .len()
            .saturating_sub(label_start)
            .min(self.plan.num_labels);
        labels[..copied].copy_from_slice(&self.label_buffer[label_start..label_start + copied]);

        // Markers too near the trailing edge carry too little context to
        // learn from
        let zeroed = self.plan.late_marker_window.min(self.plan.num_labels);
        for entry in &mut labels[self.plan.num_labels - zeroed..] {
            *entry = 0.0;
        }

        self.advance();
        Some((features, labels))
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.plan.num_examples {
            self.pass += 1;
            self.cursor = self.first_valid;
            if self.pass < self.transforms.len() {
                self.transformed = self.transforms[self.pass].apply(&self.audio);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::timeline::Marker;
    use crate::markers::NUM_ARTICULATIONS;

    fn marker_at(pos: usize) -> Marker {
        let mut labels = vec![0; NUM_ARTICULATIONS];
        labels[0] = 1;
        Marker { pos, labels }
    }

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    fn drain(builder: &mut ExampleBuilder) -> Vec<(Vec<f32>, Vec<f32>)> {
        let mut out = Vec::new();
        while let Some(example) = builder.next_example() {
            out.push(example);
        }
        out
    }

    #[test]
    fn test_windows_follow_plan_stride() {
        let plan = WindowPlan::compute(1000, 300, 300, 4);
        let mut builder =
            ExampleBuilder::new(ramp(1000), &MarkerTimeline::default(), plan, 0);

        let examples = drain(&mut builder);
        assert_eq!(examples.len(), 4);
        // Window i starts at i * 233
        for (i, (features, _)) in examples.iter().enumerate() {
            assert_eq!(features.len(), 300);
            assert_eq!(features[0], (i * 233) as f32);
        }
    }

    #[test]
    fn test_label_buffer_marks_positive_markers() {
        let plan = WindowPlan::compute(1000, 300, 300, 4);
        let markers = MarkerTimeline::new(vec![marker_at(10), marker_at(250)]);
        let mut builder = ExampleBuilder::new(ramp(1000), &markers, plan, 0);

        let (_, labels) = builder.next_example().unwrap();
        assert_eq!(labels[10], 1.0);
        assert_eq!(labels[250], 1.0);
        assert_eq!(labels.iter().filter(|&&v| v != 0.0).count(), 2);
    }

    #[test]
    fn test_negative_markers_leave_label_buffer_untouched() {
        let plan = WindowPlan::compute(1000, 300, 300, 4);
        let markers = MarkerTimeline::new(vec![Marker::silent(50)]);
        let mut builder = ExampleBuilder::new(ramp(1000), &markers, plan, 0);

        let (_, labels) = builder.next_example().unwrap();
        assert!(labels.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_each_transform_gets_a_full_pass() {
        let plan = WindowPlan::compute(1000, 300, 300, 4);
        let mut builder =
            ExampleBuilder::new(ramp(1000), &MarkerTimeline::default(), plan, 0)
                .transform(SignalTransform::InvertPolarity);

        assert_eq!(builder.total_examples(), 8);
        let examples = drain(&mut builder);
        assert_eq!(examples.len(), 8);

        // Pass 0 window i and pass 1 window i are polarity mirrors
        for i in 0..4 {
            let (plain, _) = &examples[i];
            let (inverted, _) = &examples[i + 4];
            for (a, b) in plain.iter().zip(inverted.iter()) {
                assert_eq!(*a, -*b);
            }
        }
    }

    #[test]
    fn test_reset_replays_identical_sequence() {
        let plan = WindowPlan::compute(1000, 300, 300, 4);
        let markers = MarkerTimeline::new(vec![marker_at(100), marker_at(600)]);
        let mut builder = ExampleBuilder::new(ramp(1000), &markers, plan, 0)
            .transform(SignalTransform::InvertPolarity);

        let first = drain(&mut builder);
        assert!(!builder.has_next());

        builder.reset();
        let second = drain(&mut builder);
        assert_eq!(first, second);
    }

    #[test]
    fn test_marker_offset_drops_early_windows() {
        // Offset 300 with stride 233 invalidates windows 0 and 1
        let plan = WindowPlan::compute(1000, 300, 300, 4);
        let audio = ramp(700); // available space = 700 + 300 = 1000
        let mut builder =
            ExampleBuilder::new(audio, &MarkerTimeline::default(), plan, 300);

        assert_eq!(builder.dropped_per_pass(), 2);
        assert_eq!(builder.total_examples(), 2);

        let examples = drain(&mut builder);
        assert_eq!(examples.len(), 2);
        // Window 2 starts at 2*233 - 300 = 166 in the unpadded buffer
        assert_eq!(examples[0].0[0], 166.0);
        assert_eq!(examples[1].0[0], (3 * 233 - 300) as f32);
    }

    #[test]
    fn test_late_marker_window_zeroes_trailing_labels() {
        let mut plan = WindowPlan::compute(1000, 300, 300, 4);
        plan.late_marker_window = 20;

        // One marker inside the zeroed tail, one safely inside the window
        let markers = MarkerTimeline::new(vec![marker_at(100), marker_at(295)]);
        let mut builder = ExampleBuilder::new(ramp(1000), &markers, plan, 0);

        let (_, labels) = builder.next_example().unwrap();
        assert_eq!(labels[100], 1.0);
        assert_eq!(labels[295], 0.0);
        assert!(labels[280..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_fractional_label_ratio_floors_window_starts() {
        let plan = WindowPlan::compute(1000, 300, 150, 4);
        let markers = MarkerTimeline::new(vec![marker_at(120)]);
        let mut builder = ExampleBuilder::new(ramp(1000), &markers, plan, 0);

        let examples = drain(&mut builder);
        assert_eq!(examples.len(), 4);
        for (features, labels) in &examples {
            assert_eq!(features.len(), 300);
            assert_eq!(labels.len(), 150);
        }
        // stride_labels = 116.5; window 1 labels start at floor(116.5) = 116,
        // so the marker at 120 appears at index 4
        assert_eq!(examples[1].1[4], 1.0);
    }

    #[test]
    fn test_empty_plan_yields_nothing() {
        let plan = WindowPlan::compute(100, 300, 300, 4);
        let mut builder =
            ExampleBuilder::new(ramp(100), &MarkerTimeline::default(), plan, 0);

        assert!(!builder.has_next());
        assert_eq!(builder.next_example(), None);
        assert_eq!(builder.total_examples(), 0);
    }
}
