// Window planning
// Derives the stride and true achievable example count for a buffer

/// Fixed windowing geometry for one example-production run
///
/// `stride_labels` is kept as f64 because the label/feature ratio need not be
/// an integer; label window starts are floored per window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPlan {
    /// Samples per feature window
    pub num_features: usize,

    /// Elements per label window
    pub num_labels: usize,

    /// Sample distance between consecutive feature window starts, >= 1
    pub stride_features: usize,

    /// Label-buffer distance between consecutive label window starts
    pub stride_labels: f64,

    /// True achievable example count per pass
    pub num_examples: usize,

    /// Signed marker/audio time offset recorded in the container header
    pub label_offset: i32,

    /// Trailing label entries zeroed in every window
    pub late_marker_window: usize,
}

impl WindowPlan {
    /// Compute a plan that evenly spaces `desired_num_examples` windows
    /// through `available_space` samples, overlapping or spreading them as
    /// necessary
    ///
    /// When the buffer cannot hold the requested count without windows
    /// collapsing to under one sample apart, the stride clamps to 1 with a
    /// warning and the achievable count is reported instead; this is never
    /// fatal. `desired_num_examples <= 1` uses the whole buffer as stride so
    /// a single example spans as much as is available.
    pub fn compute(
        available_space: usize,
        num_features: usize,
        num_labels: usize,
        desired_num_examples: usize,
    ) -> Self {
        let stride_features =
            Self::calc_stride(available_space, num_features, desired_num_examples);
        let num_examples =
            Self::calc_num_examples(available_space, num_features, stride_features);
        let ratio = num_labels as f64 / num_features as f64;

        log::info!(
            "Example overlap is {}",
            num_features as i64 - stride_features as i64
        );

        WindowPlan {
            num_features,
            num_labels,
            stride_features,
            stride_labels: stride_features as f64 * ratio,
            num_examples,
            label_offset: 0,
            late_marker_window: 0,
        }
    }

    /// Labels produced per feature sample
    pub fn label_feature_ratio(&self) -> f64 {
        self.num_labels as f64 / self.num_features as f64
    }

    fn calc_stride(available_space: usize, num_features: usize, desired: usize) -> usize {
        if desired <= 1 {
            return available_space.max(1);
        }

        let needed_space = (num_features * desired) as i64;
        let overlap = (needed_space - available_space as i64) as f64 / (desired - 1) as f64;
        let stride = (num_features as f64 - overlap).floor();

        if stride < 1.0 {
            log::warn!(
                "Not enough space available in audio for {} unique examples.",
                desired
            );
            return 1;
        }

        stride as usize
    }

    fn calc_num_examples(available_space: usize, num_features: usize, stride: usize) -> usize {
        let count =
            (available_space as i64 - num_features as i64 + stride as i64) / stride as i64;
        count.max(0) as usize
    }
}
