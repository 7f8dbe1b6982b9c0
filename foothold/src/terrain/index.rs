use crate::segment::Foothold;

/// One indexed X span.
#[derive(Clone, Copy, Debug)]
struct Span {
    min_x: f32,
    max_x: f32,
    /// Largest `max_x` of this span and every span sorted before it.
    reach_x: f32,
    /// Position of the foothold in the terrain's storage.
    slot: usize,
}

/// Acceleration structure for X-range queries over an immutable foothold set.
///
/// Notes:
/// - Spans are sorted by `min_x`, and each carries the running maximum of
///   `max_x` up to itself. That running maximum never decreases, so both ends of
///   the candidate slice are found by binary search on stored coordinates, with
///   no float arithmetic at query time.
/// - Maps are sparse (hundreds of segments over tens of thousands of units), and
///   most footholds are short, so the slice stays small.
/// - Returned slots index the slice the accelerator was built from, in ascending
///   slot order.
#[derive(Clone, Debug, Default)]
pub struct XSpanIndex {
    spans: Vec<Span>,
}

impl XSpanIndex {
    /// Build the index over `footholds`; slot `i` refers to `footholds[i]`.
    pub fn build(footholds: &[Foothold]) -> Self {
        let mut spans: Vec<Span> = footholds
            .iter()
            .enumerate()
            .map(|(slot, f)| Span {
                min_x: f.min_x(),
                max_x: f.max_x(),
                reach_x: f.max_x(),
                slot,
            })
            .collect();
        spans.sort_by(|a, b| a.min_x.total_cmp(&b.min_x).then(a.slot.cmp(&b.slot)));

        let mut reach = f32::NEG_INFINITY;
        for span in &mut spans {
            reach = reach.max(span.max_x);
            span.reach_x = reach;
        }

        Self { spans }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Slots whose X span contains `x`, endpoints included.
    pub fn covering(&self, x: f32) -> Vec<usize> {
        self.overlapping(x, x)
    }

    /// Slots whose X span overlaps `[min_x, max_x]`, endpoints included.
    pub fn overlapping(&self, min_x: f32, max_x: f32) -> Vec<usize> {
        if self.spans.is_empty() || min_x > max_x {
            return Vec::new();
        }

        // Every span before `first` ends left of `min_x`.
        let first = self.spans.partition_point(|s| s.reach_x < min_x);
        let last = self.spans.partition_point(|s| s.min_x <= max_x);

        let mut slots: Vec<usize> = self.spans[first..last.max(first)]
            .iter()
            .filter(|s| s.max_x >= min_x)
            .map(|s| s.slot)
            .collect();
        slots.sort_unstable();
        slots
    }
}
