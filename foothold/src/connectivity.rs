//! Derive `previous` / `next` links from endpoint geometry.
//!
//! Links are recomputed from scratch on every load; whatever links the input
//! carried are discarded first. A's end joins B's start when the two points
//! agree within `link_epsilon` on both axes.
//!
//! Junctions where several segments meet at one point are resolved by taking
//! the lowest matching id. The choice is arbitrary but stable: links only guide
//! "walk onto the next platform" and play no part in collision.

use crate::segment::Foothold;

/// Whether two endpoints coincide within `eps` on both axes.
#[inline]
fn endpoints_meet(ax: f32, ay: f32, bx: f32, by: f32, eps: f32) -> bool {
    (ax - bx).abs() <= eps && (ay - by).abs() <= eps
}

/// Link footholds that share an endpoint, in place.
///
/// For each foothold A, `A.next` is the lowest-id foothold B (B ≠ A) whose start
/// meets A's end, and `A.previous` is the lowest-id foothold whose end meets A's
/// start. The result does not depend on the order of `footholds`.
///
/// O(n²) over the segment count, fine for the few hundred segments of a map.
pub fn link(footholds: &mut [Foothold], link_epsilon: f32) {
    let eps = link_epsilon.max(0.0);

    // Visit candidates in ascending id so the first match is the lowest id.
    let mut order: Vec<usize> = (0..footholds.len()).collect();
    order.sort_by_key(|&i| footholds[i].id);

    for foothold in footholds.iter_mut() {
        foothold.previous = None;
        foothold.next = None;
    }

    for &a in &order {
        let (end_x, end_y) = (footholds[a].x2, footholds[a].y2);
        let (start_x, start_y) = (footholds[a].x1, footholds[a].y1);

        let next = order.iter().copied().find(|&b| {
            b != a && endpoints_meet(end_x, end_y, footholds[b].x1, footholds[b].y1, eps)
        });
        let previous = order.iter().copied().find(|&b| {
            b != a && endpoints_meet(start_x, start_y, footholds[b].x2, footholds[b].y2, eps)
        });

        footholds[a].next = next.map(|b| footholds[b].id);
        footholds[a].previous = previous.map(|b| footholds[b].id);
    }
}
