//! Boundary-line placement for channel plots.
//!
//! Vertical lines mark hardware boundaries such as sub-units, boards or
//! wire planes. With a repeat modulus `m > 0` a line is placed at every
//! channel `n * m + p` for each pattern entry `p`; with `m == 0` the
//! pattern entries are literal channel positions.

use chanwatch_types::ChannelRange;

/// Channel positions where vertical boundary lines are drawn.
///
/// Only positions inside the range are returned; the result is sorted and
/// deduplicated.
pub fn boundary_lines(range: &ChannelRange, modulus: u32, pattern: &[u32]) -> Vec<u32> {
    let mut lines: Vec<u32> = Vec::new();
    if modulus == 0 {
        lines.extend(pattern.iter().copied().filter(|&c| range.contains(c)));
    } else {
        let step = u64::from(modulus);
        let lo = u64::from(range.first);
        let hi = u64::from(range.last);
        for &entry in pattern {
            let base = u64::from(entry);
            let mut candidate = if lo > base {
                base + (lo - base).div_ceil(step) * step
            } else {
                base
            };
            while candidate <= hi {
                lines.push(candidate as u32);
                candidate += step;
            }
        }
    }
    lines.sort_unstable();
    lines.dedup();
    lines
}
