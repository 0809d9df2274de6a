//! The tuning driver: ranks cache splits on a size-capped image prefix.

use crate::{
    encode::{simulate_len, EncodeError},
    EncodeConfig, QoigDesc,
};

/// The order in which split indices are probed. Early entries sample the
/// space broadly so a truncated probe budget still sees small, middling,
/// and large splits.
pub const PROBE_ORDER: [u8; 31] = [
    23, 18, 26, 13, 28, 7, 30, 0, 22, 27, 20, 25, 15, 29, 10, 24, 5, 19, 16, 12, 8, 3, 21, 17, 14,
    11, 9, 6, 4, 2, 1,
];

/// Smallest prefix, in raw RGBA bytes, a probe ever looks at.
const MIN_PROBE_BYTES: usize = 10_000;

/// Simulates the first `probes` entries of [`PROBE_ORDER`] on a prefix of
/// the image and returns the split index with the smallest opcode stream,
/// or `cfg.clen_index` when nothing was probed. Probe position 6 (split
/// value 64) is skipped when long indexing is on.
pub fn pick_cache_length(
    pixels: &[u8],
    desc: &QoigDesc,
    cfg: &EncodeConfig,
    probes: u8,
) -> Result<u8, EncodeError> {
    let cap = (pixels.len() / 10).max(MIN_PROBE_BYTES) as u32;
    let mut best = cfg.clen_index;
    let mut best_len = u64::MAX;
    for (position, &index) in PROBE_ORDER.iter().enumerate().take(probes as usize) {
        if cfg.longindex && position == 6 {
            continue;
        }
        let probe = EncodeConfig {
            clen_index: index,
            bytecap: Some(cap),
            ..*cfg
        };
        let len = simulate_len(pixels, desc, &probe)?;
        if len < best_len {
            best_len = len;
            best = index;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_order_is_a_permutation() {
        let mut seen = [false; 31];
        for &i in &PROBE_ORDER {
            assert!(!seen[i as usize]);
            seen[i as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        // Position 6 is the forbidden-under-longindex split value 64.
        assert_eq!(PROBE_ORDER[6], 30);
    }

    #[test]
    fn picks_the_smallest_probed_split() {
        let desc = QoigDesc::new(48, 48, 4);
        // A few repeating colors so the exact cache has real work to do.
        let palette: [[u8; 4]; 6] = [
            [12, 40, 200, 255],
            [200, 40, 12, 255],
            [7, 7, 7, 255],
            [250, 250, 250, 255],
            [90, 140, 30, 255],
            [60, 60, 190, 255],
        ];
        let pixels: Vec<u8> = (0..desc.pixel_count())
            .flat_map(|i| palette[(i * 7 + i / 5) % palette.len()])
            .collect();

        let base = EncodeConfig::fast(26);
        let chosen = pick_cache_length(&pixels, &desc, &base, 31).unwrap();

        let cap = (pixels.len() / 10).max(10_000) as u32;
        let probe = |index| {
            simulate_len(
                &pixels,
                &desc,
                &EncodeConfig {
                    clen_index: index,
                    bytecap: Some(cap),
                    ..base
                },
            )
            .unwrap()
        };
        let chosen_len = probe(chosen);
        for (position, &index) in PROBE_ORDER.iter().enumerate() {
            if position == 6 {
                continue;
            }
            assert!(chosen_len <= probe(index));
        }
        assert_ne!(chosen, 30);
    }

    #[test]
    fn zero_probes_keeps_the_configured_split() {
        let desc = QoigDesc::new(2, 2, 4);
        let pixels = [1u8; 16];
        let cfg = EncodeConfig::fast(12);
        assert_eq!(pick_cache_length(&pixels, &desc, &cfg, 0).unwrap(), 12);
    }
}
