use proptest::prelude::*;
use proptest::sample::subsequence;

use rand::rngs::StdRng;
use rand::SeedableRng;
use threshold_sss::random::CryptoSource;
use threshold_sss::sss::{combine, refresh_shares, split_with};
use threshold_sss::Share;

/// (share count, threshold) with 2 <= threshold <= share count <= 12.
fn params() -> impl Strategy<Value = (usize, usize)> {
    (2usize..=12).prop_flat_map(|n| (Just(n), 2usize..=n))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_threshold_subset_reconstructs(
        secret in prop::collection::vec(any::<u8>(), 1..64),
        (n, t) in params(),
        seed in any::<u64>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut rng = CryptoSource::new(StdRng::seed_from_u64(seed));
        let shares = split_with(&secret, n, t, &mut rng).unwrap();
        prop_assert_eq!(shares.len(), n);

        // a rotating window of t shares, starting anywhere
        let start = pick.index(n);
        let subset: Vec<&Share> = (0..t).map(|i| &shares[(start + i) % n]).collect();
        prop_assert_eq!(combine(&subset).unwrap(), secret);
    }

    #[test]
    fn different_subsets_agree(
        secret in prop::collection::vec(any::<u8>(), 1..32),
        seed in any::<u64>(),
        first in subsequence((0..8usize).collect::<Vec<_>>(), 4),
        second in subsequence((0..8usize).collect::<Vec<_>>(), 4..=8),
    ) {
        let mut rng = CryptoSource::new(StdRng::seed_from_u64(seed));
        let shares = split_with(&secret, 8, 4, &mut rng).unwrap();

        let a: Vec<&Share> = first.iter().map(|&i| &shares[i]).collect();
        let b: Vec<&Share> = second.iter().map(|&i| &shares[i]).collect();
        prop_assert_eq!(combine(&a).unwrap(), combine(&b).unwrap());
    }

    #[test]
    fn codec_roundtrip(x in 1u8..=255, ys in prop::collection::vec(any::<u8>(), 1..64)) {
        let share = Share::new(x, &ys).unwrap();
        let decoded = Share::try_from(share.to_bytes()).unwrap();
        prop_assert_eq!(&decoded, &share);
        prop_assert_eq!(decoded.x(), x);
        prop_assert_eq!(decoded.ys(), ys.as_slice());

        let parsed: Share = share.to_string().parse().unwrap();
        prop_assert_eq!(parsed, share);
    }

    #[test]
    fn refresh_preserves_secret(
        secret in prop::collection::vec(any::<u8>(), 1..32),
        (n, t) in params(),
        seed in any::<u64>(),
    ) {
        let mut rng = CryptoSource::new(StdRng::seed_from_u64(seed));
        let mut shares = split_with(&secret, n, t, &mut rng).unwrap();
        refresh_shares(&mut shares, t, &mut rng).unwrap();
        prop_assert_eq!(combine(&shares[n - t..]).unwrap(), secret);
    }
}
