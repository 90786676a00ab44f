use std::collections::BTreeSet;

use fount_core::{Decoded, EncodingUnit, FountError, Shortfall, Slot, Symbol};
use fount_lt::{PeelState, PeelingDecoder, SolitonConfig};
use fount_precode::Precode;
use fount_raptor::{CodecConfig, CompositeCodec};
use proptest::prelude::*;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

fn random_sources(k: usize, len: usize, seed: u64) -> Vec<Symbol> {
    let mut rng = ChaCha20Rng::seed_from_u64(!seed);
    (0..k)
        .map(|_| {
            let mut buf = vec![0u8; len];
            rng.fill_bytes(&mut buf);
            Symbol::from(buf)
        })
        .collect()
}

fn unit(id: u32, neighbors: &[u32], intermediate: &[Symbol]) -> EncodingUnit {
    let mut value = Symbol::zeroed(intermediate[0].len());
    for &n in neighbors {
        value.xor_assign(&intermediate[n as usize]);
    }
    EncodingUnit::new(id, neighbors.to_vec(), value).unwrap()
}

fn known_set(slots: &[Slot]) -> BTreeSet<usize> {
    slots.iter().enumerate().filter(|(_, s)| s.is_known()).map(|(i, _)| i).collect()
}

fn phase1_slots(units: &[EncodingUnit], n: usize) -> Vec<Slot> {
    let mut peel = PeelingDecoder::new(units, n).unwrap();
    peel.run();
    peel.slots().to_vec()
}

#[test]
fn test_precode_repairs_what_peeling_cannot() {
    // K = 15, P = 3, 17 of 18 intermediate symbols arrive; source 4 is lost.
    let precode =
        Precode::from_constraints(15, vec![vec![2, 4, 7], vec![0, 5, 9, 12], vec![1, 8, 13, 14]])
            .unwrap();
    let codec = CompositeCodec::with_precode(precode, SolitonConfig::default()).unwrap();
    let sources = random_sources(15, 32, 1);
    let inter = codec.intermediate(&sources).unwrap();

    let units: Vec<EncodingUnit> =
        (0..18u32).filter(|&i| i != 4).map(|i| unit(i, &[i], &inter)).collect();

    // The rateless layer alone stalls with exactly source 4 missing.
    let lt_only = fount_lt::decode(&units, 18).unwrap();
    assert_eq!(lt_only.unresolved().into_iter().collect::<Vec<_>>(), vec![4]);

    let (decoded, report) = codec.decode_with_report(&units).unwrap();
    assert_eq!(decoded, Decoded::Recovered { sources: sources.clone() });
    assert_eq!(report.phase1, PeelState::Stalled);
    assert_eq!(report.phase1_resolved, 17);
    assert_eq!((report.rounds, report.repaired), (1, 1));

    assert_eq!(codec.decode_exact(&units).unwrap().sources(), Some(&sources[..]));
}

#[test]
fn test_repaired_parity_restarts_peeling() {
    // Parity 4 = s0^s1^s2. Unit {3, 4} needs that parity before it can
    // release s3, and the precode alone never touches s3.
    let precode = Precode::from_constraints(4, vec![vec![0, 1, 2]]).unwrap();
    let codec = CompositeCodec::with_precode(precode, SolitonConfig::default()).unwrap();
    let sources = random_sources(4, 8, 2);
    let inter = codec.intermediate(&sources).unwrap();
    let units = vec![
        unit(0, &[0], &inter),
        unit(1, &[1], &inter),
        unit(2, &[2], &inter),
        unit(3, &[3, 4], &inter),
    ];

    let one_shot = codec.precode().decode(&phase1_slots(&units, 5)).unwrap();
    assert_eq!(one_shot.unresolved().into_iter().collect::<Vec<_>>(), vec![3]);

    let (decoded, report) = codec.decode_with_report(&units).unwrap();
    assert_eq!(decoded.sources(), Some(&sources[..]));
    assert_eq!(report.phase1_resolved, 3);
    assert_eq!(report.repaired, 1);
}

#[test]
fn test_unrepairable_loss_is_reported_not_guessed() {
    // Source 3 is in no constraint and in no unit.
    let precode = Precode::from_constraints(4, vec![vec![0, 1, 2]]).unwrap();
    let codec = CompositeCodec::with_precode(precode, SolitonConfig::default()).unwrap();
    let sources = random_sources(4, 8, 3);
    let inter = codec.intermediate(&sources).unwrap();
    let units = vec![unit(0, &[0], &inter), unit(1, &[1, 2], &inter), unit(2, &[2], &inter)];

    match codec.decode(&units).unwrap() {
        Decoded::Partial(p) => {
            assert_eq!(p.cause(), &Shortfall::Exhausted);
            assert_eq!(p.unresolved().into_iter().collect::<Vec<_>>(), vec![3]);
            assert_eq!(&p.slots()[..3], &[
                Slot::Known(sources[0].clone()),
                Slot::Known(sources[1].clone()),
                Slot::Known(sources[2].clone()),
            ]);
        }
        other => panic!("expected partial, got {:?}", other),
    }

    // Elimination pins the parity column too, but the shortfall only names
    // source columns.
    let exact = codec.decode_exact(&units).unwrap();
    assert_eq!(exact.unresolved().into_iter().collect::<Vec<_>>(), vec![3]);
    assert_eq!(exact.into_sources(), Err(FountError::RankDeficient { rank: 3, pivots: vec![0, 1, 2] }));
}

#[test]
fn test_exact_shortfall_stays_inside_the_source_range() {
    // K = 6, P = 2: parity columns 6 and 7 are always pinned by their
    // constraint rows, so any shortfall would otherwise mention them.
    let codec = CompositeCodec::new(&CodecConfig::new(6, 2, 11)).unwrap();
    let sources = random_sources(6, 4, 11);
    let units = codec.encode(&sources, 3, &mut ChaCha20Rng::seed_from_u64(11)).unwrap();

    match codec.decode_exact(&units).unwrap().into_sources() {
        Err(FountError::RankDeficient { rank, pivots }) => {
            assert_eq!(rank, pivots.len());
            assert!(pivots.iter().all(|&c| c < 6), "pivots {:?}", pivots);
        }
        other => panic!("3 units cannot pin 6 sources, got {:?}", other),
    }
}

#[test]
fn test_no_units_leaves_everything_unknown() {
    let codec = CompositeCodec::new(&CodecConfig::new(6, 2, 0)).unwrap();
    assert_eq!(codec.decode(&[]).unwrap().unresolved().len(), 6);
    assert_eq!(codec.decode_exact(&[]).unwrap().unresolved().len(), 6);
}

#[test]
fn test_95_percent_of_intermediate_units() {
    // K = 15, P = 3, 17 units. Peeling 18 unknowns from 17 units always
    // stalls; the precode bridge recovers some of those stalls.
    const TRIALS: u64 = 500;
    let mut phase1_sources = 0;
    let mut composite = 0;
    let mut exact = 0;

    for seed in 0..TRIALS {
        let codec = CompositeCodec::new(&CodecConfig::new(15, 3, seed)).unwrap();
        let sources = random_sources(15, 4, seed);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let units = codec.encode(&sources, 17, &mut rng).unwrap();

        let p1 = phase1_slots(&units, 18);
        if p1[..15].iter().all(Slot::is_known) {
            phase1_sources += 1;
        }

        let (decoded, report) = codec.decode_with_report(&units).unwrap();
        assert_eq!(report.phase1, PeelState::Stalled);
        if let Some(got) = decoded.sources() {
            assert_eq!(got, &sources[..]);
            composite += 1;
        }

        let solved = codec.decode_exact(&units).unwrap();
        assert!(solved.resolved() >= decoded.resolved());
        if solved.is_recovered() {
            exact += 1;
        }
    }

    assert!(composite >= 1, "composite never recovered");
    assert!(composite > phase1_sources, "composite {} vs phase 1 {}", composite, phase1_sources);
    assert!(exact >= composite);
}

#[test]
fn test_encode_is_reproducible() {
    let codec = CompositeCodec::new(&CodecConfig::new(10, 3, 5)).unwrap();
    let sources = random_sources(10, 16, 5);
    let a = codec.encode(&sources, 30, &mut ChaCha20Rng::seed_from_u64(8)).unwrap();
    let b = codec.encode(&sources, 30, &mut ChaCha20Rng::seed_from_u64(8)).unwrap();
    assert_eq!(a, b);

    let inter = codec.intermediate(&sources).unwrap();
    assert!(a.iter().all(|u| u.residual(&inter).unwrap().is_zero()));
    assert!(codec.stream(&sources).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Each decode path knows at least what the weaker one knows, and only
    /// true values.
    #[test]
    fn prop_layers_only_add_knowledge(seed in any::<u64>(), count in 8usize..30) {
        let (k, p) = (12, 3);
        let codec = CompositeCodec::new(&CodecConfig::new(k, p, seed)).unwrap();
        let sources = random_sources(k, 4, seed);
        let units = codec.encode(&sources, count, &mut ChaCha20Rng::seed_from_u64(seed)).unwrap();

        let p1 = phase1_slots(&units, k + p);
        let one_shot = codec.precode().decode(&p1).unwrap();
        let composite = codec.decode(&units).unwrap();
        let exact = codec.decode_exact(&units).unwrap();

        let sets: Vec<BTreeSet<usize>> = [&one_shot, &composite, &exact]
            .iter()
            .map(|d| (0..k).filter(|i| !d.unresolved().contains(&(*i as u32))).collect())
            .collect();
        let phase1: BTreeSet<usize> = known_set(&p1[..k]);

        prop_assert!(phase1.is_subset(&sets[0]));
        prop_assert!(sets[0].is_subset(&sets[1]));
        prop_assert!(sets[1].is_subset(&sets[2]));

        for d in [composite, exact] {
            if let Decoded::Partial(part) = &d {
                for (i, slot) in part.slots().iter().enumerate() {
                    if let Slot::Known(v) = slot {
                        prop_assert_eq!(v, &sources[i]);
                    }
                }
            } else {
                prop_assert_eq!(d.sources(), Some(&sources[..]));
            }
        }
    }
}
