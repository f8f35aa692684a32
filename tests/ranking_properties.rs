// Integration test: ranking invariants over randomly generated cost sheets
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tls_ranking::models::{CostComponents, CostRecord, Tier, WeightConfig};
use tls_ranking::rank;

fn random_records(rng: &mut StdRng, count: usize) -> Vec<CostRecord> {
    (0..count)
        .map(|i| {
            let costs = CostComponents {
                barangay_fee: rng.gen_range(0.0..500.0),
                rental_rate: rng.gen_range(0.0..5000.0),
                tls_opn: rng.gen_range(0.0..3000.0),
                drivers_hauler: rng.gen_range(0.0..2000.0),
                fuel_cons: rng.gen_range(0.0..100.0),
                diesel_price: rng.gen_range(50.0..80.0),
                ta_inc: rng.gen_range(0.0..500.0),
            };
            // roughly one in six locations produced nothing
            let lkg = if rng.gen_ratio(1, 6) {
                0.0
            } else {
                rng.gen_range(1.0..1000.0)
            };
            CostRecord::new(format!("LOC{:03}", i), "NORTH", costs, lkg)
        })
        .collect()
}

fn random_weights(rng: &mut StdRng) -> WeightConfig {
    let cost = [0.0, 25.0, 50.0, 75.0, 100.0][rng.gen_range(0..5)];
    WeightConfig::new(cost, 100.0 - cost)
}

#[test]
fn test_ranks_are_contiguous_and_complete() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let count = rng.gen_range(1..40);
        let records = random_records(&mut rng, count);
        let rows = rank(&records, &random_weights(&mut rng)).unwrap();

        assert_eq!(rows.len(), records.len());
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.rank, i + 1);
            assert!((0.0..=100.0).contains(&row.efficiency));
        }
    }
}

#[test]
fn test_undefined_efficiency_always_last() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let records = random_records(&mut rng, 25);
        let rows = rank(&records, &random_weights(&mut rng)).unwrap();

        let first_undefined = rows
            .iter()
            .position(|r| !r.has_defined_efficiency())
            .unwrap_or(rows.len());
        assert!(rows[first_undefined..]
            .iter()
            .all(|r| !r.has_defined_efficiency() && r.tier == Tier::Poor));
        assert!(rows[first_undefined..]
            .windows(2)
            .all(|w| w[0].location < w[1].location));
    }
}

#[test]
fn test_input_order_does_not_matter() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..20 {
        let records = random_records(&mut rng, 30);
        let weights = random_weights(&mut rng);
        let expected = rank(&records, &weights).unwrap();

        let mut shuffled = records.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(rank(&shuffled, &weights).unwrap(), expected);
        assert_eq!(rank(&records, &weights).unwrap(), expected);
    }
}

#[test]
fn test_dominating_location_scores_at_least_as_high() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let records = random_records(&mut rng, 30);
        let rows = rank(&records, &random_weights(&mut rng)).unwrap();
        let defined: Vec<_> = rows.iter().filter(|r| r.has_defined_efficiency()).collect();

        for a in &defined {
            for b in &defined {
                let (ca, cb) = (a.cost_per_unit.unwrap(), b.cost_per_unit.unwrap());
                if ca <= cb && a.lkg >= b.lkg {
                    assert!(
                        a.efficiency >= b.efficiency - 1e-9,
                        "{} dominates {} but scores lower",
                        a.location,
                        b.location
                    );
                }
            }
        }
    }
}

#[test]
fn test_cost_only_weights_order_by_cost_per_unit() {
    let mut rng = StdRng::seed_from_u64(5);
    let records = random_records(&mut rng, 30);
    let rows = rank(&records, &WeightConfig::new(100.0, 0.0)).unwrap();

    let costs: Vec<f64> = rows.iter().filter_map(|r| r.cost_per_unit).collect();
    assert!(costs.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_cutting_cost_never_hurts_a_location() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..50 {
        let mut records = random_records(&mut rng, 20);
        let weights = random_weights(&mut rng);
        let producing: Vec<usize> = (0..records.len()).filter(|&i| records[i].lkg > 0.0).collect();
        if producing.is_empty() {
            continue;
        }
        let target = producing[rng.gen_range(0..producing.len())];
        let location = records[target].location.clone();

        let before = rank(&records, &weights).unwrap();
        let costs = &mut records[target].costs;
        costs.rental_rate *= rng.gen_range(0.0..1.0);
        costs.tls_opn *= rng.gen_range(0.0..1.0);
        let after = rank(&records, &weights).unwrap();

        let old = before.iter().find(|r| r.location == location).unwrap();
        let new = after.iter().find(|r| r.location == location).unwrap();
        assert!(
            new.efficiency >= old.efficiency - 1e-9,
            "{} efficiency fell from {} to {}",
            location,
            old.efficiency,
            new.efficiency
        );
        assert!(
            new.rank <= old.rank,
            "{} rank worsened from {} to {}",
            location,
            old.rank,
            new.rank
        );
    }
}
