use rand::{
    rngs::StdRng,
    seq::{IndexedRandom, IteratorRandom},
    Rng, SeedableRng,
};
use rustc_hash::FxHashMap;
use slabmap::SlabMap;

fn check_against_model(map: &SlabMap<char>, model: &FxHashMap<usize, char>) {
    assert_eq!(map.len(), model.len());
    assert_eq!(map.iter().len(), model.len());

    let mut expected: Vec<(usize, char)> = model.iter().map(|(&key, &val)| (key, val)).collect();
    expected.sort_unstable();
    let actual: Vec<(usize, char)> = map.iter().map(|(key, &val)| (key, val)).collect();
    assert_eq!(actual, expected);

    let mut reversed: Vec<(usize, char)> = map.iter().rev().map(|(key, &val)| (key, val)).collect();
    reversed.reverse();
    assert_eq!(reversed, expected);
}

fn run(iterations: usize) {
    let mut map = SlabMap::new();
    let mut model = FxHashMap::default();
    let mut dead_keys = Vec::new();

    let seed = rand::random();
    let mut rng = StdRng::from_seed(seed);

    scopeguard::defer_on_unwind! {
        println!("SEED: {seed:?}");
    }

    for i in 0..iterations {
        scopeguard::defer_on_unwind! {
            println!("failed on iteration {i}")
        }
        match rng.random_range(0..=10) {
            0..=2 => {
                let x = rng.random();
                let key = map.insert(x);
                assert!(!model.contains_key(&key));
                model.insert(key, x);
                dead_keys.retain(|&dead| dead != key);
            }
            3 => {
                let Some((&key, &val)) = model.iter().choose(&mut rng) else {
                    continue;
                };

                assert_eq!(map[key], val);
                assert!(map.contains_key(key));
            }
            4 => {
                let Some((&key, val)) = model.iter_mut().choose(&mut rng) else {
                    continue;
                };

                assert_eq!(map[key], *val);
                *val = rng.random();
                map[key] = *val;
            }
            5 | 6 => {
                let Some((&key, &val)) = model.iter().choose(&mut rng) else {
                    continue;
                };
                model.remove(&key);

                assert_eq!(map.remove(key), Some(val));
                dead_keys.push(key);
            }
            7 => {
                let Some(&key) = dead_keys.as_slice().choose(&mut rng) else {
                    continue;
                };

                assert!(map.get(key).is_none());
                assert!(map.get_mut(key).is_none());
                assert!(map.remove(key).is_none());
            }
            8 => {
                map.optimize();
                check_against_model(&map, &model);
            }
            9 => {
                let modulus = rng.random_range(2..8);
                map.retain(|key, _| key % modulus != 0);
                model.retain(|&key, _| {
                    if key % modulus == 0 {
                        dead_keys.push(key);
                        false
                    } else {
                        true
                    }
                });
                check_against_model(&map, &model);
            }
            10 => {
                // clearing too often would keep the map tiny
                if !rng.random_ratio(1, 8) {
                    continue;
                }

                let capacity = map.capacity();
                map.clear();
                assert_eq!(map.capacity(), capacity);
                dead_keys.extend(model.drain().map(|(key, _)| key));
                check_against_model(&map, &model);
            }
            _ => unreachable!(),
        }

        if map.is_empty() {
            assert_eq!(map.iter().next(), None);
        }
    }

    check_against_model(&map, &model);

    for key in dead_keys {
        assert!(map.get(key).is_none());
        assert!(map.remove(key).is_none());
    }

    let drained: Vec<(usize, char)> = map.drain().collect();
    assert_eq!(drained.len(), model.len());
    assert!(map.is_empty());
}

#[test]
fn test_random_workload() {
    run(1024 * 64);
}

#[test]
fn test_short_workloads() {
    for _ in 0..256 {
        run(64);
    }
}
