use crate::{
    AllocError, Algorithm, AlwaysMajor, BlockStatus, GcConfig, Generation, NeverMajor, Simulator,
};
use std::time::Duration;

fn sim(total_size: usize, algorithm: Algorithm) -> Simulator {
    let config = GcConfig {
        total_size,
        algorithm,
        ..GcConfig::default()
    };

    Simulator::with_trigger(config, Box::new(NeverMajor))
}

#[test]
fn rejects_bad_sizes() {
    let mut sim = sim(10, Algorithm::MarkSweep);

    assert_eq!(sim.allocate(0), Err(AllocError::InvalidSize { requested: 0 }));
    assert_eq!(sim.allocate(-1), Err(AllocError::InvalidSize { requested: -1 }));
    assert_eq!(
        sim.allocate(11),
        Err(AllocError::ExceedsCapacity {
            requested: 11,
            capacity: 10
        })
    );
    assert!(sim.list_blocks().is_empty());
}

#[test]
fn error_messages_name_the_numbers() {
    let err = AllocError::InsufficientFreeMemory {
        requested: 5,
        available: 2,
    };

    assert_eq!(
        err.to_string(),
        "not enough free memory: requested 5, available 2"
    );
}

#[test]
fn full_space_reports_zero_fragmentation() {
    let mut sim = sim(10, Algorithm::MarkSweep);
    sim.allocate(10).unwrap();
    let stats = sim.stats();

    assert_eq!(stats.free, 0);
    assert_eq!(stats.fragmentation, 0);
    assert_eq!(stats.used + stats.free, stats.total);
}

#[test]
fn mark_sweep_leaves_no_marked_blocks_behind() {
    let mut sim = sim(30, Algorithm::MarkSweep);

    for _ in 0..5 {
        sim.allocate(3).unwrap();
    }
    let doomed = sim.list_blocks()[2].id();
    sim.mark_as_garbage(doomed);
    sim.run_collection();

    assert!(sim
        .list_blocks()
        .iter()
        .all(|b| b.status() == BlockStatus::Allocated));
    assert!(sim.block(doomed).is_none());
}

#[test]
fn generational_promotes_aged_blocks() {
    let config = GcConfig {
        total_size: 20,
        algorithm: Algorithm::Generational,
        young_gen_max_age: Duration::from_millis(1),
        ..GcConfig::default()
    };
    let mut sim = Simulator::with_trigger(config, Box::new(NeverMajor));
    let id = sim.allocate(4).unwrap().id();

    std::thread::sleep(Duration::from_millis(10));
    let result = sim.run_collection();

    assert_eq!(result.promoted, vec![id]);
    assert_eq!(sim.block(id).unwrap().generation(), Generation::Old);
    assert_eq!(sim.metrics().promoted_blocks, 1);
}

#[test]
fn switching_algorithms_between_runs() {
    let config = GcConfig {
        total_size: 20,
        ..GcConfig::default()
    };
    let mut sim = Simulator::with_trigger(config, Box::new(AlwaysMajor));
    let a = sim.allocate(2).unwrap().id();
    sim.mark_as_garbage(a);

    sim.set_algorithm(Algorithm::Generational);
    assert_eq!(sim.current_algorithm(), Algorithm::Generational);
    assert_eq!(sim.run_collection().algorithm, Algorithm::Generational);

    sim.set_algorithm(Algorithm::MarkSweep);
    let b = sim.allocate(2).unwrap().id();
    sim.mark_as_garbage(b);
    let result = sim.run_collection();

    assert_eq!(result.algorithm, Algorithm::MarkSweep);
    assert_eq!(result.reclaimed[0].id(), b);
    assert_eq!(sim.metrics().collections, 2);
}

#[test]
fn reset_keeps_policy() {
    let mut sim = sim(20, Algorithm::Generational);
    sim.set_threshold(40);
    sim.set_auto_collect(true);
    sim.allocate(5).unwrap();
    sim.allocate(5).unwrap();
    sim.reset();

    assert!(sim.list_blocks().is_empty());
    assert_eq!(sim.stats().used, 0);
    assert_eq!(sim.threshold(), 40);
    assert!(sim.auto_collect_enabled());
    assert_eq!(sim.current_algorithm(), Algorithm::Generational);
    assert_eq!(sim.allocate(1).unwrap().id(), 1);
}

#[test]
fn selection_follows_the_block_through_compaction() {
    let mut sim = sim(20, Algorithm::MarkSweep);
    let a = sim.allocate(4).unwrap().id();
    let b = sim.allocate(4).unwrap().id();
    sim.select(b);
    sim.mark_as_garbage(a);
    sim.run_collection();
    sim.compact();

    let selected = sim.selected_block().unwrap();
    assert_eq!(selected.id(), b);
    assert_eq!(selected.start(), 0);

    sim.deselect_all();
    assert!(sim.selected_block().is_none());
}

#[test]
fn seeded_simulators_agree() {
    let config = GcConfig {
        total_size: 50,
        algorithm: Algorithm::Generational,
        young_gen_max_age: Duration::ZERO,
        seed: Some(99),
        ..GcConfig::default()
    };
    let mut first = Simulator::new(config);
    let mut second = Simulator::new(config);

    for sim in [&mut first, &mut second] {
        let ids: Vec<_> = (0..5).map(|_| sim.allocate(2).unwrap().id()).collect();
        std::thread::sleep(Duration::from_millis(2));
        sim.run_collection();

        for id in ids {
            assert_eq!(sim.block(id).unwrap().generation(), Generation::Old);
            sim.mark_as_garbage(id);
        }
    }

    for _ in 0..20 {
        let a = first.run_collection();
        let b = second.run_collection();
        assert_eq!(a.major, b.major);
        assert_eq!(a.reclaimed.len(), b.reclaimed.len());
    }
}

#[test]
fn setters_are_visible_through_every_query() {
    let config = GcConfig {
        monitor_wait_time: 25,
        ..GcConfig::default()
    };
    let mut sim = Simulator::new(config);

    sim.set_threshold(10);
    sim.set_algorithm(Algorithm::Generational);
    sim.set_auto_collect(true);

    assert_eq!(sim.threshold(), 10);
    assert_eq!(sim.current_algorithm(), Algorithm::Generational);
    assert!(sim.auto_collect_enabled());
    assert_eq!(sim.collector().threshold(), 10);
    assert_eq!(sim.collector().algorithm(), Algorithm::Generational);
    assert!(sim.collector().auto_collect_enabled());
    assert_eq!(sim.monitor_wait_time(), 25);
    assert_eq!(sim.space().total_size(), 100);
}
