//! Performance tests for level generation

use gridlock::generation::utils;
use gridlock::{GenerationConfig, Generator, GridlockResult, SectorDungeonGenerator};
use std::time::Instant;

#[test]
fn test_generation_performance() -> GridlockResult<()> {
    let generator = SectorDungeonGenerator::new();
    let iterations = 200;

    let start = Instant::now();
    for seed in 0..iterations {
        let config = GenerationConfig::new(seed);
        let mut rng = utils::create_rng(&config);
        generator.generate(&config, &mut rng)?;
    }
    let elapsed = start.elapsed();
    let avg = elapsed / iterations as u32;

    println!("Average level generation time: {:?}", avg);

    // One level per transition must never stall the game loop
    assert!(avg.as_millis() < 100, "Level generation too slow: {:?}", avg);

    Ok(())
}

#[test]
fn test_detailed_generation_performance() -> GridlockResult<()> {
    let generator = SectorDungeonGenerator::new();
    let iterations = 50;

    let start = Instant::now();
    for seed in 0..iterations {
        let config = GenerationConfig::for_detailed_generation(seed);
        let mut rng = utils::create_rng(&config);
        generator.generate(&config, &mut rng)?;
    }
    let avg = start.elapsed() / iterations as u32;

    println!("Average 4x4 level generation time: {:?}", avg);
    assert!(avg.as_millis() < 200, "4x4 generation too slow: {:?}", avg);

    Ok(())
}
