use docbind::errors::DocbindResult;
use docbind::repository::ModelRepository;
use docbind_int_test::test_util::{fixture_registry, person_with_addresses};

fn main() -> DocbindResult<()> {
    println!("Starting copy stress run...");
    let registry = fixture_registry()?;
    let repository = ModelRepository::new(&registry, "Person")?;

    let count = 100000;
    let source = person_with_addresses(&registry, &["first", "second", "third"])?;

    let start = std::time::Instant::now();
    for _ in 0..count {
        let mut copy = source.dup()?;
        repository.save(&mut copy)?;
    }
    let elapsed = start.elapsed();

    println!(
        "Copied and saved {} graphs in {:?} ({:.0} per second)",
        count,
        elapsed,
        count as f64 / elapsed.as_secs_f64()
    );
    println!("Collection size: {}", repository.collection().size());
    Ok(())
}
