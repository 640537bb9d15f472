use rs_markov_core::model::snapshot::Snapshot;
use rs_markov_core::{ChainConfig, ForwardChain};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A fixed seed makes every run print the same texts
    let mut rng = ChainConfig { seed: Some(2024), ..ChainConfig::default() }.rng();

    println!("=== Markov chain examples ===\n");

    // 1. Order 1: every word only depends on the previous one
    println!("1. Basic example:");
    let mut markov1 = ForwardChain::new(1)?;
    markov1.train("O gato subiu no telhado. O gato miou. O cachorro latiu. O cachorro correu.");
    println!("   Generated: {}", markov1.generate(15, None, &mut rng));

    // 2. Order 2: two words of context, more coherent but less varied
    println!("\n2. More context (order 2):");
    let mut markov2 = ForwardChain::new(2)?;
    markov2.train(
        "A programação é uma arte. A arte requer prática. \
         A prática leva à perfeição. A perfeição é difícil de alcançar. \
         É difícil, mas não impossível. Nada é impossível para quem tenta.",
    );
    println!("   Generated: {}", markov2.generate(20, None, &mut rng));

    // 3. Training is additive: each call merges into the chain
    println!("\n3. Longer text:");
    let mut markov3 = ForwardChain::new(2)?;
    for paragraph in [
        "Era uma vez, em uma terra distante, um reino mágico.",
        "O reino mágico tinha um rei sábio e justo. O rei sábio governava com compaixão e sabedoria.",
        "Todos os habitantes eram felizes e prósperos. Um dia, um dragão apareceu no horizonte.",
        "O dragão era grande e assustador, mas não era mau. O dragão apenas procurava um lugar para descansar.",
        "O rei sábio ofereceu abrigo ao dragão cansado. O dragão agradeceu e tornou-se protetor do reino.",
        "Desde então, o reino viveu em paz e harmonia. A paz e harmonia duraram por muitos anos.",
        "E todos viveram felizes para sempre.",
    ] {
        markov3.train(paragraph);
    }
    println!("   Generated: {}", markov3.generate(30, None, &mut rng));

    // 4. A known seed is kept whole and continued
    println!("\n4. Seeded generation:");
    println!("   Seed: \"reino mágico\"");
    println!("   Generated: {}", markov3.generate(25, Some("reino mágico"), &mut rng));

    // 5. Statistics
    println!("\n5. Model statistics:");
    let stats = markov3.stats();
    println!(
        "   - order: {}, unique keys: {}, start contexts: {}, total transitions: {}",
        stats.order, stats.unique_key_count, stats.start_context_count, stats.total_transition_count
    );

    // 6. Snapshot and restore
    println!("\n6. Saving and loading:");
    let saved = markov3.snapshot().to_json()?;
    let preview: String = saved.chars().take(100).collect();
    println!("   Saved model (first 100 chars): {preview}...");

    let markov4 = ForwardChain::from_snapshot(Snapshot::from_json(&saved)?)?;
    println!("   Same statistics: {}", markov4.stats() == stats);
    println!("   Loaded model. Generated: {}", markov4.generate(20, None, &mut rng));

    // Too short for order 2: skipped with a warning, the chain is unchanged
    let mut tiny = ForwardChain::default();
    tiny.train("curto");
    println!("\n7. Untrained model: {}", tiny.generate(10, None, &mut rng));

    println!("\n=== End of examples ===\n");
    Ok(())
}
