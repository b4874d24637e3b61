use std::hash::BuildHasher;
use std::hash::RandomState;

use chain_hash::HashMap;

use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: usize,

    #[arg(short = 's', long = "table_size", default_value_t = 10)]
    table_size: usize,

    #[arg(short = 'l', long = "max_load_factor", default_value_t = 1.0)]
    max_load_factor: f32,
}

fn main() {
    let args = Args::parse();

    let mut map: HashMap<u64, u64, RandomState> =
        HashMap::with_table_size_and_hasher(args.table_size, RandomState::new());
    if let Err(error) = map.set_max_load_factor(args.max_load_factor) {
        eprintln!("{}", error);
        std::process::exit(2);
    }

    println!(
        "Requested {} buckets, got {} (max load factor {})",
        args.table_size,
        map.table_size(),
        map.max_load_factor()
    );
    println!("Inserting {} u64 keys...", args.entries);

    let mut rehashes = 0;
    let mut table_size = map.table_size();
    for i in 0..args.entries as u64 {
        let key = map.hasher().hash_one(i);
        if let Err(error) = map.try_insert(key, i) {
            eprintln!("Insert {} failed: {}", i, error);
            break;
        }
        if map.table_size() != table_size {
            rehashes += 1;
            println!(
                "  rehash #{}: {} -> {} buckets at {} entries",
                rehashes,
                table_size,
                map.table_size(),
                map.len()
            );
            table_size = map.table_size();
        }
    }

    println!("Inserted {} entries", map.len());
    println!(
        "Final load factor: {:.2}% of {} buckets",
        map.load_factor() * 100.0,
        map.table_size()
    );

    map.chain_histogram().print();
    map.debug_stats().print();
}
