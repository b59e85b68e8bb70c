use std::fs::File;
use std::process;
use std::{env, io::BufReader};

use linked_accounts::cache::AccountCache;
use linked_accounts::processor::process_json_stream;

fn main() {
    env_logger::init();

    let mut args = env::args();
    if args.len() != 2 {
        let program = args.next().unwrap_or_else(|| "linked-accounts".to_owned());
        eprintln!("Usage: {} accounts.json", program);
        process::exit(2);
    }

    let Some(filename) = args.nth(1) else {
        process::exit(2);
    };
    let file = match File::open(&filename) {
        Ok(file) => file,
        Err(e) => {
            log::error!("Failed to open {}: {}", filename, e);
            process::exit(1);
        }
    };

    let mut cache = AccountCache::new();
    process_json_stream(&mut cache, BufReader::new(file));

    print!("{}", cache);
}
