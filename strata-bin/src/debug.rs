use strata::MultiLevelCache;

/// Step accesses by hand instead of running a trace.
pub fn debug_mode(mut memory: MultiLevelCache) {
    println!("Interactive mode.");
    println!("Enter 'h' for help.");

    loop {
        let mut input = String::new();
        match std::io::stdin().read_line(&mut input) {
            Ok(_) => if let Some(addr) = input.strip_prefix("r:") {
                access(&mut memory, addr, false);
            } else if let Some(addr) = input.strip_prefix("w:") {
                access(&mut memory, addr, true);
            } else if input.starts_with("p") {
                print_stats(&memory);
            } else if input.starts_with("f") {
                memory.flush_all();
                println!("Flushed all levels");
            } else if input.starts_with("h") {
                help();
            } else if input.starts_with("q") {
                break;
            },
            Err(e) => println!("Input error: {}", e),
        }
    }
}

fn access(memory: &mut MultiLevelCache, addr: &str, is_write: bool) {
    match u32::from_str_radix(addr.trim(), 16) {
        Ok(addr) => {
            let result = memory.access_memory(addr, is_write);
            println!("${:08X}: {}", addr, result);
        },
        Err(e) => println!("Invalid address: {}", e),
    }
}

fn print_stats(memory: &MultiLevelCache) {
    for level in 0..memory.num_levels() {
        let stats = memory.level(level).stats();
        println!(
            "L{}: {} hits / {} accesses, {} victim hits, {} write-backs",
            level + 1,
            stats.hits,
            stats.accesses(),
            stats.victim_hits,
            stats.write_backs,
        );
    }
}

fn help() {
    println!("r:x: Read access at memory location x (hex).");
    println!("w:x: Write access at memory location x (hex).");
    println!("p: Print hit/miss statistics for every level.");
    println!("f: Write back all dirty blocks and empty every level.");
    println!("h: Print this help.");
    println!("q: Quit.");
}
