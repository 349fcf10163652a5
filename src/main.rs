fn main() {
    if let Err(e) = guruchat::cli::main() {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
