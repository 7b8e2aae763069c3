fn main() {
    if let Err(err) = csv_coerce::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
