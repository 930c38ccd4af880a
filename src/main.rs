fn main() {
    if let Err(err) = flow_lanes::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
