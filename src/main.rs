// Headless driver: loads tokamak.toml (or the path given as the first argument) and runs the burn
fn main() {
    tokamak_sim::app::run();
}
