fn main() {
    glassnote_cli::run_main();
}
