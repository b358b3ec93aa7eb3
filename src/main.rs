use polydrift::Backdrop;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = Backdrop::new().run() {
        log::error!("backdrop failed: {e}");
        std::process::exit(1);
    }
}
