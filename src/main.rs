fn main() {
  env_logger::init();
  if let Err(err) = coinkey::run() {
    eprintln!("error: {err:#}");
    std::process::exit(1);
  }
}
