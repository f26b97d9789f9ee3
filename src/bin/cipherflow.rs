use cipherflow::app::command_handlers;

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = command_handlers::run_cli(args, &mut std::io::stdin())?;
    println!("{output}");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
