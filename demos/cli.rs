use env_logger::Env;
use std::io::{BufRead, BufReader};
use univariate::Options;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .init();

    let options = Options::default();
    let stdin = std::io::stdin();

    for line in BufReader::new(stdin.lock()).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match univariate::solve_with(&line, &options) {
            Ok(answer) => println!("{}", answer),
            Err(e) => eprintln!("Unable to solve \"{}\": {}", line, e),
        }
    }

    Ok(())
}
