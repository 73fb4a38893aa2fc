use clap::Parser;

fn main() {
  let cli = match check_umbrella::Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => match check_umbrella::parse_error_result(&e) {
      Some(result) => {
        let _ = e.print();
        println!("{result}");
        std::process::exit(result.exit_code());
      }
      None => e.exit(),
    },
  };

  let result = check_umbrella::run(&cli);
  println!("{result}");
  std::process::exit(result.exit_code());
}
