use colored::Colorize;
use std::io::BufRead;
use stepref::{
    interpreter::{Interpreter, StateInterpreter},
    parse::MyParser,
};
use tracing_subscriber::EnvFilter;

pub fn indent(str: String) -> String {
    str.lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<String>>()
        .join("\n")
}

fn main() {
    // RUST_LOG=stepref=debug shows every resolved step
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let stdin = std::io::stdin();
    let mut stdin = stdin.lock();

    let mut interpreter = Interpreter::default();

    loop {
        let buf: String = {
            let mut buf = vec![];
            if let Err(err) = stdin.read_until(b';', &mut buf) {
                println!("{err}");
                std::process::exit(1);
            }
            String::from_utf8_lossy(&buf).trim().to_string()
        };

        if buf.is_empty() {
            break;
        }

        match interpreter.now_state() {
            StateInterpreter::NoWorksheet => {
                println!("---database---")
            }
            StateInterpreter::Loaded(worksheet) => {
                println!("---worksheet {}---", worksheet.theorem())
            }
        }

        let command = match MyParser.parse_command(&buf) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                std::process::exit(1);
            }
        };

        println!("{command}");

        let res = interpreter.command(command);
        match res {
            Ok(ok) => {
                println!("{}", "SUCC".blue());
                println!("{}", indent(ok.to_string()));
            }
            Err(err) => {
                println!("{}", "FAIL".red());
                println!("{}", indent(err.to_string()));
            }
        }
    }
}
