//! Interactive read-eval-print loop.

use lispy::ast::Value;
use lispy::{evaluator, parser, reader};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::process;
use tracing::debug;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    if let Err(e) = run_repl() {
        eprintln!("The REPL encountered an unexpected error and must exit.");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_repl() -> Result<(), ReadlineError> {
    println!("Lispy Version 0.1");
    println!("Press Ctrl + c to Exit");
    println!();

    let mut rl = DefaultEditor::new()?;
    let mut env = evaluator::create_global_env();

    loop {
        match rl.readline("lispy> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                // Handle special commands
                match line.trim() {
                    ":help" => {
                        print_help();
                        continue;
                    }
                    ":env" => {
                        print_environment(&env);
                        continue;
                    }
                    ":quit" | ":exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {}
                }

                // An empty line is still a valid (empty) expression and
                // prints as ().
                match parser::parse(&line).and_then(reader::read) {
                    Ok(value) => {
                        debug!(?value, "read input line");
                        println!("{}", evaluator::eval(&mut env, value));
                    }
                    Err(e) => println!("{e}"),
                }
            }

            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Lispy Interpreter:");
    println!("  :help  - Show this help message");
    println!("  :env   - Show current environment bindings");
    println!("  :quit  - Exit the interpreter");
    println!("  :exit  - Exit the interpreter");
    println!("  Ctrl+C - Exit the interpreter");
    println!();
    println!("Expressions:");
    println!("  Numbers: 42, -5");
    println!("  Arithmetic: +, -, *, /");
    println!("  Lists: list, head, tail, join, eval");
    println!();
    println!("Examples:");
    println!("  (+ 1 2 3)");
    println!("  head {{1 2 3}}");
    println!("  eval (tail {{tail tail {{5 6 7}}}})");
    println!();
}

fn print_environment(env: &evaluator::Environment) {
    let bindings: Vec<_> = env.bindings().collect();

    if bindings.is_empty() {
        println!("Environment is empty.");
        return;
    }

    println!("Environment bindings ({} total):", bindings.len());
    println!();

    // Separate builtin functions from other bound values
    let mut builtins = Vec::new();
    let mut other = Vec::new();

    for (name, value) in bindings {
        match value {
            Value::Builtin(_) => builtins.push(name),
            _ => other.push((name, value)),
        }
    }

    if !builtins.is_empty() {
        println!("Built-in functions ({}):", builtins.len());
        let mut col = 0;
        for name in builtins {
            print!("  {name:<8}");
            col += 1;
            if col % 4 == 0 {
                println!();
            }
        }
        if col % 4 != 0 {
            println!();
        }
        println!();
    }

    if !other.is_empty() {
        println!("Other values ({}):", other.len());
        for (name, value) in other {
            println!("  {name} = {value}");
        }
    }
}
