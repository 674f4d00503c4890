use aroi::cli::{generate_completions, Args, Commands, DumpStage};
use aroi::config::AppConfig;
use aroi::diagnostic::{DiagnosticReporter, Reporter};
use aroi::interpreter::parse;
use aroi::lexer::scan;
use aroi::printer::print_stmt;
use aroi::token::{Literal, Token};
use aroi::{Session, Status};
use clap::Parser;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// `sysexits` code for an input file that cannot be opened.
const EXIT_NO_INPUT: i32 = 66;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting aroi");

    let code = match &args.script {
        Some(path) => run_file(path, &config),
        None => {
            run_prompt(&config);
            0
        }
    };

    let _ = io::stdout().flush();
    std::process::exit(code);
}

fn run_file(path: &Path, config: &AppConfig) -> i32 {
    verbose_log(config, &format!("Reading script from file: {}", path.display()));
    let source = match read_file(path) {
        Ok(s) => s,
        Err(e) => {
            error_message(config, &e);
            return EXIT_NO_INPUT;
        }
    };
    verbose_log(config, &format!("Read {} bytes of source", source.len()));

    let file_name = path.display().to_string();
    if let Some(stage) = config.dump {
        return dump(&source, &file_name, stage, config).exit_code();
    }

    let mut session = Session::new();
    let status = run_source(&mut session, &source, &file_name, config);
    verbose_log(config, &format!("Finished with status {:?}", status));
    status.exit_code()
}

fn run_prompt(config: &AppConfig) {
    verbose_log(config, "Entering interactive mode");

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        // A closed stdout ends the session instead of panicking.
        if write!(stdout, "aroi> ").and_then(|()| stdout.flush()).is_err() {
            break;
        }

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed == "exit" || trimmed == "quit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == ":env" {
                    if print_env(&session, &mut stdout).is_err() {
                        break;
                    }
                    continue;
                }
                run_source(&mut session, &line, "<repl>", config);
            }
            Err(e) => {
                error_message(config, &format!("Error reading input: {}", e));
                break;
            }
        }
    }
}

/// Lists every visible binding as `name = value`.
fn print_env(session: &Session, out: &mut impl Write) -> io::Result<()> {
    for (name, value) in session.interpreter().environment().bindings() {
        writeln!(out, "{} = {}", name, value)?;
    }
    out.flush()
}

/// Runs one source text and renders whatever errors it produced to stderr.
fn run_source(session: &mut Session, source: &str, file_name: &str, config: &AppConfig) -> Status {
    let mut reporter =
        DiagnosticReporter::new(source, file_name, config.color_enabled).verbose(config.verbose);
    let status = session.run(source, &mut reporter);
    if reporter.has_errors() {
        eprint!("{}", reporter.finish());
    }
    status
}

fn dump(source: &str, file_name: &str, stage: DumpStage, config: &AppConfig) -> Status {
    let mut reporter =
        DiagnosticReporter::new(source, file_name, config.color_enabled).verbose(config.verbose);
    let scanned = scan(source);
    scanned.errors.iter().for_each(|e| reporter.syntax_error(e));

    match stage {
        DumpStage::Tokens => {
            verbose_log(config, &format!("Dumping {} tokens", scanned.tokens.len()));
            for token in &scanned.tokens {
                if config.json {
                    println!("{}", token_to_json(token));
                } else {
                    println!("{}", token);
                }
            }
        }
        DumpStage::Ast => {
            let parsed = parse(scanned.tokens);
            parsed.errors.iter().for_each(|e| reporter.syntax_error(e));
            verbose_log(config, &format!("Dumping {} statements", parsed.statements.len()));
            for stmt in &parsed.statements {
                println!("{}", print_stmt(stmt));
            }
        }
    }

    if reporter.has_errors() {
        eprint!("{}", reporter.finish());
        Status::SyntaxError
    } else {
        Status::Completed
    }
}

fn token_to_json(token: &Token) -> serde_json::Value {
    let literal = match &token.literal {
        Some(Literal::Number(n)) => serde_json::json!(n),
        Some(Literal::String(s)) => serde_json::json!(s),
        None => serde_json::Value::Null,
    };
    serde_json::json!({
        "line": token.line,
        "kind": token.kind.to_string(),
        "lexeme": token.lexeme,
        "literal": literal,
        "span": [token.span.start, token.span.end],
    })
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[aroi:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
