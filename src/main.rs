// SPDX-License-Identifier: MIT
//
// promptline — demo REPL host for the pl-line editor.
//
// Wires the library crates together the way an embedding program would:
//
//   pl-term → raw-mode terminal control, key decoding, ANSI output
//   pl-line → line buffer, history, completion, the Prompt coordinator
//
// Registers a small command vocabulary for Tab completion, loads and
// saves history in the user's home directory, and echoes each entered
// line until "exit", a bare Enter, or end of input.

use std::path::PathBuf;
use std::process;

use pl_line::editor::{Prompt, ReadError};
use pl_line::fscomplete;

/// Commands offered to Tab completion in the demo.
const COMMANDS: &[&str] = &[
    "exit",
    "help",
    "history",
    "read_celllib",
    "report_power",
    "report_timing",
];

/// History file location: `~/.promptline_history`.
fn history_path() -> PathBuf {
    fscomplete::home_dir().join(".promptline_history")
}

fn main() {
    let mut shell = Prompt::new("pl> ");
    for cmd in COMMANDS {
        shell.register_completion(cmd);
    }

    let history = history_path();
    if let Err(err) = shell.load_history(&history) {
        eprintln!("promptline: could not load history: {err}");
    }

    loop {
        match shell.readline() {
            Ok(line) => {
                if line == "exit" {
                    break;
                }
                if line == "history" {
                    println!("(history has {} entries)", shell.history_size());
                } else {
                    println!("line = {line}");
                }
                // Bare Enter ends the session, like "exit".
                if line.is_empty() {
                    break;
                }
                shell.add_history(&line);
            }
            Err(ReadError::Interrupted) => {
                println!("^C");
            }
            Err(ReadError::Eof) => break,
            Err(err) => {
                eprintln!("promptline: {err}");
                process::exit(1);
            }
        }
    }

    if let Err(err) = shell.save_history(&history) {
        eprintln!("promptline: could not save history: {err}");
    }
}
