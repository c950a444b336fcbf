mod cli;
mod rlpl;
mod rppl;

use std::{path::PathBuf, rc::Rc};

use clap::Parser;
use cli::{print_checked, print_checking, print_running};
use bisaya_core::{
    interpreter::{check, run},
    utils::prelude::{Warning, WarningEmitterIO},
};

#[derive(Parser)]
#[command(name = "bisayac", about = "The Bisaya++ interpreter", version)]
enum Command {
    /// Runs a Bisaya++ source file
    Run {
        /// Path of source file
        path: PathBuf,
    },
    /// Performs lexical and syntactical analysis without executing
    Check {
        /// Path of source file
        path: PathBuf,
        /// Do not print the parsed source code
        #[arg(short, long, default_value_t = false)]
        no_output: bool,
        /// Print the ast instead of the parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
}

fn main() {
    match Command::parse() {
        Command::Run { path } => {
            let warning_emitter = Rc::new(ConsoleWarningEmitter);

            print_running(&path.to_string_lossy());

            if let Err(err) = run(path, warning_emitter) {
                let buf_writer = crate::cli::stderr_buffer_writer();
                let mut buf = buf_writer.buffer();

                err.pretty(&mut buf);
                buf_writer
                    .print(&buf)
                    .expect("Writing error to stderr");

                std::process::exit(1);
            }
        },
        Command::Check { path, no_output, print_ast } => {
            let warning_emitter = Rc::new(ConsoleWarningEmitter);

            print_checking(&path.to_string_lossy());
            let start = std::time::Instant::now();

            match check(path, warning_emitter) {
                Ok(module) => {
                    if !no_output {
                        if print_ast {
                            println!("{:#?}", module.program);
                        } else {
                            println!("{}", module.program);
                        }
                    }

                    print_checked(std::time::Instant::now() - start);
                },
                Err(err) => {
                    let buf_writer = crate::cli::stderr_buffer_writer();
                    let mut buf = buf_writer.buffer();

                    err.pretty(&mut buf);
                    buf_writer
                        .print(&buf)
                        .expect("Writing error to stderr");

                    std::process::exit(1);
                }
            }
        },
        Command::Rlpl => {
            let _ = rlpl::start();
        },
        Command::Rppl => {
            let _ = rppl::start();
        },
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleWarningEmitter;

impl WarningEmitterIO for ConsoleWarningEmitter {
    fn emit_warning(&self, warning: Warning) {
        let buffer_writer = crate::cli::stderr_buffer_writer();
        let mut buffer = buffer_writer.buffer();
        warning.pretty(&mut buffer);
        buffer_writer
            .print(&buffer)
            .expect("Writing warning to stderr");
    }
}
