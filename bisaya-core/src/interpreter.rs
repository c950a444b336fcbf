use std::{path::PathBuf, rc::Rc};

use crate::{
    eval::prelude::Evaluator,
    parser::prelude::{parse_module, Module},
    utils::prelude::{Error, SourceWarningEmitter, WarningEmitter, WarningEmitterIO},
};

/// Reads, lexes and parses a source file without executing it. Parse
/// warnings go to the given emitter.
pub fn check(
    path: PathBuf,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Module, Error> {
    let src = read_source(&path)?;

    check_source(path, src, warnings)
}

/// Reads, parses and runs a source file against standard input and output.
/// The first runtime error aborts the run.
pub fn run(
    path: PathBuf,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<(), Error> {
    let src = read_source(&path)?;
    let module = check_source(path.clone(), src.clone(), warnings)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    let result = {
        let mut evaluator = Evaluator::new(stdin.lock(), stdout.lock());
        evaluator.eval(&module)
    };

    result.map_err(|error| Error::Runtime { path, src, error })
}

fn read_source(path: &PathBuf) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|err| Error::StdIo { err: err.kind() })
}

fn check_source(
    path: PathBuf,
    src: String,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<Module, Error> {
    let warnings = WarningEmitter::new(warnings);

    let parsed = match parse_module(&src) {
        Ok(parsed) => parsed,
        Err(error) => return Err(Error::Parse { path, src, error }),
    };

    let warnings = SourceWarningEmitter::new(path, src, warnings);

    for warning in parsed.warnings {
        warnings.emit(warning);
    }

    Ok(parsed.module)
}
