use std::io;
use std::path::Path;

use miette::{miette, Report, Severity};

// Loader errors

pub fn load_unreadable(path: &Path, error: io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::unreadable",
        help = "check that the path exists and is a readable file",
        "Could not read program image `{}`: {error}",
        path.display(),
    )
}

pub fn load_misaligned(len: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::misaligned",
        help = "program images are a sequence of little-endian 16-bit words",
        "Program image has an odd length of {len} bytes",
    )
}

// Command line errors

pub fn arg_bad_address(value: &str) -> String {
    format!("`{value}` is not an address in the range 0 to 32767")
}
