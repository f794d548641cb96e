//! Command: print version information.

/// Print the dotkeeper version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dotkeeper {}", super::display_version());
}
