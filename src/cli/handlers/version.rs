use crate::cli::version_string;

pub fn handle_version() {
    println!("{}", version_string());
}
