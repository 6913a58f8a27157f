fn main() {
    if let Err(err) = a11yplan::cli::run() {
        a11yplan::ui::eprintln_error(&err);
        std::process::exit(a11yplan::exit::exit_code(&err));
    }
}
