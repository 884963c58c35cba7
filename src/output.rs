use owo_colors::OwoColorize;

use crate::config::RawSection;
use crate::engine::RunSummary;

/// Console lines for the operator. Colors are enabled only when the stream is a TTY.
fn is_tty(stream: atty::Stream) -> bool {
    atty::is(stream)
}

pub fn print_info(msg: &str) {
    if is_tty(atty::Stream::Stdout) {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {msg}");
    }
}

pub fn print_warn(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

pub fn print_success(msg: &str) {
    if is_tty(atty::Stream::Stdout) {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {msg}");
    }
}

/// Print a plain line (no prefix); the closing summary goes through here.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// The closing "Finished moving ..." line, plus a tally breakdown when something went wrong.
pub fn print_summary(summary: &RunSummary) {
    print_user(&summary.to_string());
    let t = &summary.tally;
    if t.failures() > 0 || t.skipped > 0 {
        print_warn(&format!(
            "{} verification mismatches, {} copy failures, {} source deletes failed, {} directory errors, {} skipped; re-run to retry",
            t.verification_failed, t.copy_failed, t.source_delete_failed, t.dir_errors, t.skipped
        ));
    }
}

/// `--debug` dump of the available sections and the effective keys of the chosen one.
pub fn print_section(names: &[&str], section: &RawSection) {
    print_user(&format!("Sections: {}", names.join(", ")));
    print_user(&format!("[{}]", section.name));
    for (key, value) in section.entries() {
        print_user(&format!("{key} = {value}"));
    }
}
