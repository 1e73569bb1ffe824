use std::io::{self, IsTerminal, Write};
use std::sync::OnceLock;

const RESET: &str = "\x1b[0m";
const FG_CYAN: &str = "\x1b[36m";
const FG_BRIGHT_BLACK: &str = "\x1b[90m";

pub fn info(message: impl AsRef<str>) {
    write_line(io::stdout(), message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    write_line(io::stderr(), message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    write_line(io::stderr(), message.as_ref());
}

fn write_line(mut target: impl Write, message: &str) {
    let _ = writeln!(target, "{}", message);
}

/// One row of `taskdir list` output.
pub struct TaskLine {
    pub name: String,
    pub deps: Vec<String>,
}

pub fn print_task_list(lines: &[TaskLine]) {
    let max_name_width = lines
        .iter()
        .map(|line| line.name.chars().count())
        .max()
        .unwrap_or(0);
    let use_color = colors_enabled();

    for line in lines {
        let padded = format!("{name:<width$}", name = line.name, width = max_name_width);
        let deps = if line.deps.is_empty() {
            String::new()
        } else {
            format!("  [{}]", line.deps.join(", "))
        };

        if use_color {
            info(format!(
                "{FG_CYAN}{padded}{RESET}{FG_BRIGHT_BLACK}{deps}{RESET}"
            ));
        } else {
            info(format!("{}{}", padded, deps));
        }
    }
}

fn colors_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| io::stdout().is_terminal())
}
