fn main() {
    if let Err(err) = taskdir::run() {
        taskdir::printer::error(format!("{}", err));
        std::process::exit(1);
    }
}
