#[tokio::main]
async fn main() {
  // Minimal CLI: support --version/-V
  let mut args = std::env::args().skip(1);
  if let Some(arg) = args.next() {
    if arg == "--version" || arg == "-V" {
      println!("todo-app {}", env!("CARGO_PKG_VERSION"));
      return;
    }
    if arg == "--help" || arg == "-h" {
      eprintln!("Usage: todo-app [--version]");
      eprintln!();
      eprintln!("Environment:");
      eprintln!("  DATABASE_URL            sqlx connection string (sqlite://todo.db)");
      eprintln!("  TODO_ADDR               listen address (127.0.0.1:8000)");
      eprintln!("  TODO_LOG_BUCKET         ship logs to this S3 bucket");
      eprintln!("  TODO_LOG_DIR            ship logs to this directory instead");
      eprintln!("  TODO_LOG_FLUSH_LINES    flush after this many lines (5)");
      eprintln!("  TODO_LOG_FLUSH_SECS     flush at least this often (10)");
      return;
    }
  }

  if let Err(e) = todo_app::app::run().await {
    eprintln!("error: {e}");
    std::process::exit(1);
  }
}
