use clap::Command;

const CHAT_HELP: &str = "Once running, type one command per line:
  list                                   show every task
  todo <desc>                            add a to-do
  deadline <desc> /by <DATE>             add a deadline   (DATE: YYYY-MM-DD)
  event <desc> /from <DT> /to <DT>       add an event     (DT: YYYY-MM-DDTHH:MM)
  mark <n> | unmark <n>                  mark task n done / not done
  delete <n>                             remove task n
  find <keyword>                         tasks whose description contains keyword
  view [DATE]                            deadlines and events on DATE (default today)
  bye | exit                             leave

Examples:
  deadline return book /by 2025-12-31
  event party /from 2025-09-25T18:00 /to 2025-09-25T21:00

Tasks are kept in ~/.bingy/tasks.txt. Set RUST_LOG=debug for diagnostics.
";

pub fn build_cli() -> Command {
    Command::new("bingy")
        .about("A ghostly chatbot that keeps track of your tasks")
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(CHAT_HELP)
        .color(clap::ColorChoice::Auto)
}
