mod command;
mod io;
mod logging;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
