use levelog::{logging, Logger, Severity, Style, Traced};
use std::sync::Arc;

struct Inventory;

fn main() -> levelog::Result<()> {
    let logger = Arc::new(Logger::from_config(levelog::Config::from_env()?)?);
    logging::init(logger.clone())?;

    logger.block("levelog", Some(Style::Green));

    logger.trace("This is a trace message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    log::info!(target: "demo", "Messages from the log crate carry their target");

    let restock = Traced::for_type::<Inventory>(&logger, "restock", |(item, count): (&str, u32)| {
        format!("{} x{}", item, count)
    });
    restock.call(("widget", 12));

    logger.level(Severity::Warn);
    logger.info("Hidden once the level is raised");
    logger.error("This is an error message, followed by the call stack");

    println!("Try LEVELOG_LEVEL=info LEVELOG_FILE=demo.log cargo run --example basic");
    Ok(())
}
