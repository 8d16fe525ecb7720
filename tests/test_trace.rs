use levelog::sink::SharedBuffer;
use levelog::{traced, Logger, Severity, Traced};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

struct Calculator;

fn capture(level: Severity) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let logger = Logger::builder()
        .level(level)
        .color(false)
        .capture_stack(false)
        .console(buffer.clone())
        .build()
        .expect("console logger builds");
    (logger, buffer)
}

fn timing_lines(output: &str, method: &str) -> usize {
    let needle = format!("{}(args) => result in ", method);
    output.lines().filter(|line| line.contains(&needle)).count()
}

#[test]
fn test_call_is_transparent_and_logged() {
    let (logger, buffer) = capture(Severity::Trace);
    let add = Traced::new(&logger, "Calculator", "add", |(a, b): (i32, i32)| a + b);

    assert_eq!(add.call((2, 3)), 5);

    let output = buffer.contents();
    assert_eq!(timing_lines(&output, "add"), 1);
    assert!(output.contains("[TRACE]"));
    assert!(output.contains("[Calculator] add(args) => result in "));
    assert!(output.contains(" ms."));
    assert!(output.contains("\n  Arguments: [2,3]\n"));
    assert!(output.ends_with("  Returns: 5\n"));
}

#[test]
fn test_filtered_level_emits_nothing() {
    let (logger, buffer) = capture(Severity::Info);
    let add = Traced::new(&logger, "Calculator", "add", |(a, b): (i32, i32)| a + b);

    assert_eq!(add.call((20, 22)), 42);
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_custom_level() {
    let (logger, buffer) = capture(Severity::Info);
    let shout = Traced::new(&logger, "Greeter", "shout", |(name,): (String,)| {
        name.to_uppercase()
    })
    .level(Severity::Warn);

    assert_eq!(shout.call(("ada".to_string(),)), "ADA");

    let output = buffer.contents();
    assert!(output.contains("[WARN]"));
    assert!(output.contains("Arguments: [\"ada\"]"));
    assert!(output.contains("Returns: \"ADA\""));
}

#[test]
fn test_off_level_emits_nothing() {
    let (logger, buffer) = capture(Severity::Trace);
    let add = Traced::new(&logger, "Calculator", "add", |(a, b): (i32, i32)| a + b)
        .level(Severity::Off);

    assert_eq!(add.call((1, 1)), 2);
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_logging_decision_is_made_before_the_call() {
    let (logger, buffer) = capture(Severity::Trace);
    let raise = Traced::new(&logger, "Config", "raise", |(level,): (Severity,)| {
        logger.level(level);
        true
    });

    assert!(raise.call((Severity::Critical,)));

    let output = buffer.contents();
    assert_eq!(timing_lines(&output, "raise"), 1);
    assert!(output.contains("Arguments: [\"CRITICAL\"]"));
    assert!(output.contains("Returns: true"));

    buffer.clear();
    logger.level(Severity::Info);
    let lower = Traced::new(&logger, "Config", "lower", |(level,): (Severity,)| {
        logger.level(level);
        true
    });

    assert!(lower.call((Severity::Trace,)));
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_try_call_error_skips_logging() {
    let (logger, buffer) = capture(Severity::Trace);
    let parse = Traced::new(&logger, "Parser", "parse", |(text,): (&str,)| {
        text.parse::<u32>().map_err(|e| e.to_string())
    });

    let err = parse.try_call(("nope",)).unwrap_err();
    assert_eq!(err, "invalid digit found in string");
    assert_eq!(buffer.contents(), "");

    assert_eq!(parse.try_call(("17",)), Ok(17));
    let output = buffer.contents();
    assert_eq!(timing_lines(&output, "parse"), 1);
    assert!(output.contains("Returns: 17"));
}

#[test]
fn test_panic_propagates_without_logging() {
    let (logger, buffer) = capture(Severity::Trace);
    let divide = Traced::new(&logger, "Calculator", "divide", |(a, b): (i32, i32)| {
        if b == 0 {
            panic!("division by zero");
        }
        a / b
    });

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| divide.call((1, 0))));

    let payload = outcome.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"division by zero"));
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_traced_closure_keeps_signature() {
    let (logger, buffer) = capture(Severity::Trace);
    let add = traced(&logger, "Calculator", "add", |(a, b): (u8, u8)| a + b);

    let total: u8 = [(1, 2), (3, 4)].into_iter().map(&add).sum();

    assert_eq!(total, 10);
    assert_eq!(timing_lines(&buffer.contents(), "add"), 2);
}

#[test]
fn test_for_type_uses_short_type_name() {
    let (logger, buffer) = capture(Severity::Trace);
    let negate = Traced::for_type::<Calculator>(&logger, "negate", |(a,): (i64,)| -a);

    assert_eq!(negate.call((9,)), -9);
    assert!(buffer.contents().contains("[Calculator] negate(args)"));
}

#[test]
fn test_details_are_persisted_without_indent() -> levelog::Result<()> {
    let path = std::env::temp_dir().join(format!("levelog-trace-{}.log", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let (logger, _buffer) = capture(Severity::Trace);
    logger.persist(Some(&path))?;

    let add = Traced::new(&logger, "Calculator", "add", |(a, b): (i32, i32)| a + b);
    add.call((2, 3));
    logger.flush()?;

    let content = std::fs::read_to_string(&path)?;
    assert!(content.contains("[Calculator] add(args) => result in "));
    assert!(content.contains("\nArguments: [2,3]\n"));
    assert!(content.ends_with("\nReturns: 5\n"));

    std::fs::remove_file(&path)?;
    Ok(())
}

#[tokio::test]
async fn test_call_async_times_the_future() {
    let (logger, buffer) = capture(Severity::Trace);
    let slow_add = Traced::new(&logger, "Calculator", "slow_add", |(a, b): (u64, u64)| async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        a + b
    });

    assert_eq!(slow_add.call_async((3, 4)).await, 7);

    let output = buffer.contents();
    assert_eq!(timing_lines(&output, "slow_add"), 1);
    assert!(output.contains("Returns: 7"));

    let line = output
        .lines()
        .find(|line| line.contains("slow_add(args)"))
        .unwrap();
    let millis: f64 = line
        .split("result in ")
        .nth(1)
        .and_then(|rest| rest.split(" ms.").next())
        .and_then(|value| value.parse().ok())
        .unwrap();
    assert!(millis >= 10.0);
}
