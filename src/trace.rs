//! Call tracing: wrap a function so every call is timed and logged.
//!
//! Arguments are passed as a tuple so they can be serialized for the
//! `Arguments:` line:
//!
//! ```no_run
//! use levelog::{Logger, Traced};
//!
//! let logger = Logger::new();
//! let add = Traced::new(&logger, "Calculator", "add", |(a, b): (i32, i32)| a + b);
//! assert_eq!(add.call((2, 3)), 5);
//! ```
//!
//! The wrapper never catches failures. A panic unwinds straight through it,
//! and [`Traced::try_call`] hands an `Err` back untouched; in both cases no
//! post-call line is written.

use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::format::Record;
use crate::logger::{Emit, Logger};
use crate::severity::Severity;

/// Significant digits of the reported duration
const TIME_PRECISION: usize = 3;

/// A function wrapped with timing and logging
pub struct Traced<'a, F> {
    logger: &'a Logger,
    type_name: &'a str,
    method: &'a str,
    level: Severity,
    f: F,
}

impl<'a, F> Traced<'a, F> {
    /// Wrap `f`, reporting it as `type_name::method` at `TRACE`
    pub fn new(logger: &'a Logger, type_name: &'a str, method: &'a str, f: F) -> Self {
        Self {
            logger,
            type_name,
            method,
            level: Severity::Trace,
            f,
        }
    }

    /// Wrap `f` as a method of `T`, named by the last segment of its type path
    pub fn for_type<T: ?Sized>(logger: &'a Logger, method: &'a str, f: F) -> Self {
        Self::new(logger, short_type_name::<T>(), method, f)
    }

    /// Severity the timing line is emitted at
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Invoke the wrapped function and log the call
    pub fn call<A, R>(&self, args: A) -> R
    where
        F: Fn(A) -> R,
        A: Serialize,
        R: Serialize,
    {
        let arguments = self.capture(&args);
        let start = Instant::now();
        let result = (self.f)(args);
        self.report(start.elapsed(), arguments, &result);
        result
    }

    /// Invoke a fallible function; an `Err` is returned as-is without logging
    pub fn try_call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
        A: Serialize,
        T: Serialize,
    {
        let arguments = self.capture(&args);
        let start = Instant::now();
        let value = (self.f)(args)?;
        self.report(start.elapsed(), arguments, &value);
        Ok(value)
    }

    /// Invoke an async function, timing until its future completes
    pub async fn call_async<A, Fut, R>(&self, args: A) -> R
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = R>,
        A: Serialize,
        R: Serialize,
    {
        let arguments = self.capture(&args);
        let start = Instant::now();
        let result = (self.f)(args).await;
        self.report(start.elapsed(), arguments, &result);
        result
    }

    /// Turn the wrapper into a plain closure with the wrapped signature
    pub fn into_fn<A, R>(self) -> impl Fn(A) -> R + 'a
    where
        F: Fn(A) -> R + 'a,
        A: Serialize,
        R: Serialize,
    {
        move |args| self.call(args)
    }

    fn enabled(&self) -> bool {
        self.level != Severity::Off && self.logger.require_level(self.level)
    }

    // Whether the call is logged is decided once, before it runs. Arguments
    // are moved into the call, so they are serialized here, and only when
    // they will be shown.
    fn capture<A: Serialize>(&self, args: &A) -> Option<Value> {
        self.enabled().then(|| to_json(args))
    }

    fn report<R: Serialize>(&self, elapsed: Duration, arguments: Option<Value>, result: &R) {
        let Some(arguments) = arguments else {
            return;
        };
        let time = to_precision(elapsed.as_secs_f64() * 1000.0, TIME_PRECISION);
        self.logger.emit(&Record::new(
            format!(
                "[{}] {}(args) => result in {} ms.",
                self.type_name, self.method, time
            ),
            self.level,
        ));

        self.logger.group();
        let written = self
            .logger
            .log_and_persist("Arguments:", Emit::default().with_extra(arguments))
            .and_then(|()| {
                self.logger
                    .log_and_persist("Returns:", Emit::default().with_extra(to_json(result)))
            });
        self.logger.group_end();
        if let Err(err) = written {
            eprintln!("levelog: failed to emit trace details: {}", err);
        }
    }
}

/// Wrap `f` at `TRACE` and return a closure with the same signature
pub fn traced<'a, A, R, F>(
    logger: &'a Logger,
    type_name: &'a str,
    method: &'a str,
    f: F,
) -> impl Fn(A) -> R + 'a
where
    F: Fn(A) -> R + 'a,
    A: Serialize,
    R: Serialize,
{
    Traced::new(logger, type_name, method, f).into_fn()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|err| Value::String(format!("<unserializable: {}>", err)))
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Render `value` with `digits` significant digits, switching to exponent
/// notation for very large or very small magnitudes.
pub fn to_precision(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", digits - 1, value);
    }

    let mut exponent = value.abs().log10().floor() as i32;
    let scale = 10f64.powi(exponent - digits as i32 + 1);
    if (value.abs() / scale).round() >= 10f64.powi(digits as i32) {
        exponent += 1;
    }

    if exponent < -6 || exponent >= digits as i32 {
        let mantissa = value / 10f64.powi(exponent);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{:.*}e{}{}", digits - 1, mantissa, sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, value)
    }
}
