//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# scopewise

scopewise is a structured, context-carrying logging library for Rust.

# Development status

scopewise is experimental and the API may change.

# The problem

Typical logging crates treat a log line as a string with a level. But the useful part of a production
log is usually not the message, it is the *context*: which service, which environment, which order,
which request. Threading that context through every call site by hand means repeating yourself, and
stashing it in free-form message text means nobody can query it later.

Here are some problems:

* I want every record from the payments service to say it came from the payments service, without
  writing that at every call site.
* I want "we are inside the nightly refresh" attached to every record for the duration of the
  refresh, and gone afterwards, even when the refresh fails halfway through.
* I want one request's id on every record a handler emits for that request, without a second
  request's id ever bleeding in.
* When a noisy third-party tool prints all over my output, I want to silence *it* for a block
  without losing my own structured records.

These problems are all context composition and scoping, so here we are.

# The API

Every record is a JSON-shaped object: a message, a level, the call's own fields at the top level,
and the logger's accumulated context nested under a single key equal to the logger's name.

```rust
use scopewise::{InMemoryHandler, Logger, fields};
use std::sync::Arc;

let handler = Arc::new(InMemoryHandler::new());
let logger = Logger::builder()
    .name("payments")
    .handler(handler.clone())
    .field("service", "payments")
    .field("env", "prod")
    .build()
    .unwrap();

logger.info_with("payment completed", fields! { "order_id" => "O1" });

let record = handler.drain_records().pop().unwrap();
assert_eq!(record.fields()["order_id"], "O1");
assert_eq!(record.fields()["payments"]["service"], "payments");
```

Context comes in layers:

* **Persistent fields** are set at construction or via [`Logger::set_context`] and live as long as
  the logger.
* **Scoped sub-contexts** ([`Logger::with_context_params`]) are pushed for the lifetime of a guard
  and restored on every exit path, unwinding included.
* **Derived views** ([`Logger::bind`]) stamp one fixed field onto every call routed through them
  without touching the parent.

Block outcomes log themselves through [`Logger::with_message`], which emits a success record on
normal exit and a failure record with captured error info otherwise. [`disable_outer_logs`]
silences raw, unstructured output for a block while structured records keep flowing. And
[`set_level_global`] applies a new level to every logger alive at the moment of the call.

# Multithreading

A logger is freely shared across threads. Persistent fields are shared state behind the logger's
own lock; scoped sub-contexts are thread-local, so two threads scoping the same logger never
observe each other's scopes. The raw output gate targets a process-wide resource and is documented
accordingly.
*/

mod context;
mod context_logger;
mod error;
mod factory;
pub mod format;
mod handler;
mod level;
mod logger;
mod macros;
mod memory_handler;
mod message_scope;
mod record;
pub mod registry;
pub mod stream_gate;
mod stream_handler;
mod wrap;

pub use context::ContextScope;
pub use context_logger::ContextLogger;
pub use error::{ConfigError, ParseLevelError};
pub use factory::{Env, get_logger, get_logger_with};
pub use format::{Formatter, JsonFormatter, PrettyFormatter};
pub use handler::Handler;
pub use level::Level;
pub use logger::{Builder, Logger};
pub use memory_handler::InMemoryHandler;
pub use message_scope::MessageScope;
pub use record::{ExcInfo, Fields, Record};
pub use registry::{registered_loggers, set_level_global};
pub use stream_gate::{StreamGate, disable_outer_logs};
pub use stream_handler::{StreamHandler, StreamTarget};
pub use wrap::{error_logs, loggable};

#[doc(hidden)]
pub mod hidden {
    pub use serde_json::json;
}
