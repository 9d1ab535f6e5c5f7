/*!
 * Monitoring
 * Tracing subscriber setup for the simulator binary
 */

mod tracer;

pub use tracer::{init_tracing, ENV_TRACE_JSON};
