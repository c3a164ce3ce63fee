use chrono::{DateTime, Utc};
use std::env;

/// Build time, reproducible when SOURCE_DATE_EPOCH is set.
fn build_datetime() -> DateTime<Utc> {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .unwrap_or_else(Utc::now)
}

fn main() {
    // Stamp used to seed the RTC after a power loss, parsed by
    // `Datetime::parse_build_stamp`.
    println!(
        "cargo:rustc-env=BUILD_DATETIME={}",
        build_datetime().format("%Y-%m-%dT%H:%M:%S")
    );
}
